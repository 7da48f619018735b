//! Sieve of Eratosthenes over odd values.

use bitvec::prelude::*;

/// All primes `<= limit`, ascending.
///
/// Bit `i` of the working set stands for the odd value `2i + 1`, so memory is
/// `limit / 16` bytes.
pub fn primes_up_to(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }

    let slots = odd_slots(limit) as usize;
    let mut composite = bitvec![usize, Lsb0; 0; slots];
    // 1 is not prime
    composite.set(0, true);

    let mut i = 1usize;
    loop {
        let p = 2 * i as u64 + 1;
        if p.saturating_mul(p) > limit {
            break;
        }
        if !composite[i] {
            let mut j = (p * p / 2) as usize;
            while j < slots {
                composite.set(j, true);
                j += p as usize;
            }
        }
        i += 1;
    }

    let mut primes = Vec::with_capacity(estimated_count(limit));
    primes.push(2);
    primes.extend(composite.iter_zeros().map(|slot| 2 * slot as u64 + 1));
    primes
}

/// Odd values in `1..=limit`.
fn odd_slots(limit: u64) -> u64 {
    limit.div_ceil(2)
}

/// Upper estimate of pi(limit) for pre-allocation.
fn estimated_count(limit: u64) -> usize {
    let x = limit as f64;
    if x < 17.0 {
        return 8;
    }
    (1.26 * x / x.ln()) as usize
}
