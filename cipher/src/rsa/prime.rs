use crate::{CipherError, Rand};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rng::BlumBlumShub;
use utils::BigUintExt;

/// Small `3 (mod 4)` primes whose product drives every candidate stream.
pub const BBS_P: u32 = 499;
pub const BBS_Q: u32 = 547;

const MAX_TRIES: usize = 1000;
const MR_ROUNDS: usize = 16;

// Trial-division screen: a hit on any of these settles compositeness long
// before a Miller-Rabin exponentiation runs. The verdict never changes,
// only the cost.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
const SMALL_PRIMES_PRODUCT: u64 = 16294579238595022365;

fn has_small_factor(n: &BigUint) -> bool {
    let m = (n % SMALL_PRIMES_PRODUCT)
        .to_u64()
        .expect("residue fits in u64");
    SMALL_PRIMES
        .iter()
        .any(|&p| m % (p as u64) == 0 && n != &BigUint::from(p))
}

/// Draw shaped `bits`-wide candidates until one passes Miller-Rabin.
/// Attempt `i` runs its own stream seeded with `seed + i`, so the whole
/// search is a pure function of `seed`.
pub fn generate_prime_3mod4(seed: &BigUint, bits: usize) -> Result<BigUint, CipherError> {
    for attempt in 0..MAX_TRIES {
        let mut bbs = BlumBlumShub::new(&(seed + attempt as u32), BBS_P, BBS_Q, bits);
        let candidate = bbs.next();

        if has_small_factor(&candidate) {
            continue;
        }
        if !BigUintExt(&candidate).is_prime(MR_ROUNDS) {
            continue;
        }
        // guaranteed by the stream shaping, kept as a guard
        if (&candidate % 4u32) != BigUint::from(3u32) {
            continue;
        }

        return Ok(candidate);
    }

    Err(CipherError::PrimeGenerationExhausted {
        bits,
        tries: MAX_TRIES,
    })
}

/// Search for a safe prime `q = 2p' + 1` of exactly `bits` bits. Every
/// iteration burns a fresh 64-byte oracle seed; `p'` is drawn at `bits - 1`
/// so the doubled candidate lands on the requested width.
pub fn find_safe_prime<R: Rand>(bits: usize, rng: &mut R) -> Result<BigUint, CipherError> {
    for _ in 0..MAX_TRIES {
        let mut seed = [0u8; 64];
        rng.rand(&mut seed);

        let half = match generate_prime_3mod4(&BigUint::from_bytes_be(&seed), bits - 1) {
            Ok(half) => half,
            // a dry seed costs one iteration, the next draw starts fresh
            Err(CipherError::PrimeGenerationExhausted { .. }) => continue,
            Err(e) => return Err(e),
        };
        let candidate = (&half << 1) + 1u32;
        if BigUintExt(&candidate).is_prime(MR_ROUNDS) {
            return Ok(candidate);
        }
    }

    Err(CipherError::PrimeGenerationExhausted {
        bits,
        tries: MAX_TRIES,
    })
}
