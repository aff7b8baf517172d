use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

/// Number-theoretic extensions over a borrowed [`BigUint`].
pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// Witnesses for the deterministic Miller-Rabin rounds, consumed cyclically.
    const WITNESSES: [u32; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

    /// `self * inv = 1 \mod modulus`, computed by the extended Euclidean
    /// algorithm. `None` when `gcd(self, modulus) != 1`.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        let (a, n) = (
            BigInt::from(self.deref() % modulus),
            BigInt::from(modulus.clone()),
        );
        let g = a.extended_gcd(&n);
        g.gcd.is_one().then(|| {
            g.x.rem_euclid(&n)
                .to_biguint()
                .expect("rem_euclid result is non-negative")
        })
    }

    /// Miller-Rabin primality test with `rounds` rounds over the fixed
    /// witness set `{2, 3, 5, 7, 11, 13, 17, 19, 23}`.
    ///
    /// Witnesses `a >= n - 2` are skipped, so the verdict is exact for every
    /// `n` small enough that no witness fits.
    pub fn is_prime(&self, rounds: usize) -> bool {
        let n = self.deref();
        let two = BigUint::from(2u8);

        if n < &two {
            return false;
        }
        if n == &two || n == &BigUint::from(3u8) {
            return true;
        }
        if n.is_even() {
            return false;
        }

        // n - 1 = 2^r * d, d odd
        let n_m1 = n - 1u32;
        let r = n_m1.trailing_zeros().unwrap_or(0);
        let d = &n_m1 >> r;
        let n_m2 = n - 2u32;

        for round in 0..rounds {
            let a = BigUint::from(Self::WITNESSES[round % Self::WITNESSES.len()]);
            if a >= n_m2 {
                continue;
            }

            let mut x = a.modpow(&d, n);
            if x.is_one() || x == n_m1 {
                continue;
            }

            let mut composite = true;
            for _ in 0..r.saturating_sub(1) {
                x = &x * &x % n;
                if x == n_m1 {
                    composite = false;
                    break;
                }
            }

            if composite {
                return false;
            }
        }

        true
    }

    /// `floor(self^(1/k))` by binary search on `[1, self]` with integer
    /// exponentiation only.
    pub fn nth_root(&self, k: u32) -> BigUint {
        let n = self.deref();
        if k <= 1 || n.is_zero() || n.is_one() {
            return n.clone();
        }

        let (mut lo, mut hi) = (BigUint::one(), n.clone());
        while lo < hi {
            // lo^k <= n holds; shrink until (lo+1)^k > n
            let mid: BigUint = (&lo + &hi + 1u32) >> 1;
            if mid.pow(k) <= *n {
                lo = mid;
            } else {
                hi = mid - 1u32;
            }
        }

        lo
    }
}
