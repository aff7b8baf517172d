use crate::rsa::{harden, prime};
use crate::{CipherError, Rand};
use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rng::BlumBlumShub;
use std::fmt::{Display, Formatter};
use utils::BigUintExt;

/// Fermat number F4, the only public exponent the generator emits.
pub const PUBLIC_EXPONENT: u32 = 65537;

#[derive(Clone, Debug, PartialOrd, PartialEq, Ord, Eq)]
pub struct PublicKey {
    // n = p * q
    n: BigUint,
    // gcd(e, (p-1)(q-1)) = 1
    e: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    pk: PublicKey,
    p: BigUint,
    q: BigUint,
    // d * e = 1 % phi
    d: BigUint,
    // phi = (p-1)(q-1)
    phi: BigUint,
    // d % (p-1)
    d_p: BigUint,
    // d % (q-1)
    d_q: BigUint,
    // q * q_inv = 1 % p
    q_inv: BigUint,
}

/// Strategy for the private-key exponentiation. All variants compute the
/// same value; they trade speed against timing exposure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpVariant {
    /// `c^d mod n`
    Plain,
    /// `c^(d + r*phi) mod n` with a fresh 16-bit `r` per call
    Blinded,
    /// Chinese Remainder Theorem over the two prime halves
    Crt,
    /// CRT with independently blinded half-exponents
    #[default]
    CrtBlinded,
}

impl PublicKey {
    /// note: does not check that `n` and `e` are sound RSA parameters
    pub fn new_uncheck(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// modulus length in bytes, `ceil(bits(n) / 8)`
    pub fn byte_len(&self) -> usize {
        (self.n.bits() as usize + 7) >> 3
    }

    /// RSAEP: `m^e mod n`, defined for `m < n` only.
    pub fn rsaep(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        if m < &self.n {
            Ok(m.modpow(&self.e, &self.n))
        } else {
            Err(CipherError::InputTooLarge(
                "rsaep: the message representative reaches the modulus".to_string(),
            ))
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.e < BigUint::from(2u8) {
            Err(CipherError::Other(format!(
                "rsa: public exponent {:#x} is too small",
                self.e
            )))
        } else if self.e > BigUint::from(u32::MAX - 1) {
            Err(CipherError::Other(format!(
                "rsa: public exponent {:#x} is too large",
                self.e
            )))
        } else {
            Ok(())
        }
    }
}

impl PrivateKey {
    /// Assemble a key from its prime factors. `d` and the CRT members are
    /// derived, so `e` must be invertible mod `(p-1)(q-1)`.
    pub fn from_factors(p: BigUint, q: BigUint, e: BigUint) -> Result<Self, CipherError> {
        let (n, phi) = (&p * &q, (&p - 1u32) * (&q - 1u32));
        if !e.gcd(&phi).is_one() {
            return Err(CipherError::Other(
                "rsa: e is not invertible mod phi(n)".to_string(),
            ));
        }
        let d = BigUintExt(&e).modinv(&phi).expect("coprimality just checked");

        Ok(Self::assemble(p, q, n, e, d, phi))
    }

    /// Generate a key with a `bits`-wide modulus built from two safe primes.
    ///
    /// Every private exponent is screened against the hardening
    /// heuristics; a rejection restarts the whole prime search, and the
    /// restart budget surfaces as [`CipherError::KeyHardeningExhausted`].
    pub fn generate<R: Rand>(bits: usize, rng: &mut R) -> Result<Self, CipherError> {
        const MAX_RESTARTS: usize = 16;

        if bits < 512 {
            return Err(CipherError::Other(format!(
                "rsa: a {bits}-bit modulus is below the 512-bit floor"
            )));
        }

        let e = BigUint::from(PUBLIC_EXPONENT);
        let close = BigUint::one() << (bits / 4);

        for round in 0..MAX_RESTARTS {
            let p = prime::find_safe_prime(bits >> 1, rng)?;
            let q = prime::find_safe_prime(bits >> 1, rng)?;

            // Fermat factorization becomes practical when the primes are
            // close; this also rules out q == p
            let gap = if p > q { &p - &q } else { &q - &p };
            if gap < close {
                debug!("rsa: prime gap below 2^{}, restarting", bits / 4);
                continue;
            }

            let (n, phi) = (&p * &q, (&p - 1u32) * (&q - 1u32));
            if !e.gcd(&phi).is_one() {
                debug!("rsa: e not invertible mod phi, restarting");
                continue;
            }
            let d = BigUintExt(&e).modinv(&phi).expect("coprimality just checked");

            if let Some(reason) = harden::weakness(&d, &n) {
                debug!(
                    "rsa: private exponent rejected ({}), restart {}",
                    reason,
                    round + 1
                );
                continue;
            }

            return Ok(Self::assemble(p, q, n, e, d, phi));
        }

        Err(CipherError::KeyHardeningExhausted(MAX_RESTARTS))
    }

    fn assemble(p: BigUint, q: BigUint, n: BigUint, e: BigUint, d: BigUint, phi: BigUint) -> Self {
        let d_p = &d % (&p - 1u32);
        let d_q = &d % (&q - 1u32);
        let q_inv = BigUintExt(&q)
            .modinv(&p)
            .expect("distinct primes are coprime");

        Self {
            pk: PublicKey::new_uncheck(n, e),
            p,
            q,
            d,
            phi,
            d_p,
            d_q,
            q_inv,
        }
    }

    /// Rebuild a key from decoded fields without deriving anything; pair
    /// with [`is_valid`](Self::is_valid).
    pub(super) fn from_parts(
        p: BigUint,
        q: BigUint,
        n: BigUint,
        e: BigUint,
        d: BigUint,
        phi: BigUint,
        d_p: BigUint,
        d_q: BigUint,
        q_inv: BigUint,
    ) -> Self {
        Self {
            pk: PublicKey::new_uncheck(n, e),
            p,
            q,
            d,
            phi,
            d_p,
            d_q,
            q_inv,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    pub fn modulus(&self) -> &BigUint {
        &self.pk.n
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn phi(&self) -> &BigUint {
        &self.phi
    }

    pub fn d_p(&self) -> &BigUint {
        &self.d_p
    }

    pub fn d_q(&self) -> &BigUint {
        &self.d_q
    }

    pub fn q_inv(&self) -> &BigUint {
        &self.q_inv
    }

    /// RSADP: `c^d mod n` for `c < n`, computed under `variant`. The oracle
    /// `rng` is consulted only by the blinded variants, one fresh stream per
    /// call.
    pub fn rsadp<R: Rand>(
        &self,
        c: &BigUint,
        variant: ExpVariant,
        rng: &mut R,
    ) -> Result<BigUint, CipherError> {
        if c >= &self.pk.n {
            return Err(CipherError::InputTooLarge(
                "rsadp: the ciphertext representative reaches the modulus".to_string(),
            ));
        }

        let m = match variant {
            ExpVariant::Plain => c.modpow(&self.d, &self.pk.n),
            ExpVariant::Blinded => {
                // d + r*phi = d (mod ord(c)), only the timing profile moves
                let r = self.blind_factor(rng);
                let exp = &self.d + r * &self.phi;
                c.modpow(&exp, &self.pk.n)
            }
            ExpVariant::Crt => self.crt_exp(c, &self.d_p, &self.d_q),
            ExpVariant::CrtBlinded => {
                let (r_p, r_q) = (self.blind_factor(rng), self.blind_factor(rng));
                let d_p = &self.d_p + r_p * (&self.p - 1u32);
                let d_q = &self.d_q + r_q * (&self.q - 1u32);
                self.crt_exp(c, &d_p, &d_q)
            }
        };

        Ok(m)
    }

    // 16-bit blinding factor off a freshly seeded stream; the shaped draw
    // carries a forced top bit, so it is never zero
    fn blind_factor<R: Rand>(&self, rng: &mut R) -> BigUint {
        let mut bbs = BlumBlumShub::from_entropy(rng, prime::BBS_P, prime::BBS_Q, 16);
        bbs.next()
    }

    // m_p = c^{d_p} % p, m_q = c^{d_q} % q
    // h = (m_p - m_q) * q_inv % p, normalized into [0, p)
    // m = m_q + h * q
    fn crt_exp(&self, c: &BigUint, d_p: &BigUint, d_q: &BigUint) -> BigUint {
        let (p, q) = (&self.p, &self.q);
        let (m_p, m_q) = (c.modpow(d_p, p), c.modpow(d_q, q));

        let mut h = (p + &m_p - (&m_q % p)) % p;
        h = h * &self.q_inv % p;
        &m_q + h * q
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.p.is_one() || self.q.is_one() {
            return Err(CipherError::Other("rsa: trivial prime factor".to_string()));
        }
        if &self.p * &self.q != self.pk.n {
            return Err(CipherError::Other(
                "rsa: modulus does not match its factors".to_string(),
            ));
        }
        if self.phi != (&self.p - 1u32) * (&self.q - 1u32) {
            return Err(CipherError::Other(
                "rsa: totient does not match the factors".to_string(),
            ));
        }

        let de = &self.d * &self.pk.e;
        for pm1 in [&self.p - 1u32, &self.q - 1u32] {
            if !(&de % &pm1).is_one() {
                return Err(CipherError::Other(
                    "rsa: private exponent does not invert e".to_string(),
                ));
            }
        }

        if self.d_p != &self.d % (&self.p - 1u32) || self.d_q != &self.d % (&self.q - 1u32) {
            return Err(CipherError::Other(
                "rsa: CRT exponents do not match d".to_string(),
            ));
        }
        if !(&self.q * &self.q_inv % &self.p).is_one() {
            return Err(CipherError::Other(
                "rsa: CRT coefficient does not invert q".to_string(),
            ));
        }

        Ok(())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{pk: {}, p: {:#x}, q: {:#x}}}", self.pk, self.p, self.q)
    }
}

#[cfg(test)]
mod tests {
    use crate::rsa::tests::fixture_key;
    use crate::rsa::{ExpVariant, PublicKey};
    use crate::DefaultRand;
    use num_bigint::BigUint;
    use num_traits::{Num, One};

    #[test]
    fn fixture_matches_published_modulus() {
        let n = BigUint::from_str_radix(
            "a5e198f3b1619971e077ce9186615d47cc45340d7d1f8c4fa8f998884f934f62513c91c7b796f508b4090fc285c0c5ff57d722b4044d5f25f4dcd397b8360f3f440fc96473ec4ec9f39bf9eacc94d858f357b6ca19c239041f29153cea96a42c0ce032c5c6e65a328983268344798376492ed5c2d27392176db8920099e8ac0d",
            16,
        )
        .unwrap();

        let key = fixture_key();
        assert_eq!(key.public_key().modulus(), &n);
        key.is_valid().unwrap();
    }

    #[test]
    fn crt_members_are_consistent() {
        let key = fixture_key();

        assert_eq!(key.d_p(), &(key.d() % (key.p() - 1u32)));
        assert_eq!(key.d_q(), &(key.d() % (key.q() - 1u32)));
        assert!((key.q() * key.q_inv() % key.p()).is_one());
        assert!((key.d() * key.public_key().exponent() % key.phi()).is_one());
    }

    #[test]
    fn all_variants_invert_the_public_operation() {
        let key = fixture_key();
        let mut rng = DefaultRand::default();

        let m = BigUint::from(0xdecafbadu64);
        let c = key.public_key().rsaep(&m).unwrap();
        assert_ne!(c, m);

        for variant in [
            ExpVariant::Plain,
            ExpVariant::Blinded,
            ExpVariant::Crt,
            ExpVariant::CrtBlinded,
        ] {
            let back = key.rsadp(&c, variant, &mut rng).unwrap();
            assert_eq!(back, m, "variant {:?}", variant);
        }
    }

    #[test]
    fn representative_must_stay_below_modulus() {
        let key = fixture_key();
        let mut rng = DefaultRand::default();

        let n = key.modulus().clone();
        assert!(key.public_key().rsaep(&n).is_err());
        assert!(key
            .rsadp(&n, ExpVariant::CrtBlinded, &mut rng)
            .is_err());
    }

    #[test]
    fn public_key_range_check() {
        let n = BigUint::from(3233u32);
        assert!(PublicKey::new_uncheck(n.clone(), BigUint::one()).is_valid().is_err());
        assert!(PublicKey::new_uncheck(n.clone(), BigUint::from(u32::MAX)).is_valid().is_err());
        assert!(PublicKey::new_uncheck(n, BigUint::from(17u32)).is_valid().is_ok());
    }
}
