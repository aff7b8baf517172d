//! RSA
//!
//! - pick two distinct safe primes $p$ and $q$; the modulus is $n = p q$ and
//!   its byte length $k$ satisfies $2^{8(k-1)} \le n < 2^{8k}$;
//! - the public exponent $e$ is coprime to $\phi(n) = (p-1)(q-1)$ and fixed
//!   to $65537$ here;
//! - the private exponent satisfies $e d \equiv 1 \mod \phi(n)$.
//!
//! encrypt: $c = m^e \mod n$; decrypt: $m = c^d \mod n$, by Euler
//! $m^{k(p-1)(q-1)+1} \equiv m \mod n$.
//!
//! Message padding (EME-OAEP, EMSA-PSS) follows PKCS #1 v2.1; every
//! candidate prime is drawn from a shaped Blum Blum Shub stream and the
//! private exponent is screened against a set of hardening heuristics
//! before a key is emitted.

mod key;
pub use key::{ExpVariant, PrivateKey, PublicKey, PUBLIC_EXPONENT};

mod prime;
pub use prime::{find_safe_prime, generate_prime_3mod4, BBS_P, BBS_Q};

mod harden;

mod mgf;

mod oaep;
pub use oaep::{OAEPDecrypt, OAEPEncrypt};

mod pss;
pub use pss::{PssSign, PssVerify};

mod codec;

#[cfg(test)]
mod tests;
