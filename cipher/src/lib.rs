mod error;
pub use error::CipherError;

pub use rng::{BlumBlumShub, DefaultRand, Rand};

pub mod rsa;

pub trait Encrypt {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Decrypt {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Sign {
    fn sign(&self, msg: &[u8], signature: &mut Vec<u8>) -> Result<(), CipherError>;
}

/// Signature verification never errors towards the caller: every failure
/// mode collapses into `false`.
pub trait Verify {
    fn verify(&self, msg: &[u8], signature: &[u8]) -> bool;
}
