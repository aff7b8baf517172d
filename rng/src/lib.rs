/// Entropy source contract: fill `random` with cryptographically strong
/// bytes. Must block until the whole slice is filled.
pub trait Rand {
    fn rand(&mut self, random: &mut [u8]);
}

mod default_rand;
pub use default_rand::DefaultRand;

mod bbs;
pub use bbs::BlumBlumShub;
