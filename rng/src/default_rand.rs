use crate::Rand;
use rand::rngs::OsRng;
use rand::RngCore;

/// Operating system entropy oracle.
#[derive(Copy, Clone, Default)]
pub struct DefaultRand {
    rng: OsRng,
}

impl Rand for DefaultRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
