use crate::Rand;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Blum Blum Shub quadratic-residue stream.
///
/// The modulus here is the product of two small primes congruent to
/// `3 (mod 4)` that only drive the stream; it is unrelated to any RSA
/// modulus. State evolves by `x <- x^2 mod m` and each step yields the
/// least significant bit of the new state.
#[derive(Clone, Debug)]
pub struct BlumBlumShub {
    m: BigUint,
    x: BigUint,
    width: usize,
}

impl BlumBlumShub {
    /// `p` and `q` must be primes congruent to `3 (mod 4)`. The initial
    /// state is `max(seed mod m, 1)`; `width` is the bit size of shaped
    /// draws made through [`next`](Self::next).
    pub fn new(seed: &BigUint, p: u32, q: u32, width: usize) -> Self {
        let m = BigUint::from(p) * BigUint::from(q);
        let mut x = seed % &m;
        if x.is_zero() {
            x = BigUint::one();
        }

        Self { m, x, width }
    }

    /// Seed a stream from 64 oracle bytes.
    pub fn from_entropy<R: Rand>(rng: &mut R, p: u32, q: u32, width: usize) -> Self {
        let mut seed = [0u8; 64];
        rng.rand(&mut seed);
        Self::new(&BigUint::from_bytes_be(&seed), p, q, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Advance the state and return its least significant bit.
    pub fn next_bit(&mut self) -> u8 {
        self.x = &self.x * &self.x % &self.m;
        self.x.bit(0) as u8
    }

    /// Draw `n` stream bits MSB-first, then force the candidate shape:
    /// bit `n-1` set, odd, and congruent to `3 (mod 4)`. The shaping is part
    /// of the contract; it is what makes draws usable as prime candidates.
    pub fn next_bits(&mut self, n: usize) -> BigUint {
        let mut r = BigUint::zero();
        for _ in 0..n {
            r <<= 1;
            r += self.next_bit();
        }

        r.set_bit(n as u64 - 1, true);
        r.set_bit(0, true);
        // r - (r mod 4) + 3
        let rem = &r % 4u32;
        r - rem + 3u32
    }

    /// Shaped draw of the configured width.
    pub fn next(&mut self) -> BigUint {
        self.next_bits(self.width)
    }
}

/// Raw (unshaped) view of the stream, 8 bits per byte MSB-first. Backs the
/// OAEP seed, PSS salt and blinding draws; the shaping of `next_bits` would
/// bias every byte and is deliberately not applied here.
impl Rand for BlumBlumShub {
    fn rand(&mut self, random: &mut [u8]) {
        for byte in random.iter_mut() {
            let mut b = 0u8;
            for _ in 0..8 {
                b = (b << 1) | self.next_bit();
            }
            *byte = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BlumBlumShub;
    use crate::Rand;
    use num_bigint::BigUint;

    #[test]
    fn stream_is_deterministic() {
        let seed = BigUint::from(0xdeadbeefu32);
        let mut a = BlumBlumShub::new(&seed, 499, 547, 64);
        let mut b = BlumBlumShub::new(&seed, 499, 547, 64);

        let (mut xs, mut ys) = ([0u8; 32], [0u8; 32]);
        a.rand(&mut xs);
        b.rand(&mut ys);
        assert_eq!(xs, ys);
        assert_eq!(a.next(), b.next());
    }

    #[test]
    fn shaped_draw() {
        let seed = BigUint::from(123456789u32);
        let mut bbs = BlumBlumShub::new(&seed, 499, 547, 512);

        for _ in 0..8 {
            let r = bbs.next();
            assert_eq!(r.bits(), 512);
            assert!(r.bit(0), "shaped draw must be odd");
            assert_eq!(&r % 4u32, BigUint::from(3u32));
        }
    }

    #[test]
    fn zero_seed_pins_state_to_one() {
        // x = 1 is a fixed point, every stream bit is 1
        let mut bbs = BlumBlumShub::new(&BigUint::from(0u8), 499, 547, 8);
        assert_eq!(bbs.next_bits(8), BigUint::from(0xffu8));
    }

    #[test]
    fn raw_stream_advances() {
        let seed = BigUint::from(987654321u32);
        let mut bbs = BlumBlumShub::new(&seed, 499, 547, 16);

        let (mut first, mut second) = ([0u8; 16], [0u8; 16]);
        bbs.rand(&mut first);
        bbs.rand(&mut second);
        assert_ne!(first, second);
    }
}
