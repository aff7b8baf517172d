//! SHA-2 family per [FIPS 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).

use std::ops::{BitAnd, BitXor, Not};

#[inline]
fn f_ch<T>(x: T, y: T, z: T) -> T
where
    T: Not<Output = T> + BitXor<Output = T> + BitAnd<Output = T> + Copy,
{
    (x & y) ^ ((!x) & z)
}

#[inline]
fn f_maj<T>(x: T, y: T, z: T) -> T
where
    T: Not<Output = T> + BitXor<Output = T> + BitAnd<Output = T> + Copy,
{
    (x & y) ^ (x & z) ^ (y & z)
}

/// Shared buffering, padding and finalization plumbing. The per-algorithm
/// compression function lives in the sibling file of `$NAME`.
///
/// `$WORD`: schedule word type; `$LEN`: type holding the padded bit length
/// (`u64` for SHA-256, `u128` for SHA-512).
macro_rules! sha_common {
    ($NAME: ident, $WORD: ty, $BLOCK_BITS: literal, $WORD_BITS: literal, $DIGEST_BITS: literal, $LEN: ty) => {
        #[derive(Clone)]
        pub struct $NAME {
            digest: [$WORD; Self::DIGEST_WSIZE],
            buf: [u8; Self::BLOCK_SIZE],
            // next free index into buf
            idx: usize,
            // total bytes written since the last reset
            len: usize,
            is_finalized: bool,
        }

        impl $NAME {
            pub(in crate::sha2) const BLOCK_SIZE: usize = $BLOCK_BITS / 8;
            pub(in crate::sha2) const DIGEST_WSIZE: usize = $DIGEST_BITS / $WORD_BITS;
            const LEN_SIZE: usize = <$LEN>::BITS as usize / 8;

            pub const fn new() -> Self {
                Self {
                    digest: Self::INIT,
                    buf: [0; Self::BLOCK_SIZE],
                    idx: 0,
                    len: 0,
                    is_finalized: false,
                }
            }

            fn clear(&mut self) {
                self.digest = Self::INIT;
                self.buf = [0; Self::BLOCK_SIZE];
                self.idx = 0;
                self.len = 0;
                self.is_finalized = false;
            }
        }

        impl Default for $NAME {
            fn default() -> Self {
                Self::new()
            }
        }

        #[cfg(feature = "sec-zeroize")]
        impl zeroize::Zeroize for $NAME {
            fn zeroize(&mut self) {
                zeroize::Zeroize::zeroize(&mut self.digest);
                zeroize::Zeroize::zeroize(&mut self.buf);
            }
        }

        impl std::io::Write for $NAME {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                if self.is_finalized {
                    self.clear();
                }

                let total = data.len();
                self.len += total;
                let mut data = data;

                if self.idx > 0 {
                    let take = data.len().min(Self::BLOCK_SIZE - self.idx);
                    self.buf[self.idx..(self.idx + take)].copy_from_slice(&data[..take]);
                    self.idx += take;
                    data = &data[take..];

                    if self.idx < Self::BLOCK_SIZE {
                        return Ok(total);
                    }
                    Self::compress(&mut self.digest, &self.buf);
                    self.idx = 0;
                }

                let tail = data.len() % Self::BLOCK_SIZE;
                let head = data.len() - tail;
                if head > 0 {
                    Self::compress(&mut self.digest, &data[..head]);
                }
                self.buf[..tail].copy_from_slice(&data[head..]);
                self.idx = tail;

                Ok(total)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl crate::Digest for $NAME {
            const BLOCK_BITS: usize = $BLOCK_BITS;
            const WORD_BITS: usize = $WORD_BITS;
            const DIGEST_BITS: usize = $DIGEST_BITS;

            fn finish(&mut self) -> Vec<u8> {
                if !self.is_finalized {
                    let bit_len = (self.len as $LEN) << 3;

                    self.buf[self.idx] = 0x80;
                    self.idx += 1;
                    if self.idx > Self::BLOCK_SIZE - Self::LEN_SIZE {
                        self.buf[self.idx..].fill(0);
                        Self::compress(&mut self.digest, &self.buf);
                        self.idx = 0;
                    }
                    self.buf[self.idx..(Self::BLOCK_SIZE - Self::LEN_SIZE)].fill(0);
                    self.buf[(Self::BLOCK_SIZE - Self::LEN_SIZE)..]
                        .copy_from_slice(&bit_len.to_be_bytes());
                    Self::compress(&mut self.digest, &self.buf);
                    self.is_finalized = true;
                }

                let mut out = Vec::with_capacity($DIGEST_BITS / 8);
                for word in self.digest.iter() {
                    out.extend_from_slice(&word.to_be_bytes());
                }
                out
            }

            fn reset(&mut self) {
                self.clear();
            }
        }
    };
}

mod sha256;
mod sha512;

sha_common!(SHA256, u32, 512, 32, 256, u64);
sha_common!(SHA512, u64, 1024, 64, 512, u128);
