use std::io::Write;

pub mod sha2;

/// Message digest over raw bytes. Data is fed through the [`Write`] impl;
/// `finish` pads and returns the digest of everything written since
/// construction or the last `reset`. Writing to a finished hasher resets it
/// first.
pub trait Digest: Write {
    /// Bit length of the block the compression function consumes.
    const BLOCK_BITS: usize;
    /// Bit length of a schedule word.
    const WORD_BITS: usize;
    /// Bit length of the produced digest.
    const DIGEST_BITS: usize;

    /// One-shot digest of `msg`.
    fn digest(msg: &[u8]) -> Vec<u8>
    where
        Self: Default,
    {
        let mut hasher = Self::default();
        hasher.write_all(msg).expect("hasher write is infallible");
        hasher.finish()
    }

    /// Pad, run the final blocks and return the digest. Idempotent until the
    /// next `reset` or write.
    fn finish(&mut self) -> Vec<u8>;

    /// Restore the initial state.
    fn reset(&mut self);
}
