use crate::CipherError;
use crypto_hash::Digest;
use num_bigint::BigUint;
use std::io::Write;

/// I2OSP: `x` as a big-endian unsigned integer in exactly `len` bytes.
pub(super) fn i2osp(x: u64, len: usize) -> Vec<u8> {
    let bytes = x.to_be_bytes();
    let take = len.min(bytes.len());

    let mut out = vec![0u8; len];
    out[(len - take)..].copy_from_slice(&bytes[(bytes.len() - take)..]);
    out
}

/// MGF1: iterated `H(seed || I2OSP(counter, 4))`, truncated to `mask_len`.
pub(super) fn mgf1<H: Digest>(hasher: &mut H, seed: &[u8], mask_len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(mask_len + (H::DIGEST_BITS >> 3));
    let mut counter = 0u64;

    while mask.len() < mask_len {
        hasher.reset();
        hasher.write_all(seed).unwrap();
        hasher.write_all(&i2osp(counter, 4)).unwrap();
        mask.extend_from_slice(&hasher.finish());
        counter += 1;
    }

    mask.truncate(mask_len);
    mask
}

pub(super) fn xor_mask(data: &mut [u8], mask: &[u8]) {
    data.iter_mut().zip(mask).for_each(|(a, &b)| *a ^= b);
}

/// Left-zero-padded big-endian form of `x` in exactly `len` bytes. The
/// padded-block decoders need every leading zero, so an oversized integer is
/// an error, never a truncation.
pub(super) fn to_fixed_be(x: &BigUint, len: usize) -> Result<Vec<u8>, CipherError> {
    let bytes = x.to_bytes_be();
    if bytes.len() > len {
        return Err(CipherError::InputTooLarge(format!(
            "integer spans {} bytes, the block holds {}",
            bytes.len(),
            len
        )));
    }

    let mut out = vec![0u8; len];
    out[(len - bytes.len())..].copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{i2osp, mgf1, to_fixed_be, xor_mask};
    use crypto_hash::sha2::SHA256;
    use num_bigint::BigUint;

    fn os2ip(data: &[u8]) -> u64 {
        data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    #[test]
    fn i2osp_round_trip() {
        for x in [0u64, 1, 255, 256, 0x01020304, u32::MAX as u64] {
            for len in [4usize, 5, 8] {
                assert_eq!(os2ip(&i2osp(x, len)), x, "x={x} len={len}");
            }
        }

        assert_eq!(i2osp(0x01020304, 4), [1, 2, 3, 4]);
        assert_eq!(i2osp(7, 2), [0, 7]);
    }

    #[test]
    fn mgf1_exact_length() {
        let mut hasher = SHA256::new();
        for mask_len in [0usize, 1, 20, 31, 32, 33, 64, 100] {
            let mask = mgf1(&mut hasher, b"seed", mask_len);
            assert_eq!(mask.len(), mask_len);
        }
    }

    #[test]
    fn mgf1_prefix_stability() {
        // a longer mask extends the shorter one
        let mut hasher = SHA256::new();
        let short = mgf1(&mut hasher, b"another seed", 24);
        let long = mgf1(&mut hasher, b"another seed", 72);
        assert_eq!(short, long[..24]);
    }

    #[test]
    fn xor_is_an_involution() {
        let mut data = *b"padded block contents";
        let mask = [0x5au8; 21];

        let original = data;
        xor_mask(&mut data, &mask);
        assert_ne!(data, original);
        xor_mask(&mut data, &mask);
        assert_eq!(data, original);
    }

    #[test]
    fn fixed_width_conversion() {
        let x = BigUint::from(0xabcdu32);
        assert_eq!(to_fixed_be(&x, 4).unwrap(), [0, 0, 0xab, 0xcd]);
        assert_eq!(to_fixed_be(&x, 2).unwrap(), [0xab, 0xcd]);
        assert!(to_fixed_be(&x, 1).is_err());
    }
}
