//! = RFC 8017
//!
//! == PKCS #1 v2.1
//!
//! === EME-OAEP (Optimal Asymmetric Encryption Padding)

use crate::rsa::mgf::{mgf1, to_fixed_be, xor_mask};
use crate::rsa::{ExpVariant, PrivateKey, PublicKey};
use crate::{CipherError, Decrypt, Encrypt, Rand};
use crypto_hash::Digest;
use log::debug;
use num_bigint::BigUint;
use std::cell::RefCell;
use std::io::Write;

pub struct OAEPEncrypt<H: Digest, R: Rand> {
    key: PublicKey,
    hasher: RefCell<H>,
    rng: RefCell<R>,
    // label bound to every block; empty by default
    label: Vec<u8>,
    hlen: usize,
}

pub struct OAEPDecrypt<H: Digest, R: Rand> {
    de: OAEPEncrypt<H, R>,
    key: PrivateKey,
    variant: ExpVariant,
}

impl<H: Digest, R: Rand> OAEPEncrypt<H, R> {
    pub fn new(key: PublicKey, hasher: H, rng: R, label: &[u8]) -> Result<Self, CipherError> {
        let (klen, hlen) = (key.byte_len(), H::DIGEST_BITS >> 3);
        if klen < (hlen << 1) + 2 {
            return Err(CipherError::Other(
                "rsa-oaep: the modulus is too short for the digest".to_string(),
            ));
        }
        key.is_valid()?;

        Ok(Self {
            key,
            hasher: RefCell::new(hasher),
            rng: RefCell::new(rng),
            label: label.to_vec(),
            hlen,
        })
    }

    pub fn key_len(&self) -> usize {
        self.key.byte_len()
    }

    pub fn max_msg_len(&self) -> usize {
        self.key_len() - (self.hlen << 1) - 2
    }

    fn label_hash(&self) -> Vec<u8> {
        let mut hasher = self.hasher.borrow_mut();
        hasher.reset();
        hasher.write_all(&self.label).unwrap();
        hasher.finish()
    }

    fn encrypt_inner(&self, msg: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        let (klen, hlen) = (self.key_len(), self.hlen);
        if msg.len() > self.max_msg_len() {
            return Err(CipherError::InputTooLarge(format!(
                "rsa-oaep: a {}-byte message exceeds the {}-byte capacity",
                msg.len(),
                self.max_msg_len()
            )));
        }

        // em = 0x00 || masked seed || masked db
        // db = lhash || ps || 0x01 || msg
        let mut em = vec![0u8; klen];
        self.rng.borrow_mut().rand(&mut em[1..=hlen]);

        let lhash = self.label_hash();
        em[(hlen + 1)..(2 * hlen + 1)].copy_from_slice(&lhash);
        em[klen - msg.len() - 1] = 0x01;
        em[(klen - msg.len())..].copy_from_slice(msg);

        let mut hasher = self.hasher.borrow_mut();
        let db_mask = mgf1(&mut *hasher, &em[1..=hlen], klen - hlen - 1);
        xor_mask(&mut em[(hlen + 1)..], &db_mask);
        let seed_mask = mgf1(&mut *hasher, &em[(hlen + 1)..], hlen);
        xor_mask(&mut em[1..=hlen], &seed_mask);
        drop(hasher);

        let m = BigUint::from_bytes_be(&em);
        let c = self.key.rsaep(&m)?;
        ciphertext.extend_from_slice(&to_fixed_be(&c, klen)?);

        Ok(())
    }
}

impl<H: Digest, R: Rand> OAEPDecrypt<H, R> {
    pub fn new(key: PrivateKey, hasher: H, rng: R, label: &[u8]) -> Result<Self, CipherError> {
        key.is_valid()?;
        let de = OAEPEncrypt::new(key.public_key().clone(), hasher, rng, label)?;

        Ok(Self {
            de,
            key,
            variant: ExpVariant::default(),
        })
    }

    /// Select the private-exponentiation strategy; blinded CRT by default.
    pub fn with_variant(mut self, variant: ExpVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn key_len(&self) -> usize {
        self.de.key_len()
    }

    pub fn max_msg_len(&self) -> usize {
        self.de.max_msg_len()
    }

    /// Every decode failure surfaces as the indistinguishable
    /// [`CipherError::OAEPError`]; the concrete cause is only logged at
    /// debug level.
    fn decrypt_inner(&self, cipher: &[u8], msg: &mut Vec<u8>) -> Result<(), CipherError> {
        let (klen, hlen) = (self.de.key_len(), self.de.hlen);
        if cipher.is_empty() || cipher.len() > klen {
            return Err(CipherError::Other(format!(
                "rsa-oaep: ciphertext of {} bytes does not fit a {}-byte modulus",
                cipher.len(),
                klen
            )));
        }

        let c = BigUint::from_bytes_be(cipher);
        let m = self
            .key
            .rsadp(&c, self.variant, &mut *self.de.rng.borrow_mut())?;
        let mut em = to_fixed_be(&m, klen)?;

        if em[0] != 0 {
            debug!("rsa-oaep: nonzero leading byte");
            return Err(CipherError::OAEPError);
        }

        let mut hasher = self.de.hasher.borrow_mut();
        let seed_mask = mgf1(&mut *hasher, &em[(hlen + 1)..], hlen);
        xor_mask(&mut em[1..=hlen], &seed_mask);
        let db_mask = mgf1(&mut *hasher, &em[1..=hlen], klen - hlen - 1);
        xor_mask(&mut em[(hlen + 1)..], &db_mask);
        drop(hasher);

        let lhash = self.de.label_hash();
        if em[(hlen + 1)..(2 * hlen + 1)] != lhash[..] {
            debug!("rsa-oaep: label hash mismatch");
            return Err(CipherError::OAEPError);
        }

        // ps stops at the 0x01 separator, the rest is the message
        let body = &em[(2 * hlen + 1)..];
        match body.iter().position(|&x| x != 0) {
            Some(idx) if body[idx] == 0x01 => {
                msg.extend_from_slice(&body[(idx + 1)..]);
                Ok(())
            }
            Some(_) => {
                debug!("rsa-oaep: corrupted separator");
                Err(CipherError::OAEPError)
            }
            None => {
                debug!("rsa-oaep: missing separator");
                Err(CipherError::OAEPError)
            }
        }
    }
}

impl<H: Digest, R: Rand> Encrypt for OAEPEncrypt<H, R> {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.encrypt_inner(plaintext, ciphertext)
    }
}

impl<H: Digest, R: Rand> Encrypt for OAEPDecrypt<H, R> {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.de.encrypt_inner(plaintext, ciphertext)
    }
}

impl<H: Digest, R: Rand> Decrypt for OAEPDecrypt<H, R> {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.decrypt_inner(ciphertext, plaintext)
    }
}

impl<H: Digest, R: Rand> AsRef<PublicKey> for OAEPEncrypt<H, R> {
    fn as_ref(&self) -> &PublicKey {
        &self.key
    }
}

impl<H: Digest, R: Rand> From<OAEPDecrypt<H, R>> for OAEPEncrypt<H, R> {
    fn from(value: OAEPDecrypt<H, R>) -> Self {
        value.de
    }
}

#[cfg(test)]
mod tests {
    use super::{OAEPDecrypt, OAEPEncrypt};
    use crate::rsa::tests::{fixture_key, test_stream};
    use crate::rsa::ExpVariant;
    use crate::{CipherError, Decrypt, Encrypt};
    use crypto_hash::sha2::SHA256;

    fn engines(label: &[u8]) -> (OAEPEncrypt<SHA256, rng::BlumBlumShub>, OAEPDecrypt<SHA256, rng::BlumBlumShub>) {
        let key = fixture_key();
        let en = OAEPEncrypt::new(
            key.public_key().clone(),
            SHA256::new(),
            test_stream(1),
            label,
        )
        .unwrap();
        let de = OAEPDecrypt::new(key, SHA256::new(), test_stream(2), label).unwrap();
        (en, de)
    }

    #[test]
    fn round_trip_all_variants() {
        let msg = "Message à chiffrer".as_bytes();

        for variant in [
            ExpVariant::Plain,
            ExpVariant::Blinded,
            ExpVariant::Crt,
            ExpVariant::CrtBlinded,
        ] {
            let (en, de) = engines(b"");
            let de = de.with_variant(variant);

            let mut cipher = vec![];
            en.encrypt(msg, &mut cipher).unwrap();
            assert_eq!(cipher.len(), en.key_len());
            assert_ne!(&cipher[..], msg);

            let mut plain = vec![];
            de.decrypt(&cipher, &mut plain).unwrap();
            assert_eq!(plain, msg, "variant {:?}", variant);
        }
    }

    #[test]
    fn length_boundaries() {
        let (en, de) = engines(b"");
        // 1024-bit modulus, sha-256: 128 - 64 - 2
        assert_eq!(en.max_msg_len(), 62);

        for msg in [vec![], vec![0x42u8; en.max_msg_len()]] {
            let mut cipher = vec![];
            en.encrypt(&msg, &mut cipher).unwrap();
            let mut plain = vec![];
            de.decrypt(&cipher, &mut plain).unwrap();
            assert_eq!(plain, msg);
        }

        let over = vec![0u8; en.max_msg_len() + 1];
        let mut cipher = vec![];
        assert!(matches!(
            en.encrypt(&over, &mut cipher),
            Err(CipherError::InputTooLarge(_))
        ));
    }

    #[test]
    fn corrupted_ciphertext_is_rejected() {
        let (en, de) = engines(b"");

        let mut cipher = vec![];
        en.encrypt(b"attack at dawn", &mut cipher).unwrap();

        // stamping the leading ciphertext byte keeps c below the modulus but
        // scrambles the whole padded block
        cipher[0] = if cipher[0] == 0x01 { 0x02 } else { 0x01 };
        let mut plain = vec![];
        assert!(matches!(
            de.decrypt(&cipher, &mut plain),
            Err(CipherError::OAEPError)
        ));
    }

    #[test]
    fn label_mismatch_is_rejected() {
        let (en, _) = engines(b"alpha");
        let (_, de) = engines(b"beta");

        let mut cipher = vec![];
        en.encrypt(b"labelled", &mut cipher).unwrap();

        let mut plain = vec![];
        assert!(matches!(
            de.decrypt(&cipher, &mut plain),
            Err(CipherError::OAEPError)
        ));
    }

    #[test]
    fn oversized_ciphertext_is_rejected() {
        let (_, de) = engines(b"");
        let mut plain = vec![];
        let bogus = vec![0xffu8; de.key_len() + 1];
        assert!(de.decrypt(&bogus, &mut plain).is_err());
    }
}
