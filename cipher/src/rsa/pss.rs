//! = RFC 8017
//!
//! == PKCS #1 v2.1
//!
//! === EMSA-PSS (Probabilistic Signature Scheme)

use crate::rsa::mgf::{mgf1, to_fixed_be, xor_mask};
use crate::rsa::{ExpVariant, PrivateKey, PublicKey};
use crate::{CipherError, Rand, Sign, Verify};
use crypto_hash::Digest;
use log::debug;
use num_bigint::BigUint;
use std::cell::RefCell;
use std::io::Write;

pub struct PssVerify<H: Digest, R: Rand> {
    key: PublicKey,
    hf: RefCell<H>,
    rd: RefCell<R>,
    hlen: usize,
    // fixed to hlen: the salt always spans one digest
    slen: usize,
}

pub struct PssSign<H: Digest, R: Rand> {
    key: PrivateKey,
    pss: PssVerify<H, R>,
    variant: ExpVariant,
}

impl<H: Digest, R: Rand> PssVerify<H, R> {
    pub fn new(key: PublicKey, hasher: H, rng: R) -> Result<Self, CipherError> {
        let hlen = H::DIGEST_BITS >> 3;
        let slen = hlen;
        key.is_valid()?;

        let em_len = (key.modulus().bits() as usize + 6) >> 3;
        if em_len < hlen + slen + 2 {
            return Err(CipherError::Other(
                "rsa-pss: the modulus is too short for digest and salt".to_string(),
            ));
        }

        Ok(Self {
            key,
            hf: RefCell::new(hasher),
            rd: RefCell::new(rng),
            hlen,
            slen,
        })
    }

    pub fn key_len(&self) -> usize {
        self.key.byte_len()
    }

    /// bits of the encoded message, `bits(n) - 1`
    pub fn em_bits(&self) -> usize {
        self.key.modulus().bits() as usize - 1
    }

    pub fn em_len(&self) -> usize {
        (self.em_bits() + 7) >> 3
    }

    pub fn salt_len(&self) -> usize {
        self.slen
    }

    fn message_hash(&self, msg: &[u8]) -> Vec<u8> {
        let mut hf = self.hf.borrow_mut();
        hf.reset();
        hf.write_all(msg).unwrap();
        hf.finish()
    }

    // em = maskedDB || H || 0xbc
    // H = hash(0x00 * 8 || m_hash || salt)
    // db = ps || 0x01 || salt
    // maskedDB = db ^ MGF1(H, em_len - hlen - 1)
    fn emsa_pss_encode(
        &self,
        m_hash: &[u8],
        salt: &[u8],
        em: &mut Vec<u8>,
    ) -> Result<(), CipherError> {
        let (em_len, em_bits) = (self.em_len(), self.em_bits());
        let (hlen, slen) = (self.hlen, self.slen);
        if em_len < hlen + slen + 2 {
            return Err(CipherError::PSSError(
                "encoded message cannot hold digest and salt".to_string(),
            ));
        }

        em.clear();
        em.resize(em_len, 0);

        let mut hf = self.hf.borrow_mut();
        hf.reset();
        hf.write_all(&[0u8; 8]).unwrap();
        hf.write_all(m_hash).unwrap();
        hf.write_all(salt).unwrap();
        let h = hf.finish();

        let db_len = em_len - hlen - 1;
        em[db_len..(em_len - 1)].copy_from_slice(&h);
        em[em_len - 1] = 0xbc;
        em[db_len - slen - 1] = 0x01;
        em[(db_len - slen)..db_len].copy_from_slice(salt);

        let db_mask = mgf1(&mut *hf, &h, db_len);
        drop(hf);
        xor_mask(&mut em[..db_len], &db_mask);

        // clear the bits above em_bits in the leftmost byte
        em[0] &= 0xffu8 >> ((em_len << 3) - em_bits);

        Ok(())
    }

    fn emsa_pss_verify(&self, m_hash: &[u8], em: &mut [u8]) -> Result<(), CipherError> {
        let (em_len, em_bits) = (self.em_len(), self.em_bits());
        let (hlen, slen) = (self.hlen, self.slen);

        if em.len() != em_len {
            return Err(CipherError::PSSError(
                "encoded message length mismatch".to_string(),
            ));
        }
        if em[em_len - 1] != 0xbc {
            return Err(CipherError::PSSError("trailer is not 0xbc".to_string()));
        }

        let keep: u8 = 0xffu8 >> ((em_len << 3) - em_bits);
        if em[0] & !keep != 0 {
            return Err(CipherError::PSSError(
                "bits above em_bits are not zero".to_string(),
            ));
        }

        let db_len = em_len - hlen - 1;
        let h = em[db_len..(em_len - 1)].to_vec();
        let db_mask = {
            let mut hf = self.hf.borrow_mut();
            mgf1(&mut *hf, &h, db_len)
        };
        xor_mask(&mut em[..db_len], &db_mask);
        em[0] &= keep;

        // db = ps || 0x01 || salt, the salt length is fixed
        if em[..(db_len - slen - 1)].iter().any(|&x| x != 0) {
            return Err(CipherError::PSSError(
                "padding string is not zero".to_string(),
            ));
        }
        if em[db_len - slen - 1] != 0x01 {
            return Err(CipherError::PSSError("salt separator missing".to_string()));
        }

        let mut hf = self.hf.borrow_mut();
        hf.reset();
        hf.write_all(&[0u8; 8]).unwrap();
        hf.write_all(m_hash).unwrap();
        hf.write_all(&em[(db_len - slen)..db_len]).unwrap();
        let expected = hf.finish();

        if expected != h {
            return Err(CipherError::PSSError("digest mismatch".to_string()));
        }

        Ok(())
    }

    fn verify_inner(&self, msg: &[u8], signature: &[u8]) -> Result<(), CipherError> {
        let s = BigUint::from_bytes_be(signature);
        let m = self
            .key
            .rsaep(&s)
            .map_err(|_| CipherError::PSSError("signature out of range".to_string()))?;

        if ((m.bits() as usize + 7) >> 3) > self.em_len() {
            return Err(CipherError::PSSError(
                "encoded message wider than em_len".to_string(),
            ));
        }

        let mut em = to_fixed_be(&m, self.em_len())?;
        let m_hash = self.message_hash(msg);
        self.emsa_pss_verify(&m_hash, &mut em)
    }
}

impl<H: Digest, R: Rand> PssSign<H, R> {
    pub fn new(key: PrivateKey, hasher: H, rng: R) -> Result<Self, CipherError> {
        key.is_valid()?;
        let pss = PssVerify::new(key.public_key().clone(), hasher, rng)?;

        Ok(Self {
            key,
            pss,
            variant: ExpVariant::default(),
        })
    }

    /// Select the private-exponentiation strategy; blinded CRT by default.
    pub fn with_variant(mut self, variant: ExpVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn key_len(&self) -> usize {
        self.pss.key_len()
    }

    fn sign_inner(&self, msg: &[u8], signature: &mut Vec<u8>) -> Result<(), CipherError> {
        let m_hash = self.pss.message_hash(msg);

        let mut salt = vec![0u8; self.pss.slen];
        self.pss.rd.borrow_mut().rand(&mut salt);

        let mut em = Vec::new();
        self.pss.emsa_pss_encode(&m_hash, &salt, &mut em)?;

        let m = BigUint::from_bytes_be(&em);
        let s = self
            .key
            .rsadp(&m, self.variant, &mut *self.pss.rd.borrow_mut())?;
        signature.extend_from_slice(&to_fixed_be(&s, self.pss.key_len())?);

        Ok(())
    }
}

impl<H: Digest, R: Rand> Sign for PssSign<H, R> {
    fn sign(&self, msg: &[u8], signature: &mut Vec<u8>) -> Result<(), CipherError> {
        self.sign_inner(msg, signature)
    }
}

impl<H: Digest, R: Rand> Verify for PssVerify<H, R> {
    fn verify(&self, msg: &[u8], signature: &[u8]) -> bool {
        self.verify_inner(msg, signature)
            .map_err(|cause| debug!("rsa-pss: {}", cause))
            .is_ok()
    }
}

impl<H: Digest, R: Rand> Verify for PssSign<H, R> {
    fn verify(&self, msg: &[u8], signature: &[u8]) -> bool {
        self.pss
            .verify_inner(msg, signature)
            .map_err(|cause| debug!("rsa-pss: {}", cause))
            .is_ok()
    }
}

impl<H: Digest, R: Rand> AsRef<PssVerify<H, R>> for PssSign<H, R> {
    fn as_ref(&self) -> &PssVerify<H, R> {
        &self.pss
    }
}

impl<H: Digest, R: Rand> From<PssSign<H, R>> for PssVerify<H, R> {
    fn from(value: PssSign<H, R>) -> Self {
        value.pss
    }
}

#[cfg(test)]
mod tests {
    use super::{PssSign, PssVerify};
    use crate::rsa::tests::{fixture_key, test_stream};
    use crate::rsa::ExpVariant;
    use crate::{Sign, Verify};
    use crypto_hash::sha2::SHA256;

    fn signer() -> PssSign<SHA256, rng::BlumBlumShub> {
        PssSign::new(fixture_key(), SHA256::new(), test_stream(3)).unwrap()
    }

    fn verifier() -> PssVerify<SHA256, rng::BlumBlumShub> {
        PssVerify::new(
            fixture_key().public_key().clone(),
            SHA256::new(),
            test_stream(4),
        )
        .unwrap()
    }

    #[test]
    fn sign_verify_round_trip() {
        let msg = "Ceci est un message à signer".as_bytes();

        for variant in [
            ExpVariant::Plain,
            ExpVariant::Blinded,
            ExpVariant::Crt,
            ExpVariant::CrtBlinded,
        ] {
            let signer = signer().with_variant(variant);

            let mut signature = vec![];
            signer.sign(msg, &mut signature).unwrap();
            assert_eq!(signature.len(), signer.key_len());

            assert!(verifier().verify(msg, &signature), "variant {:?}", variant);
        }
    }

    #[test]
    fn tampering_is_detected() {
        let msg = "Ceci est un message à signer".as_bytes();

        let mut signature = vec![];
        signer().sign(msg, &mut signature).unwrap();
        let verifier = verifier();
        assert!(verifier.verify(msg, &signature));

        let mut bent = signature.clone();
        bent[17] ^= 0x40;
        assert!(!verifier.verify(msg, &bent));

        let mut other = msg.to_vec();
        other[0] ^= 0x01;
        assert!(!verifier.verify(&other, &signature));
    }

    #[test]
    fn trailer_must_be_bc() {
        let verifier = verifier();
        let m_hash = verifier.message_hash(b"trailer check");

        let (mut em, salt) = (vec![], [0x5au8; 32]);
        verifier.emsa_pss_encode(&m_hash, &salt, &mut em).unwrap();
        verifier.emsa_pss_verify(&m_hash, &mut em.clone()).unwrap();

        let last = em.len() - 1;
        em[last] = 0xbb;
        assert!(verifier.emsa_pss_verify(&m_hash, &mut em).is_err());
    }

    #[test]
    fn reserved_top_bits_must_be_zero() {
        let verifier = verifier();
        let m_hash = verifier.message_hash(b"top bits");

        let (mut em, salt) = (vec![], [0xa5u8; 32]);
        verifier.emsa_pss_encode(&m_hash, &salt, &mut em).unwrap();

        // 1024-bit modulus leaves exactly one reserved bit
        em[0] |= 0x80;
        assert!(verifier.emsa_pss_verify(&m_hash, &mut em).is_err());
    }

    #[test]
    fn fixed_salt_encode_is_reproducible() {
        let verifier = verifier();
        let m_hash = verifier.message_hash(b"determinism");
        let salt = [7u8; 32];

        let (mut a, mut b) = (vec![], vec![]);
        verifier.emsa_pss_encode(&m_hash, &salt, &mut a).unwrap();
        verifier.emsa_pss_encode(&m_hash, &salt, &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signature_out_of_range_is_false() {
        let verifier = verifier();
        let too_big = vec![0xffu8; verifier.key_len()];
        assert!(!verifier.verify(b"range", &too_big));
    }
}
