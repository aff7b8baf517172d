//! Generated-key coverage shared by the padding and codec tests.

use crate::rsa::{ExpVariant, OAEPDecrypt, OAEPEncrypt, PrivateKey, PssSign, PssVerify};
use crate::{Decrypt, DefaultRand, Encrypt, Sign, Verify};
use crypto_hash::sha2::SHA256;
use num_bigint::BigUint;
use num_traits::{Num, One};
use rng::BlumBlumShub;
use utils::BigUintExt;

/// 1024-bit key from the RSA Labs PSS example vectors.
pub(in crate::rsa) fn fixture_key() -> PrivateKey {
    let e = BigUint::from(0x10001u32);
    let p = BigUint::from_str_radix(
        "c5d940adfaee20d634f1aed7768dc40b050873f75e4d2eb192eba01db5896a90c4362c7a3f83cd3116aebc178dcb00cb321d760d9c9edfe4fb191f6c169b8c5b",
        16,
    )
    .unwrap();
    let q = BigUint::from_str_radix(
        "d6a304998f9c9c81afdc04d39adab29ef4c98574cfa73464bee5dc16c36e1d95b2276e0486f49020f5d06b7dc524032c3a2929f2f25c7b482e52bc835861b5b7",
        16,
    )
    .unwrap();

    PrivateKey::from_factors(p, q, e).unwrap()
}

/// Deterministic stream so padding randomness is reproducible per test.
pub(in crate::rsa) fn test_stream(lane: u32) -> BlumBlumShub {
    BlumBlumShub::new(
        &BigUint::from(0x0bad5eedu32 + lane),
        super::BBS_P,
        super::BBS_Q,
        16,
    )
}

fn fresh_stream(rng: &mut DefaultRand) -> BlumBlumShub {
    BlumBlumShub::from_entropy(rng, super::BBS_P, super::BBS_Q, 16)
}

#[test]
fn rejects_sub_512_bit_request() {
    let mut rng = DefaultRand::default();
    assert!(PrivateKey::generate(256, &mut rng).is_err());
}

#[test]
fn minimum_width_keygen() {
    let mut rng = DefaultRand::default();
    let key = PrivateKey::generate(512, &mut rng).unwrap();

    let bits = key.modulus().bits();
    assert!(bits == 511 || bits == 512, "modulus of {} bits", bits);
    key.is_valid().unwrap();
}

#[test]
fn generated_key_end_to_end() {
    let mut rng = DefaultRand::default();
    let key = PrivateKey::generate(1024, &mut rng).unwrap();

    // modulus width and factor structure
    let bits = key.modulus().bits();
    assert!(bits == 1023 || bits == 1024, "modulus of {} bits", bits);
    for prime in [key.p(), key.q()] {
        assert!(BigUintExt(prime).is_prime(16));
        let half = (prime - 1u32) >> 1;
        assert!(BigUintExt(&half).is_prime(16), "factors must be safe primes");
    }
    let gap = if key.p() > key.q() {
        key.p() - key.q()
    } else {
        key.q() - key.p()
    };
    assert!(gap >= (BigUint::one() << 256), "factors too close");

    // arithmetic invariants
    key.is_valid().unwrap();
    assert!((key.d() * key.public_key().exponent() % key.phi()).is_one());

    // hardening bounds hold on the emitted exponent
    let n = key.modulus();
    assert!(key.d() > &(BigUintExt(n).nth_root(4) / 3u32));
    assert!(key.d() > &BigUintExt(n).nth_root(10).pow(3));
    assert!(key.d().count_ones() * 4 >= key.d().bits());

    // the portable blob reparses into the same key
    let blob = key.to_base64().unwrap();
    assert_eq!(PrivateKey::from_base64(&blob).unwrap(), key);

    // OAEP round trip across every private-op variant
    let msg = "Message à chiffrer".as_bytes();
    let encrypt = OAEPEncrypt::new(
        key.public_key().clone(),
        SHA256::new(),
        fresh_stream(&mut rng),
        b"",
    )
    .unwrap();
    let mut cipher = vec![];
    encrypt.encrypt(msg, &mut cipher).unwrap();

    for variant in [
        ExpVariant::Plain,
        ExpVariant::Blinded,
        ExpVariant::Crt,
        ExpVariant::CrtBlinded,
    ] {
        let decrypt = OAEPDecrypt::new(key.clone(), SHA256::new(), fresh_stream(&mut rng), b"")
            .unwrap()
            .with_variant(variant);

        let mut plain = vec![];
        decrypt.decrypt(&cipher, &mut plain).unwrap();
        assert_eq!(plain, msg, "variant {:?}", variant);
    }

    // PSS under the same key
    let sig_msg = "Ceci est un message à signer".as_bytes();
    let signer = PssSign::new(key.clone(), SHA256::new(), fresh_stream(&mut rng)).unwrap();
    let mut signature = vec![];
    signer.sign(sig_msg, &mut signature).unwrap();

    let verifier = PssVerify::new(
        key.public_key().clone(),
        SHA256::new(),
        fresh_stream(&mut rng),
    )
    .unwrap();
    assert!(verifier.verify(sig_msg, &signature));

    let mut bent = signature.clone();
    bent[0] ^= 0x10;
    assert!(!verifier.verify(sig_msg, &bent));

    let mut other = sig_msg.to_vec();
    other[3] ^= 0x01;
    assert!(!verifier.verify(&other, &signature));
}
