//! Portable key documents.
//!
//! A key serializes as UTF-8 JSON whose values are tagged big integers, the
//! decimal digits followed by a literal `n` marker (`"65537n"`), and the
//! document is wrapped in standard base64. This is the only external key
//! representation; decoders also accept plain decimal strings.

use crate::rsa::{PrivateKey, PublicKey};
use crate::CipherError;
use encode::{Base64, Decode, Encode};
use serde::{Deserialize, Serialize};

mod tagged {
    use num_bigint::BigUint;
    use num_traits::Num;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(x: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{}n", x))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(d)?;
        let digits = s.strip_suffix('n').unwrap_or(&s);
        BigUint::from_str_radix(digits, 10)
            .map_err(|_| D::Error::custom(format!("invalid big integer `{}`", s)))
    }
}

use num_bigint::BigUint;

#[derive(Serialize, Deserialize)]
struct PublicKeyDoc {
    #[serde(with = "tagged")]
    n: BigUint,
    #[serde(with = "tagged")]
    e: BigUint,
}

#[derive(Serialize, Deserialize)]
struct PrivateKeyDoc {
    #[serde(with = "tagged")]
    p: BigUint,
    #[serde(with = "tagged")]
    q: BigUint,
    #[serde(with = "tagged")]
    e: BigUint,
    #[serde(with = "tagged")]
    d: BigUint,
    #[serde(with = "tagged")]
    n: BigUint,
    #[serde(with = "tagged")]
    phi: BigUint,
    #[serde(with = "tagged")]
    dp: BigUint,
    #[serde(with = "tagged")]
    dq: BigUint,
    #[serde(with = "tagged")]
    qinv: BigUint,
}

fn wrap<T: Serialize>(doc: &T) -> Result<String, CipherError> {
    let json = serde_json::to_vec(doc)
        .map_err(|e| CipherError::Other(format!("key serialization failed: {}", e)))?;

    let mut blob = Vec::with_capacity(json.len() / 3 * 4 + 4);
    Base64::new(true).encode(&mut json.as_slice(), &mut blob)?;
    Ok(String::from_utf8(blob).expect("base64 output is ascii"))
}

fn unwrap_blob(blob: &str) -> Result<Vec<u8>, CipherError> {
    let mut json = Vec::with_capacity(blob.len());
    Base64::new(true).decode(&mut blob.trim().as_bytes(), &mut json)?;
    Ok(json)
}

impl PublicKey {
    pub fn to_base64(&self) -> Result<String, CipherError> {
        wrap(&PublicKeyDoc {
            n: self.modulus().clone(),
            e: self.exponent().clone(),
        })
    }

    pub fn from_base64(blob: &str) -> Result<Self, CipherError> {
        let json = unwrap_blob(blob)?;
        let doc: PublicKeyDoc = serde_json::from_slice(&json)
            .map_err(|e| CipherError::DecodingError(format!("public key blob: {}", e)))?;

        let key = PublicKey::new_uncheck(doc.n, doc.e);
        key.is_valid()
            .map_err(|e| CipherError::DecodingError(format!("{}", e)))?;
        Ok(key)
    }
}

impl PrivateKey {
    pub fn to_base64(&self) -> Result<String, CipherError> {
        wrap(&PrivateKeyDoc {
            p: self.p().clone(),
            q: self.q().clone(),
            e: self.public_key().exponent().clone(),
            d: self.d().clone(),
            n: self.modulus().clone(),
            phi: self.phi().clone(),
            dp: self.d_p().clone(),
            dq: self.d_q().clone(),
            qinv: self.q_inv().clone(),
        })
    }

    pub fn from_base64(blob: &str) -> Result<Self, CipherError> {
        let json = unwrap_blob(blob)?;
        let doc: PrivateKeyDoc = serde_json::from_slice(&json)
            .map_err(|e| CipherError::DecodingError(format!("private key blob: {}", e)))?;

        let key = PrivateKey::from_parts(
            doc.p, doc.q, doc.n, doc.e, doc.d, doc.phi, doc.dp, doc.dq, doc.qinv,
        );
        key.is_valid()
            .map_err(|e| CipherError::DecodingError(format!("inconsistent private key: {}", e)))?;
        Ok(key)
    }
}
