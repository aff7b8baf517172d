use std::{error::Error, fmt::Display};

#[derive(Debug)]
pub enum CipherError {
    /// plaintext over the padding capacity, or an integer form at or above
    /// the modulus
    InputTooLarge(String),

    /// any OAEP decode failure; the causes are deliberately collapsed so a
    /// caller cannot be used as a padding oracle
    OAEPError,

    /// PSS encode or verify failure; `Verify` surfaces this as `false`
    PSSError(String),

    PrimeGenerationExhausted {
        bits: usize,
        tries: usize,
    },

    /// the rejection loop over the private exponent ran out of restarts
    KeyHardeningExhausted(usize),

    /// malformed key blob
    DecodingError(String),

    IOError(std::io::Error),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherError::InputTooLarge(what) => {
                f.write_fmt(format_args!("Input too large: {what}"))
            }
            CipherError::OAEPError => f.write_str("OAEP decoding failed"),
            CipherError::PSSError(what) => f.write_fmt(format_args!("PSS failure: {what}")),
            CipherError::PrimeGenerationExhausted { bits, tries } => f.write_fmt(format_args!(
                "No {bits}-bit prime found within {tries} candidate draws"
            )),
            CipherError::KeyHardeningExhausted(restarts) => f.write_fmt(format_args!(
                "No acceptable private exponent within {restarts} restarts"
            )),
            CipherError::DecodingError(what) => {
                f.write_fmt(format_args!("Key decoding failed: {what}"))
            }
            CipherError::IOError(io_err) => f.write_fmt(format_args!("{}", io_err)),
            CipherError::Other(other) => f.write_str(other.as_str()),
        }
    }
}

impl Error for CipherError {}

impl From<std::io::Error> for CipherError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<encode::EncodeError> for CipherError {
    fn from(value: encode::EncodeError) -> Self {
        Self::DecodingError(format!("{}", value))
    }
}
