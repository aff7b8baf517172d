use std::io::{Read, Write};

pub trait Encode {
    /// Returns the read and written byte counts.
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

pub trait Decode {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError>;
}

mod base64;
pub use base64::Base64;

mod error;
pub use error::EncodeError;
