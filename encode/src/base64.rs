use crate::{Decode, Encode, EncodeError};
use std::io::{Read, Write};

#[derive(Clone)]
pub struct Base64 {
    table: &'static [u8; 64],
    // 0xff marks symbols outside the alphabet
    rev: [u8; 256],
}

impl Base64 {
    const STD: &'static [u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const URL: &'static [u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    /// `is_std` selects the standard alphabet, otherwise the URL-safe one.
    pub fn new(is_std: bool) -> Self {
        let table = if is_std { Self::STD } else { Self::URL };

        let mut rev = [0xffu8; 256];
        for (idx, &sym) in table.iter().enumerate() {
            rev[sym as usize] = idx as u8;
        }

        Self { table, rev }
    }
}

impl Encode for Base64 {
    fn encode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut buf, mut olen) = (Vec::with_capacity(1024), 0);
        let ilen = in_data.read_to_end(&mut buf)?;

        for chunk in buf.chunks(3) {
            let group = ((chunk[0] as u32) << 16)
                | ((*chunk.get(1).unwrap_or(&0) as u32) << 8)
                | (*chunk.get(2).unwrap_or(&0) as u32);

            let mut quad = [b'='; 4];
            for (i, sym) in quad.iter_mut().take(chunk.len() + 1).enumerate() {
                *sym = self.table[((group >> (18 - 6 * i)) & 0x3f) as usize];
            }

            out_data.write_all(&quad)?;
            olen += 4;
        }

        Ok((ilen, olen))
    }
}

impl Decode for Base64 {
    fn decode<R: Read, W: Write>(
        &mut self,
        in_data: &mut R,
        out_data: &mut W,
    ) -> Result<(usize, usize), EncodeError> {
        let (mut buf, mut olen) = (Vec::with_capacity(1024), 0);
        let ilen = in_data.read_to_end(&mut buf)?;

        if buf.is_empty() {
            return Ok((0, 0));
        } else if buf.len() % 4 != 0 {
            return Err(EncodeError::InvalidLenInDec(buf.len()));
        }

        let pad = buf.iter().rev().take_while(|&&sym| sym == b'=').count();
        if pad > 2 {
            return Err(EncodeError::InvalidSymbolInDec('='));
        }

        let (mut acc, mut nbits) = (0u32, 0usize);
        for &sym in buf[..buf.len() - pad].iter() {
            let idx = self.rev[sym as usize];
            if idx == 0xff {
                return Err(EncodeError::InvalidSymbolInDec(char::from(sym)));
            }

            acc = (acc << 6) | idx as u32;
            nbits += 6;
            if nbits >= 8 {
                nbits -= 8;
                out_data.write_all(&[(acc >> nbits) as u8])?;
                olen += 1;
            }
        }

        Ok((ilen, olen))
    }
}
