// Path: crates/types/src/chain/io.rs
//! Little-endian binary reader/writer for the chain's canonical layouts.
//!
//! The wire format uses Bitcoin-style variable-length integers for
//! collection counts and byte strings. Reads are bounds-checked and fail
//! with [`DecodeError`] instead of panicking; a malformed remote payload
//! must never take the harness down.

use crate::error::DecodeError;

/// Upper bound on any var-int driven allocation. Matches the VM's array
/// size cap times a generous item estimate; real payloads sit far below.
const MAX_VAR_LEN: u64 = 0x0200_0000;

pub struct BinReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BinReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails if any input is left over; callers use this to reject padded
    /// or concatenated payloads.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof(self.pos));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let b = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_le_bytes(raw))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_var_int(&mut self) -> Result<u64, DecodeError> {
        let tag = self.read_u8()?;
        let value = match tag {
            0xfd => self.read_u16()? as u64,
            0xfe => self.read_u32()? as u64,
            0xff => self.read_u64()?,
            n => n as u64,
        };
        if value > MAX_VAR_LEN {
            return Err(DecodeError::OversizedLength(value));
        }
        Ok(value)
    }

    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_var_int()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }

    pub fn read_var_string(&mut self) -> Result<String, DecodeError> {
        let raw = self.read_var_bytes()?;
        String::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8)
    }
}

/// Writer counterpart, used for hashing (unsigned encodings) and for test
/// fixtures. Infallible: it only appends to a `Vec`.
#[derive(Default)]
pub struct BinWriter {
    buf: Vec<u8>,
}

impl BinWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_u64(v as u64);
    }

    pub fn write_var_int(&mut self, v: u64) {
        match v {
            0..=0xfc => self.write_u8(v as u8),
            0xfd..=0xffff => {
                self.write_u8(0xfd);
                self.write_u16(v as u16);
            }
            0x1_0000..=0xffff_ffff => {
                self.write_u8(0xfe);
                self.write_u32(v as u32);
            }
            _ => {
                self.write_u8(0xff);
                self.write_u64(v);
            }
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_int(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    pub fn write_var_string(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_int_forms() {
        let mut w = BinWriter::new();
        w.write_var_int(0xfc);
        w.write_var_int(0xfd);
        w.write_var_int(0x1_0000);
        let bytes = w.into_bytes();
        let mut r = BinReader::new(&bytes);
        assert_eq!(r.read_var_int().unwrap(), 0xfc);
        assert_eq!(r.read_var_int().unwrap(), 0xfd);
        assert_eq!(r.read_var_int().unwrap(), 0x1_0000);
        r.finish().unwrap();
    }

    #[test]
    fn eof_is_an_error_not_a_panic() {
        let mut r = BinReader::new(&[0x01]);
        assert!(matches!(r.read_u32(), Err(DecodeError::UnexpectedEof(_))));
    }

    #[test]
    fn oversized_length_rejected() {
        let mut w = BinWriter::new();
        w.write_var_int(u64::MAX);
        let bytes = w.into_bytes();
        let mut r = BinReader::new(&bytes);
        assert!(matches!(
            r.read_var_int(),
            Err(DecodeError::OversizedLength(_))
        ));
    }

    #[test]
    fn trailing_bytes_detected() {
        let r = BinReader::new(&[0x00]);
        assert!(matches!(r.finish(), Err(DecodeError::TrailingBytes(1))));
    }
}
