// Path: crates/codec/src/cursor.rs

//! A bounds-checked forward cursor over a borrowed byte buffer.
//!
//! The cursor exclusively owns its offset; decoding state is never shared.
//! Every read either yields exactly the requested bytes or fails with
//! `CodecError::UnexpectedEof`.

use tessera_types::CodecError;

/// Forward-only reader over `buf`, tracking the current offset.
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Starts a cursor at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether the buffer is fully consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).ok_or(CodecError::UnexpectedEof {
            wanted: n,
            remaining: self.remaining(),
        })?;
        let slice = self.buf.get(self.pos..end).ok_or(CodecError::UnexpectedEof {
            wanted: n,
            remaining: self.remaining(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    /// Takes a single byte.
    pub fn take_u8(&mut self) -> Result<u8, CodecError> {
        let slice = self.take(1)?;
        slice.first().copied().ok_or(CodecError::UnexpectedEof {
            wanted: 1,
            remaining: 0,
        })
    }

    /// Takes a boolean flag byte. Zero is `false`, anything else `true`.
    pub fn take_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.take_u8()? != 0)
    }

    /// Takes an unsigned LEB128-style variable-length integer.
    ///
    /// Little-endian base-128 groups: each byte contributes its low 7 bits,
    /// the high bit signals continuation. Values must fit in 64 bits.
    pub fn take_varint(&mut self) -> Result<u64, CodecError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.take_u8()?;
            let payload = u64::from(byte & 0x7f);
            if shift >= 64 || (shift == 63 && payload > 1) {
                return Err(CodecError::VarintOverflow);
            }
            value |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_in_order() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4]);
        assert_eq!(cursor.take(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.take_u8().unwrap(), 3);
        assert_eq!(cursor.remaining(), 1);
        assert!(!cursor.is_empty());
        assert_eq!(cursor.take(1).unwrap(), &[4]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn take_past_end_fails() {
        let mut cursor = ByteCursor::new(&[1, 2]);
        let err = cursor.take(3).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnexpectedEof {
                wanted: 3,
                remaining: 2
            }
        );
        // A failed read consumes nothing.
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn varint_single_byte() {
        let mut cursor = ByteCursor::new(&[0x2a]);
        assert_eq!(cursor.take_varint().unwrap(), 42);
    }

    #[test]
    fn varint_multi_byte_little_endian_groups() {
        // 300 = 0b100101100 -> 0xac 0x02
        let mut cursor = ByteCursor::new(&[0xac, 0x02]);
        assert_eq!(cursor.take_varint().unwrap(), 300);

        // 1_000_000 (one token in raw units) -> 0xc0 0x84 0x3d
        let mut cursor = ByteCursor::new(&[0xc0, 0x84, 0x3d]);
        assert_eq!(cursor.take_varint().unwrap(), 1_000_000);
    }

    #[test]
    fn varint_truncated_fails() {
        let mut cursor = ByteCursor::new(&[0xff]);
        assert_eq!(
            cursor.take_varint().unwrap_err(),
            CodecError::UnexpectedEof {
                wanted: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn varint_overflow_fails() {
        // Ten continuation bytes push past 64 bits.
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.take_varint().unwrap_err(), CodecError::VarintOverflow);
    }

    #[test]
    fn bool_flags() {
        let mut cursor = ByteCursor::new(&[0, 255, 1]);
        assert!(!cursor.take_bool().unwrap());
        assert!(cursor.take_bool().unwrap());
        assert!(cursor.take_bool().unwrap());
    }
}
