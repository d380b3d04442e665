//! Bounds-checked little-endian reading over an in-memory byte buffer.
//!
//! [`ByteCursor`] is the low-level reader the container parser is built on:
//! it borrows a byte slice, tracks a position, and hands out zero-copy views
//! tied to the backing buffer's lifetime. Every read is bounds-checked and
//! an overrun reports requested-versus-remaining bytes; there is no silent
//! short read.

use crate::error::{OxiRarError, Result};

/// A bounds-checked, position-tracking little-endian cursor over a byte
/// slice.
///
/// The cursor owns only its position; all data access goes through the
/// borrowed buffer, and slices returned by [`read_bytes`](Self::read_bytes)
/// and friends share the buffer's lifetime.
///
/// # Example
///
/// ```
/// use oxirar_core::cursor::ByteCursor;
///
/// let data = [0x34, 0x12, 0xAB];
/// let mut cur = ByteCursor::new(&data);
/// assert_eq!(cur.read_u16().unwrap(), 0x1234);
/// assert_eq!(cur.read_u8().unwrap(), 0xAB);
/// assert!(cur.at_end());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes remaining between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the position has reached the end of the buffer.
    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn check(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(OxiRarError::buffer_too_small(needed, self.remaining()));
        }
        Ok(())
    }

    /// Move the position to an absolute offset.
    ///
    /// Seeking to `len()` (one past the last byte) is allowed; anything
    /// beyond fails.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OxiRarError::buffer_too_small(pos, self.data.len()));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance the position by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.check(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.check(2)?;
        let v = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.check(4)?;
        let v = u32::from_le_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    /// Read a little-endian `u64`, composed from two 32-bit halves.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.check(8)?;
        let low = self.read_u32()? as u64;
        let high = self.read_u32()? as u64;
        Ok((high << 32) | low)
    }

    /// Read `n` bytes as a zero-copy slice of the backing buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Look at the next `n` bytes without advancing.
    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Look at the next byte without advancing.
    pub fn peek_u8(&self) -> Result<u8> {
        self.check(1)?;
        Ok(self.data[self.pos])
    }

    /// Read bytes up to (and consuming) the next NUL terminator.
    ///
    /// Fails if the buffer ends before a NUL is found.
    pub fn read_null_terminated_string(&mut self) -> Result<String> {
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                let s = String::from_utf8_lossy(&rest[..nul]).into_owned();
                self.pos += nul + 1;
                Ok(s)
            }
            None => Err(OxiRarError::buffer_too_small(
                rest.len() + 1,
                rest.len(),
            )),
        }
    }

    /// Read a fixed-size string field of `n` bytes.
    ///
    /// The result is truncated at the first embedded NUL, but the cursor
    /// always advances by the full `n` bytes.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let raw = self.read_bytes(n)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Read `n` raw bytes as a string, with no NUL truncation.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let raw = self.read_bytes(n)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Split off a bounded child cursor over the next `n` bytes.
    ///
    /// The parent advances past the `n` bytes immediately, so a consumer
    /// that under-reads the child can never desynchronize the parent.
    pub fn sub_reader(&mut self, n: usize) -> Result<ByteCursor<'a>> {
        let slice = self.read_bytes(n)?;
        Ok(ByteCursor::new(slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_reads() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_u8().unwrap(), 0x01);
        assert_eq!(cur.read_u16().unwrap(), 0x1234);
        assert_eq!(cur.read_u32().unwrap(), 0x12345678);
        assert_eq!(cur.position(), 7);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_read_u64_composed() {
        let data = [0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_u64().unwrap(), 0x0123456789ABCDEF);
    }

    #[test]
    fn test_underrun_reports_requested_vs_remaining() {
        let data = [0x00, 0x01];
        let mut cur = ByteCursor::new(&data);
        cur.skip(1).unwrap();
        let err = cur.read_u32().unwrap_err();
        assert!(matches!(
            err,
            OxiRarError::BufferTooSmall {
                needed: 4,
                available: 1
            }
        ));
        // A failed read must not move the position.
        assert_eq!(cur.position(), 1);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut cur = ByteCursor::new(&data);
        cur.seek(4).unwrap();
        assert!(cur.at_end());
        assert!(cur.seek(5).is_err());
        assert_eq!(cur.position(), 4);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0xAA, 0xBB];
        let cur_data = &data[..];
        let mut cur = ByteCursor::new(cur_data);
        assert_eq!(cur.peek_u8().unwrap(), 0xAA);
        assert_eq!(cur.peek_bytes(2).unwrap(), &[0xAA, 0xBB]);
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_u8().unwrap(), 0xAA);
    }

    #[test]
    fn test_read_bytes_zero_copy() {
        let data = [1u8, 2, 3, 4];
        let mut cur = ByteCursor::new(&data);
        let slice = cur.read_bytes(3).unwrap();
        assert_eq!(slice.as_ptr(), data.as_ptr());
        assert_eq!(slice, &[1, 2, 3]);
    }

    #[test]
    fn test_null_terminated_string() {
        let data = b"disk1\0rest";
        let mut cur = ByteCursor::new(data);
        assert_eq!(cur.read_null_terminated_string().unwrap(), "disk1");
        assert_eq!(cur.position(), 6);

        let mut cur = ByteCursor::new(b"no terminator");
        assert!(cur.read_null_terminated_string().is_err());
    }

    #[test]
    fn test_fixed_string_truncates_but_advances() {
        let data = b"ab\0cdEF";
        let mut cur = ByteCursor::new(data);
        assert_eq!(cur.read_fixed_string(5).unwrap(), "ab");
        assert_eq!(cur.position(), 5);
        assert_eq!(cur.read_string(2).unwrap(), "EF");
    }

    #[test]
    fn test_raw_string_keeps_nul() {
        let data = b"a\0b";
        let mut cur = ByteCursor::new(data);
        assert_eq!(cur.read_string(3).unwrap(), "a\0b");
    }

    #[test]
    fn test_sub_reader_advances_parent() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cur = ByteCursor::new(&data);
        let mut sub = cur.sub_reader(3).unwrap();
        assert_eq!(cur.position(), 3);
        assert_eq!(sub.read_u8().unwrap(), 1);
        assert_eq!(sub.remaining(), 2);
        // Under-reading the child leaves the parent untouched.
        assert_eq!(cur.read_u8().unwrap(), 4);
        // The child is bounded: it cannot see past its slice.
        assert!(sub.read_u32().is_err());
    }
}
