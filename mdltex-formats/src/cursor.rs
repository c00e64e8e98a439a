//! Bounds-checked little-endian reader
//!
//! Every fixed-width read either returns the full value or fails with
//! [`FormatError::OutOfBounds`] without moving the cursor. Positioning
//! (`seek`/`skip`) clamps to the buffer end instead of failing.

use crate::error::FormatError;
use crate::limits::VERSION_TAG_LEN;
use crate::scan::{SniffedString, sniff_string_field};

/// Parsed "MDLV0013"-style version tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionTag {
    /// Decimal version at character offset 4, or 0 when absent/non-numeric
    pub version: u32,
    /// Tag text with NUL bytes stripped
    pub text: String,
}

impl VersionTag {
    /// Interpret raw tag bytes against an expected prefix
    pub fn parse(raw: &[u8], prefix: &str) -> Self {
        let stripped: Vec<u8> = raw.iter().copied().filter(|&b| b != 0).collect();
        let text = String::from_utf8_lossy(&stripped).into_owned();

        if !text.starts_with(prefix) {
            return Self { version: 0, text };
        }

        let digits: String = text.chars().skip(4).take(4).collect();
        let version = if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            digits.parse().unwrap_or(0)
        } else {
            0
        };

        Self { version, text }
    }
}

/// Read-only cursor over a borrowed byte buffer
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer size
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current position
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move to an absolute offset, clamped to the buffer end
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.data.len());
    }

    /// Move forward by `n` bytes, clamped to the buffer end
    pub fn skip(&mut self, n: usize) {
        self.seek(self.pos.saturating_add(n));
    }

    /// Move to the buffer end
    pub fn seek_to_end(&mut self) {
        self.pos = self.data.len();
    }

    /// Up to `n` bytes from the current position, without consuming them
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let end = self.pos.saturating_add(n).min(self.data.len());
        &self.data[self.pos..end]
    }

    /// Everything from the current position to the end
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Read exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::OutOfBounds {
                offset: self.pos,
                requested: n,
                size: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32, FormatError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, FormatError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read `N` consecutive floats
    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N], FormatError> {
        // Check the whole run up front so a short read leaves the cursor untouched
        if N * 4 > self.remaining() {
            return Err(FormatError::OutOfBounds {
                offset: self.pos,
                requested: N * 4,
                size: self.data.len(),
            });
        }
        let mut out = [0.0f32; N];
        for value in out.iter_mut() {
            *value = self.read_f32()?;
        }
        Ok(out)
    }

    /// Read `N` consecutive u32 values
    pub fn read_u32_array<const N: usize>(&mut self) -> Result<[u32; N], FormatError> {
        if N * 4 > self.remaining() {
            return Err(FormatError::OutOfBounds {
                offset: self.pos,
                requested: N * 4,
                size: self.data.len(),
            });
        }
        let mut out = [0u32; N];
        for value in out.iter_mut() {
            *value = self.read_u32()?;
        }
        Ok(out)
    }

    /// Read a NUL-terminated string
    ///
    /// Consumes up to and including the terminator (or to the buffer end)
    /// and decodes the bytes before it as lossy UTF-8. Never fails.
    pub fn read_cstring(&mut self) -> String {
        let rest = self.rest();
        let (text, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], nul + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        String::from_utf8_lossy(text).into_owned()
    }

    /// Read a 9-byte version tag and check it against `prefix`
    ///
    /// A tag that does not start with `prefix` yields version 0 together
    /// with its text; only a short buffer is an error.
    pub fn read_versioned_tag(&mut self, prefix: &str) -> Result<VersionTag, FormatError> {
        let raw = self.read_bytes(VERSION_TAG_LEN)?;
        Ok(VersionTag::parse(raw, prefix))
    }

    /// Read a string that is either length-prefixed or inline NUL-terminated
    ///
    /// See [`sniff_string_field`] for the classification rule.
    pub fn read_adaptive_string(&mut self) -> Result<SniffedString, FormatError> {
        let sniffed = sniff_string_field(self.rest()).map_err(|e| match e {
            FormatError::OutOfBounds {
                offset, requested, ..
            } => FormatError::OutOfBounds {
                offset: self.pos + offset,
                requested,
                size: self.data.len(),
            },
            other => other,
        })?;
        self.pos += sniffed.consumed;
        Ok(sniffed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_reads_little_endian() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-2i32).to_le_bytes());
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        data.extend_from_slice(&(-3i16).to_le_bytes());
        data.extend_from_slice(&0xBEEFu16.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_i32().unwrap(), -2);
        assert_eq!(cursor.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(cursor.read_i16().unwrap(), -3);
        assert_eq!(cursor.read_u16().unwrap(), 0xBEEF);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_short_read_fails_without_moving() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(1);

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            FormatError::OutOfBounds {
                offset: 1,
                requested: 4,
                size: 3
            }
        );
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_float_array_is_all_or_nothing() {
        let data = [0u8; 10];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.read_f32_array::<3>().is_err());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_f32_array::<2>().unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn test_seek_and_skip_clamp() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        cursor.seek(100);
        assert_eq!(cursor.position(), 8);
        cursor.seek(2);
        cursor.skip(usize::MAX);
        assert_eq!(cursor.position(), 8);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_cstring_terminated_and_unterminated() {
        let data = b"bone_01\0tail";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_cstring(), "bone_01");
        assert_eq!(cursor.position(), 8);
        assert_eq!(cursor.read_cstring(), "tail");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.read_cstring(), "");
    }

    #[test]
    fn test_cstring_lossy_utf8() {
        let data = [b'a', 0xFF, b'b', 0];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_cstring(), "a\u{FFFD}b");
    }

    #[test]
    fn test_versioned_tag() {
        let mut cursor = ByteCursor::new(b"MDLV0013\0rest");
        let tag = cursor.read_versioned_tag("MDL").unwrap();
        assert_eq!(tag.version, 13);
        assert_eq!(tag.text, "MDLV0013");
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn test_versioned_tag_wrong_prefix_is_soft() {
        let mut cursor = ByteCursor::new(b"TEXV0005\0");
        let tag = cursor.read_versioned_tag("MDL").unwrap();
        assert_eq!(tag.version, 0);
        assert_eq!(tag.text, "TEXV0005");
    }

    #[test]
    fn test_versioned_tag_non_numeric() {
        let tag = VersionTag::parse(b"MDLAxx01\0", "MDL");
        assert_eq!(tag.version, 0);
        assert_eq!(tag.text, "MDLAxx01");
    }

    #[test]
    fn test_versioned_tag_short_buffer() {
        let mut cursor = ByteCursor::new(b"MDLV");
        assert!(cursor.read_versioned_tag("MDL").unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let data = [9u8, 8, 7];
        let cursor = ByteCursor::new(&data);
        assert_eq!(cursor.peek(2), &[9, 8]);
        assert_eq!(cursor.peek(10), &[9, 8, 7]);
        assert_eq!(cursor.position(), 0);
    }
}
