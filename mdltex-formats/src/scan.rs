//! Content-sniffing helpers
//!
//! Pure functions from a byte window to a classification. Nothing here
//! owns a cursor; callers advance by whatever the result says was consumed.

use crate::error::FormatError;
use crate::limits::{
    HEADER_PROBE_LEN, HEADER_SCAN_WINDOW, MAX_FORMAT_CODE, MAX_INLINE_STRING_LEN,
    MAX_TEXTURE_DIMENSION,
};

/// First occurrence of `marker` at or after `from`
pub fn find_marker(data: &[u8], marker: &[u8], from: usize) -> Option<usize> {
    if marker.is_empty() || from >= data.len() {
        return None;
    }
    data[from..]
        .windows(marker.len())
        .position(|w| w == marker)
        .map(|i| from + i)
}

/// Six little-endian words that passed the header plausibility test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCandidate {
    pub offset: usize,
    pub format: i32,
    pub flags: i32,
    pub texture_width: i32,
    pub texture_height: i32,
    pub image_width: i32,
    pub image_height: i32,
}

fn word_at(data: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[offset..offset + 4]);
    i32::from_le_bytes(raw)
}

/// Brute-force search for a texture header
///
/// Probes offsets `[0, min(512, len - 32))` and returns the first where the
/// format code lies in `[0, 20]` and both container dimensions lie in
/// `(0, 16384)`.
pub fn scan_plausible_header(data: &[u8]) -> Option<HeaderCandidate> {
    let limit = HEADER_SCAN_WINDOW.min(data.len().saturating_sub(HEADER_PROBE_LEN));
    let plausible_dim = |v: i32| v > 0 && v < MAX_TEXTURE_DIMENSION;

    (0..limit).find_map(|offset| {
        let format = word_at(data, offset);
        let texture_width = word_at(data, offset + 8);
        let texture_height = word_at(data, offset + 12);

        if !(0..=MAX_FORMAT_CODE).contains(&format)
            || !plausible_dim(texture_width)
            || !plausible_dim(texture_height)
        {
            return None;
        }

        Some(HeaderCandidate {
            offset,
            format,
            flags: word_at(data, offset + 4),
            texture_width,
            texture_height,
            image_width: word_at(data, offset + 16),
            image_height: word_at(data, offset + 20),
        })
    })
}

/// How an adaptive string field turned out to be encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    /// 32-bit byte length followed by that many bytes
    LengthPrefixed,
    /// NUL-terminated text starting at the field itself
    Inline,
}

/// Result of classifying an adaptive string field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedString {
    pub encoding: StringEncoding,
    pub text: String,
    /// Bytes of the window the field occupies
    pub consumed: usize,
}

/// Classify and read a string field that may be length-prefixed or inline
///
/// The first four bytes are a candidate length. They are read as inline
/// text instead when the candidate is negative, at least 100000, or its
/// low byte is `{` or `[` (the start of embedded JSON).
///
/// # Errors
/// `OutOfBounds` when the window is shorter than four bytes, or when a
/// length-prefixed body runs past the window. Offsets are window-relative.
pub fn sniff_string_field(window: &[u8]) -> Result<SniffedString, FormatError> {
    let Some(head) = window.get(..4) else {
        return Err(FormatError::OutOfBounds {
            offset: 0,
            requested: 4,
            size: window.len(),
        });
    };
    let candidate = word_at(head, 0);
    let low = head[0];

    let inline = !(0..MAX_INLINE_STRING_LEN).contains(&candidate) || low == b'{' || low == b'[';

    if inline {
        let (text, consumed) = match window.iter().position(|&b| b == 0) {
            Some(nul) => (&window[..nul], nul + 1),
            None => (window, window.len()),
        };
        return Ok(SniffedString {
            encoding: StringEncoding::Inline,
            text: String::from_utf8_lossy(text).into_owned(),
            consumed,
        });
    }

    let len = candidate as usize;
    let body = window.get(4..4 + len).ok_or(FormatError::OutOfBounds {
        offset: 4,
        requested: len,
        size: window.len(),
    })?;

    Ok(SniffedString {
        encoding: StringEncoding::LengthPrefixed,
        text: String::from_utf8_lossy(body)
            .trim_end_matches('\0')
            .to_string(),
        consumed: 4 + len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_words(words: [i32; 6]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn test_find_marker() {
        let data = b"xxMDLSyyMDLS";
        assert_eq!(find_marker(data, b"MDLS", 0), Some(2));
        assert_eq!(find_marker(data, b"MDLS", 3), Some(8));
        assert_eq!(find_marker(data, b"MDLA", 0), None);
        assert_eq!(find_marker(data, b"MDLS", 100), None);
    }

    #[test]
    fn test_header_after_filler() {
        let mut data = vec![0xFFu8; 37];
        data.extend(header_words([7, 0, 256, 128, 200, 100]));
        data.extend([0u8; 64]);

        let header = scan_plausible_header(&data).unwrap();
        assert_eq!(header.offset, 37);
        assert_eq!(header.format, 7);
        assert_eq!(header.texture_width, 256);
        assert_eq!(header.texture_height, 128);
        assert_eq!(header.image_width, 200);
        assert_eq!(header.image_height, 100);
    }

    #[test]
    fn test_header_rejects_implausible_values() {
        let mut data = header_words([21, -1, 256, 256, -1, -1]);
        data.extend([0xFFu8; 40]);
        assert_eq!(scan_plausible_header(&data), None);

        let mut data = header_words([0, -1, 16384, 16, -1, -1]);
        data.extend([0xFFu8; 40]);
        assert_eq!(scan_plausible_header(&data), None);
    }

    #[test]
    fn test_header_scan_window_is_bounded() {
        let mut data = vec![0xFFu8; 600];
        data.extend(header_words([0, 0, 64, 64, 64, 64]));
        data.extend([0u8; 64]);
        assert_eq!(scan_plausible_header(&data), None);
    }

    #[test]
    fn test_header_tiny_buffer() {
        assert_eq!(scan_plausible_header(&[0u8; 16]), None);
    }

    #[test]
    fn test_length_prefixed_string() {
        let mut window = 12i32.to_le_bytes().to_vec();
        window.extend_from_slice(b"shader:basic");
        window.extend_from_slice(&[9, 9, 9]);

        let s = sniff_string_field(&window).unwrap();
        assert_eq!(s.encoding, StringEncoding::LengthPrefixed);
        assert_eq!(s.text, "shader:basic");
        assert_eq!(s.consumed, 16);
    }

    #[test]
    fn test_brace_low_byte_is_inline() {
        // Reads as length 123 numerically
        let mut window = vec![b'{', 0, 0, 0];
        window.extend_from_slice(&[b'x'; 130]);
        let s = sniff_string_field(&window).unwrap();
        assert_eq!(s.encoding, StringEncoding::Inline);
        assert_eq!(s.text, "{");
        assert_eq!(s.consumed, 2);

        let s = sniff_string_field(b"{\"a\":1}\0trailing").unwrap();
        assert_eq!(s.encoding, StringEncoding::Inline);
        assert_eq!(s.text, "{\"a\":1}");
        assert_eq!(s.consumed, 8);
    }

    #[test]
    fn test_bracket_and_huge_length_are_inline() {
        let s = sniff_string_field(b"[1,2]\0").unwrap();
        assert_eq!(s.encoding, StringEncoding::Inline);

        let mut window = 100_000i32.to_le_bytes().to_vec();
        window.push(0);
        let s = sniff_string_field(&window).unwrap();
        assert_eq!(s.encoding, StringEncoding::Inline);

        let mut window = (-1i32).to_le_bytes().to_vec();
        window.push(0);
        let s = sniff_string_field(&window).unwrap();
        assert_eq!(s.encoding, StringEncoding::Inline);
        assert_eq!(s.consumed, 5);
    }

    #[test]
    fn test_length_prefixed_overrun() {
        let mut window = 50i32.to_le_bytes().to_vec();
        window.extend_from_slice(b"short");
        assert!(sniff_string_field(&window).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_short_window() {
        assert!(sniff_string_field(&[1, 2]).unwrap_err().is_out_of_bounds());
    }
}
