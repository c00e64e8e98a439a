//! LZ4 block decompression for compressed mipmap payloads

use mdltex_formats::{Decompressor, FormatError};

/// Raw LZ4 block format (no frame header, no size prefix)
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4BlockDecompressor;

impl Decompressor for Lz4BlockDecompressor {
    fn decompress(&self, input: &[u8], target_size: usize) -> Result<Vec<u8>, FormatError> {
        lz4_flex::block::decompress(input, target_size)
            .map_err(|e| FormatError::Decompress(e.to_string()))
    }
}
