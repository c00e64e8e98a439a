//! Error types for primitive reads and section decoding

/// Errors raised while reading a model or texture buffer
///
/// Decoders catch these at section granularity and turn them into
/// [`Diagnostic`](crate::Diagnostic)s; they never escape `decode_*`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("read of {requested} bytes at offset {offset} exceeds buffer size {size}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        size: usize,
    },

    #[error("marker {marker} not found")]
    MarkerNotFound { marker: &'static str },

    #[error("no plausible texture header in the first {window} bytes")]
    HeaderNotFound { window: usize },

    #[error("payload size {size} outside (0, {max}]")]
    InvalidPayloadSize { size: i32, max: i32 },

    #[error("{what} count {count} outside accepted range (max {max})")]
    CountOutOfRange {
        what: &'static str,
        count: u64,
        max: u64,
    },

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("block decode failed: {0}")]
    Dxt(#[from] mdltex_dxt::DxtError),
}

impl FormatError {
    /// Whether the error means no further bytes can be read from the buffer
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, FormatError::OutOfBounds { .. })
    }
}
