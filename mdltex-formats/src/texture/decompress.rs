use crate::error::FormatError;

/// Block decompressor for compressed mipmap payloads
///
/// Injected by the caller so the decoder carries no codec dependency.
/// A failure is reported as a diagnostic and the compressed bytes are kept.
pub trait Decompressor: Send + Sync {
    /// Decompress `input` into at most `target_size` bytes
    ///
    /// `target_size` is the declared size hint, or `width * height * 4`
    /// when the record carries no hint.
    fn decompress(&self, input: &[u8], target_size: usize) -> Result<Vec<u8>, FormatError>;
}
