//! mdltex-dxt: DXT block decoder for mdltex texture containers
//!
//! **This is a pure codec** - it turns DXT1/DXT3/DXT5 block streams into
//! tightly packed RGBA8 pixels. Container headers, mipmap records and
//! decompression are handled by the caller (mdltex-formats).
//!
//! # Block Layout
//!
//! ```text
//! DXT1 (8 bytes):
//!   0x00: color0 (u16 LE, 5:6:5)
//!   0x02: color1 (u16 LE, 5:6:5)
//!   0x04: indices (u32 LE, 2 bits per pixel, row-major)
//!
//! DXT3 (16 bytes):
//!   0x00: explicit alpha (u64 LE, 4 bits per pixel)
//!   0x08: DXT1-style color block (always 4-color mode)
//!
//! DXT5 (16 bytes):
//!   0x00: alpha0 (u8), alpha1 (u8)
//!   0x02: alpha indices (48 bits LE, 3 bits per pixel)
//!   0x08: DXT1-style color block (always 4-color mode)
//! ```
//!
//! Pixels that fall outside the image (width or height not a multiple of 4)
//! are dropped.
//!
//! # Usage
//!
//! ```
//! use mdltex_dxt::{BlockFormat, decode_image};
//!
//! // One solid red DXT1 block
//! let block = [0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00];
//! let rgba = decode_image(BlockFormat::Dxt1, &block, 4, 4).unwrap();
//! assert_eq!(&rgba[0..4], &[255, 0, 0, 255]);
//! ```

mod decode;
mod palette;

pub use decode::{decode_dxt1_block, decode_dxt3_block, decode_dxt5_block, decode_image};
pub use palette::{alpha_palette, color_palette, expand_565};

// =============================================================================
// Constants
// =============================================================================

/// Block edge length in pixels
pub const BLOCK_DIM: u32 = 4;

/// Pixels per 4×4 block
pub const PIXELS_PER_BLOCK: usize = 16;

/// Bytes per DXT1 block
pub const DXT1_BLOCK_SIZE: usize = 8;

/// Bytes per DXT3/DXT5 block
pub const DXT_ALPHA_BLOCK_SIZE: usize = 16;

/// One decoded 4×4 block, row-major RGBA8
pub type DecodedBlock = [[u8; 4]; PIXELS_PER_BLOCK];

// =============================================================================
// Block Formats
// =============================================================================

/// DXT family member stored in a block-compressed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    /// Opaque or one-bit-alpha color blocks
    Dxt1,
    /// Explicit 4-bit alpha + color
    Dxt3,
    /// Interpolated alpha + color
    Dxt5,
}

impl BlockFormat {
    /// Size in bytes of one encoded block
    pub const fn block_size(self) -> usize {
        match self {
            BlockFormat::Dxt1 => DXT1_BLOCK_SIZE,
            BlockFormat::Dxt3 | BlockFormat::Dxt5 => DXT_ALPHA_BLOCK_SIZE,
        }
    }

    /// Offset of the 5:6:5 color block inside an encoded block
    pub const fn color_offset(self) -> usize {
        match self {
            BlockFormat::Dxt1 => 0,
            BlockFormat::Dxt3 | BlockFormat::Dxt5 => 8,
        }
    }

    /// Whether DXT1's one-bit-alpha palette mode is available
    pub const fn allows_punch_through(self) -> bool {
        matches!(self, BlockFormat::Dxt1)
    }

    /// Number of blocks needed to cover `width` × `height` pixels
    pub fn block_count(width: u32, height: u32) -> usize {
        width.div_ceil(BLOCK_DIM) as usize * height.div_ceil(BLOCK_DIM) as usize
    }

    /// Number of encoded bytes a full `width` × `height` stream occupies
    pub fn encoded_size(self, width: u32, height: u32) -> usize {
        Self::block_count(width, height) * self.block_size()
    }
}

impl core::fmt::Display for BlockFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BlockFormat::Dxt1 => write!(f, "DXT1"),
            BlockFormat::Dxt3 => write!(f, "DXT3"),
            BlockFormat::Dxt5 => write!(f, "DXT5"),
        }
    }
}

// =============================================================================
// Error Type
// =============================================================================

/// Errors that can occur during block decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxtError {
    /// Width or height is zero
    ZeroDimensions,
    /// Output buffer size overflows `usize`
    DimensionsTooLarge { width: u32, height: u32 },
}

impl core::fmt::Display for DxtError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DxtError::ZeroDimensions => write!(f, "image has zero width or height"),
            DxtError::DimensionsTooLarge { width, height } => {
                write!(f, "image dimensions {}x{} are too large", width, height)
            }
        }
    }
}

impl std::error::Error for DxtError {}

// =============================================================================
// Tests
// =============================================================================
