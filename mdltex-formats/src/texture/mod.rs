//! TEX texture container
//!
//! ```text
//! [filler]          0..512 bytes, skipped by header probing
//! header            format, flags, tex w/h, image w/h, reserved
//! ["TEXB000v"]      optional container tag, searched within 32 bytes
//! image count       (+ one reserved word in version 3)
//! per image:
//!   mipmap count
//!   per mipmap:     layout-dependent record, payload size, payload
//! ```
//!
//! Only mipmap level 0 of each image is kept and turned into pixels.

mod container;
mod decompress;
mod pixels;

pub use container::decode_texture;
pub use decompress::Decompressor;

use std::fmt;

use mdltex_dxt::BlockFormat;

/// Pixel format code from the texture header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8888,
    Dxt5,
    Dxt3,
    Dxt1,
    Rg88,
    R8,
    Unknown(i32),
}

impl PixelFormat {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PixelFormat::Rgba8888,
            4 => PixelFormat::Dxt5,
            6 => PixelFormat::Dxt3,
            7 => PixelFormat::Dxt1,
            8 => PixelFormat::Rg88,
            9 => PixelFormat::R8,
            other => PixelFormat::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            PixelFormat::Rgba8888 => 0,
            PixelFormat::Dxt5 => 4,
            PixelFormat::Dxt3 => 6,
            PixelFormat::Dxt1 => 7,
            PixelFormat::Rg88 => 8,
            PixelFormat::R8 => 9,
            PixelFormat::Unknown(code) => code,
        }
    }

    /// Block codec for DXT formats
    pub fn block_format(self) -> Option<BlockFormat> {
        match self {
            PixelFormat::Dxt1 => Some(BlockFormat::Dxt1),
            PixelFormat::Dxt3 => Some(BlockFormat::Dxt3),
            PixelFormat::Dxt5 => Some(BlockFormat::Dxt5),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgba8888 => f.write_str("RGBA8888"),
            PixelFormat::Dxt5 => f.write_str("DXT5"),
            PixelFormat::Dxt3 => f.write_str("DXT3"),
            PixelFormat::Dxt1 => f.write_str("DXT1"),
            PixelFormat::Rg88 => f.write_str("RG88"),
            PixelFormat::R8 => f.write_str("R8"),
            PixelFormat::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}

/// Fixed header fields at the probed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHeader {
    /// Where the header was found
    pub offset: usize,
    pub format: PixelFormat,
    pub flags: i32,
    pub texture_width: i32,
    pub texture_height: i32,
    /// Logical size; decoded pixels are cropped to it when both are positive
    pub image_width: i32,
    pub image_height: i32,
}

/// Mipmap record family, selected by container version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerLayout {
    /// Version 1 or unversioned: width, height
    Legacy,
    /// Versions 2 and 3: adds compression flag and size hint
    Compressed,
    /// Version 4: reserved words and a metadata string before the version 2 fields
    Annotated,
}

/// Field shape of one mipmap record, before the payload size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipmapLayout {
    pub leading_reserved: usize,
    pub metadata_string: bool,
    pub trailing_reserved: usize,
    pub compression_fields: bool,
}

const MIPMAP_LAYOUTS: [MipmapLayout; 3] = [
    // Legacy
    MipmapLayout {
        leading_reserved: 0,
        metadata_string: false,
        trailing_reserved: 0,
        compression_fields: false,
    },
    // Compressed
    MipmapLayout {
        leading_reserved: 0,
        metadata_string: false,
        trailing_reserved: 0,
        compression_fields: true,
    },
    // Annotated
    MipmapLayout {
        leading_reserved: 2,
        metadata_string: true,
        trailing_reserved: 1,
        compression_fields: true,
    },
];

impl ContainerLayout {
    /// Versions outside 1..=4 use the oldest layout
    pub fn from_version(version: u32) -> Self {
        match version {
            2 | 3 => ContainerLayout::Compressed,
            4 => ContainerLayout::Annotated,
            _ => ContainerLayout::Legacy,
        }
    }

    pub fn mipmap_layout(self) -> MipmapLayout {
        MIPMAP_LAYOUTS[self as usize]
    }
}

/// One mipmap record (payload bytes are kept only for level 0)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mipmap {
    pub width: i32,
    pub height: i32,
    /// Payload is LZ4 block-compressed
    pub compressed: bool,
    /// Declared decompressed size, 0 when unknown
    pub decompressed_size: i32,
    pub payload_size: i32,
    /// Version 4 metadata string
    pub metadata: Option<String>,
}

/// How the level-0 payload relates to the stored bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadState {
    /// Stored uncompressed
    Raw,
    /// Stored compressed and successfully decompressed
    Decompressed,
    /// Stored compressed and decompression failed; bytes are still compressed
    CompressedFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgba8,
    LumaAlpha8,
    Luma8,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgba8 => 4,
            ChannelLayout::LumaAlpha8 => 2,
            ChannelLayout::Luma8 => 1,
        }
    }
}

/// Level-0 pixels, tightly packed rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub mipmaps: Vec<Mipmap>,
    /// Level-0 payload after decompression (or as stored, see `payload_state`)
    pub payload: Vec<u8>,
    pub payload_state: PayloadState,
    /// `None` when no pixel decoder applies; export falls back to `payload`
    pub decoded: Option<DecodedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureContainer {
    pub header: TextureHeader,
    /// 1..=4 from the container tag, 0 when absent
    pub container_version: u32,
    pub container_tag: Option<String>,
    /// Image count as declared
    pub image_count: i32,
    pub images: Vec<TextureImage>,
}

impl TextureContainer {
    pub fn layout(&self) -> ContainerLayout {
        ContainerLayout::from_version(self.container_version)
    }
}
