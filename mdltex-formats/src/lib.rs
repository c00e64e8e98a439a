//! mdltex-formats: decoders for MDL model and TEX texture containers
//!
//! Both containers are undocumented and versioned. Revisions switch field
//! layouts without a length field to skip the difference, and some headers
//! sit at offsets that have to be found by content-sniffing. Every decoder
//! here therefore runs one forward pass over an in-memory buffer and
//! returns a [`Decoded`] value: whatever could be recovered, plus an ordered
//! list of [`Diagnostic`]s describing everything that went wrong.
//!
//! # Components
//!
//! - [`ByteCursor`]: bounds-checked little-endian reads
//! - [`scan`]: marker search, header probing, adaptive string sniffing
//! - [`decode_model`]: geometry, skinning, skeleton and animation tracks
//! - [`decode_texture`]: packed images, mipmap records, level-0 pixels
//!
//! # Usage
//!
//! ```ignore
//! use mdltex_formats::{decode_model, DecodeStatus};
//!
//! let data = std::fs::read("puppet.mdl")?;
//! let decoded = decode_model(&data);
//! if decoded.status() != DecodeStatus::Complete {
//!     for d in &decoded.diagnostics {
//!         eprintln!("{}", d);
//!     }
//! }
//! println!("{} vertices", decoded.value.vertices.len());
//! ```

mod cursor;
mod diagnostics;
mod error;
pub mod limits;
pub mod model;
pub mod scan;
pub mod texture;

#[cfg(test)]
mod test_support;

pub use cursor::{ByteCursor, VersionTag};
pub use diagnostics::{DecodeStatus, Decoded, Diagnostic, Section, Severity};
pub use error::FormatError;
pub use model::{
    Animation, AnimationList, AnimationTrack, BindPose, Bone, Frame, ModelDocument, ModelHeader,
    ModelRevision, Skeleton, SkinEntry, Triangle, Vertex, VertexLayout, bind_pose, decode_model,
};
pub use scan::{
    HeaderCandidate, SniffedString, StringEncoding, find_marker, scan_plausible_header,
    sniff_string_field,
};
pub use texture::{
    ChannelLayout, ContainerLayout, DecodedImage, Decompressor, Mipmap, MipmapLayout,
    PayloadState, PixelFormat, TextureContainer, TextureHeader, TextureImage, decode_texture,
};

// =============================================================================
// Markers and Heralds
// =============================================================================

/// Prefix every model version tag starts with ("MDLV0013", "MDLS0002", ...)
pub const MODEL_TAG_PREFIX: &str = "MDL";

/// Skeleton section marker
pub const SKELETON_MARKER: &[u8; 4] = b"MDLS";

/// Animation section marker
pub const ANIMATION_MARKER: &[u8; 4] = b"MDLA";

/// Texture container marker ("TEXB0003")
pub const CONTAINER_MARKER: &[u8; 4] = b"TEXB";

/// Herald preceding the vertex block size in standard-revision models
pub const STANDARD_HERALD: u32 = 0x0180_0009;

/// Herald ending the padding run in alternate-revision models
pub const ALTERNATE_HERALD: u32 = 0x0180_000F;
