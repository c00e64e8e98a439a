//! mdltex-export library
//!
//! Turns decoded MDL models and TEX textures into files other tools can
//! read: OBJ geometry, a JSON document for skinning, skeleton and animation
//! data, and PNG images (or raw payload dumps).

pub mod document;
pub mod export;
pub mod lz4;
pub mod manifest;
pub mod obj;
pub mod texture;

pub use document::{ModelData, write_model_data};
pub use export::{
    ExportOptions, ExportReport, export_model, export_texture, export_texture_with,
    output_dir_for,
};
pub use lz4::Lz4BlockDecompressor;
pub use obj::{material_library_name, write_obj};
pub use texture::{ImageEncoder, PngEncoder, write_raw_payload};
