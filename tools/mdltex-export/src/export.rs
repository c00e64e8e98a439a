//! File-level export: read a container, decode it, write its outputs
//!
//! Output names are derived from the input's file stem:
//!
//! ```text
//! puppet.mdl -> puppet.obj, puppet_data.json
//! body.tex   -> body_0.png, body_1.png, ... (or body_<i>_raw.bin)
//! ```

use anyhow::{Context, Result};
use mdltex_formats::{
    DecodeStatus, Decompressor, Diagnostic, PayloadState, Severity, decode_model, decode_texture,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::document::write_model_data;
use crate::lz4::Lz4BlockDecompressor;
use crate::obj::write_obj;
use crate::texture::{ImageEncoder, PngEncoder, write_raw_payload};

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Dump the level-0 payload when no image can be produced
    pub raw_fallback: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { raw_fallback: true }
    }
}

/// What one input produced
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub source: PathBuf,
    pub status: DecodeStatus,
    pub outputs: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExportReport {
    /// Diagnostics at warning level or above
    pub fn problems(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
            .count()
    }
}

/// Output directory for an input: the override, or the input's own directory
pub fn output_dir_for(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    std::fs::read(input).with_context(|| format!("Failed to read input: {:?}", input))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    Ok(BufWriter::new(file))
}

/// Decode a model file and write its OBJ and JSON outputs
///
/// Both files are written even for partial decodes; whatever was recovered
/// goes out and the diagnostics explain the rest.
pub fn export_model(input: &Path, out_dir: &Path) -> Result<ExportReport> {
    let data = read_input(input)?;
    let decoded = decode_model(&data);
    let status = decoded.status();
    let doc = &decoded.value;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
    let stem = file_stem(input);
    let source_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());

    let obj_path = out_dir.join(format!("{}.obj", stem));
    let mut writer = create_output(&obj_path)?;
    write_obj(&mut writer, doc, &source_name)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output: {:?}", obj_path))?;

    let json_path = out_dir.join(format!("{}_data.json", stem));
    let mut writer = create_output(&json_path)?;
    write_model_data(&mut writer, doc)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output: {:?}", json_path))?;

    tracing::info!(
        "Exported model {:?}: {} vertices, {} triangles, {} bones, {} animations",
        input,
        doc.vertices.len(),
        doc.triangles.len(),
        doc.bones().len(),
        doc.animation_list().len()
    );

    Ok(ExportReport {
        source: input.to_path_buf(),
        status,
        outputs: vec![obj_path, json_path],
        diagnostics: decoded.diagnostics,
    })
}

/// Decode a texture file with the LZ4 decompressor and write PNGs
pub fn export_texture(input: &Path, out_dir: &Path, options: ExportOptions) -> Result<ExportReport> {
    export_texture_with(input, out_dir, options, &Lz4BlockDecompressor, &PngEncoder)
}

/// Decode a texture file with the given capabilities and write one file per image
pub fn export_texture_with(
    input: &Path,
    out_dir: &Path,
    options: ExportOptions,
    decompressor: &dyn Decompressor,
    encoder: &dyn ImageEncoder,
) -> Result<ExportReport> {
    let data = read_input(input)?;
    let decoded = decode_texture(&data, decompressor);
    let status = decoded.status();
    let mut outputs = Vec::new();

    if let Some(container) = &decoded.value {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;
        let stem = file_stem(input);

        for (index, image) in container.images.iter().enumerate() {
            if let Some(pixels) = &image.decoded {
                let path = out_dir.join(format!("{}_{}.{}", stem, index, encoder.extension()));
                encoder.encode(pixels, &path)?;
                outputs.push(path);
            } else if options.raw_fallback {
                let path = out_dir.join(format!("{}_{}_raw.bin", stem, index));
                if write_raw_payload(&image.payload, &path)? {
                    if image.payload_state == PayloadState::CompressedFallback {
                        tracing::warn!("{:?} holds still-compressed bytes", path);
                    }
                    outputs.push(path);
                }
            }
        }

        tracing::info!(
            "Exported texture {:?}: format {}, {} of {} images, {} files",
            input,
            container.header.format,
            container.images.len(),
            container.image_count,
            outputs.len()
        );
    }

    Ok(ExportReport {
        source: input.to_path_buf(),
        status,
        outputs,
        diagnostics: decoded.diagnostics,
    })
}
