//! export.toml batch manifest
//!
//! ```toml
//! [output]
//! dir = "out"
//! raw_fallback = true
//!
//! [[models]]
//! path = "puppet.mdl"
//!
//! [[textures]]
//! path = "body.tex"
//! ```
//!
//! Entry paths and the output directory are relative to the manifest.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::export::{ExportOptions, ExportReport, export_model, export_texture};

/// Manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct ExportManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub models: Vec<Entry>,
    #[serde(default)]
    pub textures: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Output directory; defaults to each input's own directory
    pub dir: Option<String>,
    /// Write `<base>_<i>_raw.bin` when pixels cannot be decoded.
    /// Default: true
    #[serde(default = "default_raw_fallback")]
    pub raw_fallback: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: None,
            raw_fallback: default_raw_fallback(),
        }
    }
}

fn default_raw_fallback() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub path: String,
}

/// Manifest together with the directory its relative paths resolve against
#[derive(Debug)]
pub struct LoadedManifest {
    pub manifest: ExportManifest,
    pub base_dir: PathBuf,
}

impl ExportManifest {
    /// Parse manifest text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse export manifest")
    }

    /// Check that there is work to do and every input exists
    pub fn validate(&self, base_dir: &Path) -> Result<()> {
        if self.models.is_empty() && self.textures.is_empty() {
            bail!("Manifest lists no models or textures");
        }

        for entry in self.models.iter().chain(&self.textures) {
            if entry.path.is_empty() {
                bail!("Manifest entry has an empty path");
            }
            let path = base_dir.join(&entry.path);
            if !path.is_file() {
                bail!("Input not found: {:?}", path);
            }
        }

        Ok(())
    }

    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            raw_fallback: self.output.raw_fallback,
        }
    }
}

/// Load and parse a manifest file
pub fn load(path: &Path) -> Result<LoadedManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let manifest = ExportManifest::parse(&content)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(LoadedManifest { manifest, base_dir })
}

/// Export every manifest entry, in parallel
///
/// `output` overrides the manifest's output directory. Entries are
/// independent; the first I/O failure aborts the build, while decode
/// problems only show up in the returned reports.
pub fn build_all(loaded: &LoadedManifest, output: Option<&Path>) -> Result<Vec<ExportReport>> {
    let LoadedManifest { manifest, base_dir } = loaded;
    manifest.validate(base_dir)?;

    let out_dir_override = output
        .map(Path::to_path_buf)
        .or_else(|| manifest.output.dir.as_ref().map(|d| base_dir.join(d)));
    let out_dir_for = |input: &Path| {
        crate::export::output_dir_for(input, out_dir_override.as_deref())
    };
    let options = manifest.options();

    let models: Result<Vec<_>> = manifest
        .models
        .par_iter()
        .map(|entry| {
            let path = base_dir.join(&entry.path);
            export_model(&path, &out_dir_for(&path))
        })
        .collect();
    let models = models?;

    let textures: Result<Vec<_>> = manifest
        .textures
        .par_iter()
        .map(|entry| {
            let path = base_dir.join(&entry.path);
            export_texture(&path, &out_dir_for(&path), options)
        })
        .collect();
    let textures = textures?;

    let mut reports = models;
    reports.extend(textures);
    Ok(reports)
}
