//! mdltex-export - MDL model and TEX texture export tool
//!
//! Converts model containers to OBJ + JSON and texture containers to PNG.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mdltex_formats::DecodeStatus;
use std::path::PathBuf;

use mdltex_export::export::{self, ExportOptions, ExportReport};
use mdltex_export::manifest;

#[derive(Parser)]
#[command(name = "mdltex-export")]
#[command(about = "MDL model and TEX texture export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a model to OBJ and JSON
    Model {
        /// Input .mdl file
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export every image in a texture container
    Texture {
        /// Input .tex file
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip raw payload dumps for images that cannot be decoded
        #[arg(long)]
        no_raw_fallback: bool,
    },

    /// Export everything listed in a manifest file
    Build {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without exporting
    Check {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,
    },
}

fn summarize(report: &ExportReport) {
    match report.status {
        DecodeStatus::Complete => {}
        DecodeStatus::Partial => tracing::warn!(
            "{:?} decoded partially ({} problems)",
            report.source,
            report.problems()
        ),
        DecodeStatus::Failed => tracing::error!("{:?} could not be decoded", report.source),
    }
    for path in &report.outputs {
        tracing::debug!("  wrote {:?}", path);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Model { input, output } => {
            let out_dir = export::output_dir_for(&input, output.as_deref());
            tracing::info!("Exporting {:?} -> {:?}", input, out_dir);
            let report = export::export_model(&input, &out_dir)?;
            summarize(&report);
            tracing::info!("Done!");
        }

        Commands::Texture {
            input,
            output,
            no_raw_fallback,
        } => {
            let out_dir = export::output_dir_for(&input, output.as_deref());
            tracing::info!("Exporting {:?} -> {:?}", input, out_dir);
            let options = ExportOptions {
                raw_fallback: !no_raw_fallback,
            };
            let report = export::export_texture(&input, &out_dir, options)?;
            summarize(&report);
            if report.status == DecodeStatus::Failed {
                let reason = report
                    .diagnostics
                    .iter()
                    .rev()
                    .find(|d| d.severity == mdltex_formats::Severity::Fatal)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                anyhow::bail!("Failed to decode texture {:?}: {}", input, reason);
            }
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building exports from {:?}", manifest);
            let loaded = manifest::load(&manifest)?;
            let reports = manifest::build_all(&loaded, output.as_deref())?;

            let mut files = 0;
            for report in &reports {
                summarize(report);
                files += report.outputs.len();
            }
            let failed = reports
                .iter()
                .filter(|r| r.status == DecodeStatus::Failed)
                .count();
            tracing::info!(
                "Build complete! {} inputs, {} files written, {} failed",
                reports.len(),
                files,
                failed
            );
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let loaded = manifest::load(&manifest)?;
            loaded.manifest.validate(&loaded.base_dir)?;
            tracing::info!(
                "Manifest is valid! {} models, {} textures",
                loaded.manifest.models.len(),
                loaded.manifest.textures.len()
            );
        }
    }

    Ok(())
}
