//! Simulate command: replay an event script and report the summary.

use std::path::Path;

use anyhow::{Context, Result};
use hitscore::{EngineConfig, ExportFormat as _, JsonExporter, TsvExporter, append_summaries};
use tracing::info;

use crate::cli::ExportFormat;
use crate::script::Script;

pub fn run(
    script_path: &Path,
    config_path: Option<&Path>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let script = Script::load(script_path)?;
    let session = script.run(&config)?;
    let summary = session.finish();

    match output {
        Some(path) => {
            match format {
                ExportFormat::Tsv => append_summaries(path, &TsvExporter, &[summary])?,
                ExportFormat::Json => append_summaries(path, &JsonExporter, &[summary])?,
            }
            info!("Appended summary to {}", path.display());
        }
        None => {
            let content = match format {
                ExportFormat::Tsv => TsvExporter.format_rows(&[summary]),
                ExportFormat::Json => JsonExporter.format_rows(&[summary]),
            };
            print!("{}", content);
        }
    }

    Ok(())
}
