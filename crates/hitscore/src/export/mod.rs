//! Export of play summaries.

mod format;
mod json;
mod tsv;

pub use format::ExportFormat;
pub use json::{JsonExporter, format_json_entry};
pub use tsv::{TsvExporter, format_tsv_header, format_tsv_row};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::summary::ScoreSummary;

/// Append summaries to a file, writing the header only when the file is new or empty
pub fn append_summaries<P: AsRef<Path>>(
    path: P,
    exporter: &dyn ExportFormat,
    summaries: &[ScoreSummary],
) -> Result<()> {
    let path = path.as_ref();
    let is_empty = path.metadata().map(|m| m.len() == 0).unwrap_or(true);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if is_empty && let Some(header) = exporter.header() {
        writeln!(file, "{}", header)?;
    }
    for summary in summaries {
        writeln!(file, "{}", exporter.format_row(summary))?;
    }
    Ok(())
}
