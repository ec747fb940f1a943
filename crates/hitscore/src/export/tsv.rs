//! TSV export format implementation

use crate::summary::ScoreSummary;

use super::format::ExportFormat;

/// TSV (Tab-Separated Values) exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvExporter;

impl ExportFormat for TsvExporter {
    fn header(&self) -> Option<String> {
        Some(format_tsv_header())
    }

    fn format_row(&self, summary: &ScoreSummary) -> String {
        format_tsv_row(summary)
    }
}

pub fn format_tsv_header() -> String {
    [
        "date",
        "score",
        "maxcombo",
        "perfect",
        "grade",
        "accuracy",
        "mods",
        "300",
        "100",
        "50",
        "miss",
        "geki",
        "katu",
        "objects",
        "ur",
        "early",
        "late",
    ]
    .join("\t")
}

pub fn format_tsv_row(summary: &ScoreSummary) -> String {
    let values: Vec<String> = vec![
        summary.timestamp.to_rfc3339(),
        summary.score.to_string(),
        summary.max_combo.to_string(),
        summary.perfect.to_string(),
        summary.grade.short_name().to_string(),
        format!("{:.2}", summary.accuracy),
        summary.mods.to_string(),
        summary.n300.to_string(),
        summary.n100.to_string(),
        summary.n50.to_string(),
        summary.misses.to_string(),
        summary.geki.to_string(),
        summary.katu.to_string(),
        summary.full_object_count.to_string(),
        format!("{:.2}", summary.unstable_rate),
        format!("{:.2}", summary.early_average),
        format!("{:.2}", summary.late_average),
    ];

    values.join("\t")
}
