//! JSON export format implementation

use serde_json::{Value as JsonValue, json};

use crate::summary::ScoreSummary;

use super::format::ExportFormat;

/// JSON exporter (one object per line, NDJSON format)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportFormat for JsonExporter {
    fn header(&self) -> Option<String> {
        None
    }

    fn format_row(&self, summary: &ScoreSummary) -> String {
        format_json_entry(summary).to_string()
    }
}

/// JSON entry for a summary; mods are given both as a bitmask and by name
pub fn format_json_entry(summary: &ScoreSummary) -> JsonValue {
    let mods: Vec<&str> = summary.mods.iter().map(|m| m.short_name()).collect();
    json!({
        "timestamp": summary.timestamp.to_rfc3339(),
        "score": summary.score,
        "max_combo": summary.max_combo,
        "perfect": summary.perfect,
        "grade": summary.grade.short_name(),
        "accuracy": summary.accuracy,
        "mods": summary.mods.bits(),
        "mod_names": mods,
        "hits": {
            "300": summary.n300,
            "100": summary.n100,
            "50": summary.n50,
            "miss": summary.misses,
            "geki": summary.geki,
            "katu": summary.katu
        },
        "objects": summary.full_object_count,
        "unstable_rate": summary.unstable_rate,
        "early_average": summary.early_average,
        "late_average": summary.late_average
    })
}
