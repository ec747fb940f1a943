//! ExportFormat trait definition

use crate::summary::ScoreSummary;

/// Common interface for summary export formats (TSV, JSON)
pub trait ExportFormat {
    /// Header line, if the format has one
    fn header(&self) -> Option<String>;

    fn format_row(&self, summary: &ScoreSummary) -> String;

    /// Header plus one line per summary
    fn format_rows(&self, summaries: &[ScoreSummary]) -> String {
        let mut output = String::new();
        if let Some(header) = self.header() {
            output.push_str(&header);
            output.push('\n');
        }
        for summary in summaries {
            output.push_str(&self.format_row(summary));
            output.push('\n');
        }
        output
    }
}
