/*!
 * Reporting functionality for scopy
 *
 * Renders the [`Stats`] of a run for the terminal. The plain format is
 * the default; tables use the tabled library and JSON uses serde_json.
 */

use std::fmt::Write as _;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::SummaryFormat;
use crate::error::Result;
use crate::types::Stats;
use crate::utils::format_file_size;

/// Report generator for run statistics
pub struct Reporter {
    format: SummaryFormat,
    /// Whether comment stripping was requested for the run
    stripped_comments: bool,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: SummaryFormat, stripped_comments: bool) -> Self {
        Self {
            format,
            stripped_comments,
        }
    }

    /// Generate the report text; empty for [`SummaryFormat::None`]
    pub fn generate_report(&self, stats: &Stats) -> Result<String> {
        Ok(match self.format {
            SummaryFormat::Plain => self.generate_plain_report(stats),
            SummaryFormat::Table => self.generate_table_report(stats),
            SummaryFormat::Json => serde_json::to_string_pretty(stats)?,
            SummaryFormat::None => String::new(),
        })
    }

    /// Print the report to stderr, keeping stdout for the content
    pub fn print_report(&self, stats: &Stats) -> Result<()> {
        let report = self.generate_report(stats)?;
        if !report.is_empty() {
            eprintln!("\n{}", report);
        }
        Ok(())
    }

    fn show_comments(&self, stats: &Stats) -> bool {
        self.stripped_comments && stats.comments_removed > 0
    }

    fn generate_plain_report(&self, stats: &Stats) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total files: {}", stats.total_files);
        let _ = writeln!(out, "Files by extension:");
        for (ext, count) in stats.sorted_extensions() {
            let _ = writeln!(out, "  {}: {}", ext, count);
        }
        let _ = writeln!(out, "Total bytes: {}", stats.total_bytes);
        let _ = write!(out, "Total lines: {}", stats.total_lines);
        if self.show_comments(stats) {
            let _ = write!(out, "\nRemoved lines (comments): {}", stats.comments_removed);
        }
        out
    }

    fn generate_table_report(&self, stats: &Stats) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        #[derive(Tabled)]
        struct ExtensionRow {
            #[tabled(rename = "Extension")]
            ext: String,

            #[tabled(rename = "Files")]
            files: usize,
        }

        let mut rows = vec![
            SummaryRow {
                key: "Files",
                value: stats.total_files.to_string(),
            },
            SummaryRow {
                key: "Size",
                value: format_file_size(stats.total_bytes),
            },
            SummaryRow {
                key: "Lines",
                value: stats.total_lines.to_string(),
            },
        ];
        if self.show_comments(stats) {
            rows.push(SummaryRow {
                key: "Removed comment lines",
                value: stats.comments_removed.to_string(),
            });
        }

        let ext_rows: Vec<ExtensionRow> = stats
            .sorted_extensions()
            .into_iter()
            .map(|(ext, files)| ExtensionRow {
                ext: ext.to_string(),
                files,
            })
            .collect();

        format!("{}\n{}", styled(Table::new(rows)), styled(Table::new(ext_rows)))
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}
