//! Record serialization to JSON and CSV
//!
//! Output is rendered fully in memory before anything touches the
//! filesystem, so an unsupported format or a rendering failure never leaves
//! a partial file behind. Existing files are overwritten.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ExtractError, Result};
use crate::types::MovieRecord;

/// CSV header, in column order
pub const CSV_HEADER: [&str; 8] = [
    "title",
    "releaseYear",
    "rating",
    "duration",
    "genreTags",
    "plotSummary",
    "directors",
    "cast",
];

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// Fixed file name written for this format
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "output.json",
            OutputFormat::Csv => "output.csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ExtractError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Render records in the requested format.
///
/// An empty slice renders as `[]` (JSON) or a header-only table (CSV).
pub fn render(records: &[MovieRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(records),
        OutputFormat::Csv => Ok(render_csv(records)),
    }
}

/// Render records and write them to the format's fixed file in `dir`.
///
/// # Returns
/// The path that was written
pub fn save(records: &[MovieRecord], format: OutputFormat, dir: &Path) -> Result<PathBuf> {
    let content = render(records, format)?;
    let path = dir.join(format.file_name());
    std::fs::write(&path, content)?;
    Ok(path)
}

fn render_json(records: &[MovieRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn render_csv(records: &[MovieRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for record in records {
        // Plot quotes become apostrophes before quoting.
        let plot = record.plot_summary.replace('"', "'");
        let row = [
            quote(&record.title),
            record.release_year.clone(),
            record.rating.clone(),
            record.duration.clone(),
            quote(&record.genre_tags),
            quote(&plot),
            quote(&record.directors),
            quote(&record.cast),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
