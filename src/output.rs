//! Output formatting for report data and report listings.
//!
//! Report data is written as CSV or pretty-printed JSON; the report listing
//! uses the [`PrettyPrint`] trait.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ReportingError, Result};
use crate::models::{Report, ReportRow};

/// Output format for fetched report data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One header row of sorted column names, then one row per record.
    #[default]
    Csv,
    /// Pretty-printed JSON array of records.
    Json,
}

impl FromStr for OutputFormat {
    type Err = ReportingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReportingError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl OutputFormat {
    /// Write `rows` to `writer` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write<W: Write>(self, writer: W, rows: &[ReportRow]) -> Result<()> {
        match self {
            Self::Csv => write_csv(writer, rows),
            Self::Json => write_json(writer, rows),
        }
    }
}

/// Sorted union of the column names across `rows`.
pub fn columns(rows: &[ReportRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Write `rows` as CSV.
///
/// Columns are the sorted union of all record keys; a record without a
/// column gets an empty field. Nothing is written for an empty slice.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let columns = columns(rows);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&columns)?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|col| row.get(col).map(csv_field).unwrap_or_default())
            .collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `rows` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_json<W: Write>(mut writer: W, rows: &[ReportRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        // Numbers, bools and nested values keep their JSON spelling.
        other => other.to_string(),
    }
}

/// Trait for human-readable output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Report {
    fn pretty_print(&self) -> String {
        format!(
            "{} report: {}\n\tLast Updated: {}",
            self.name, self.description, self.last_updated
        )
    }
}
