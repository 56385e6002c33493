//! Import and export of transaction files.
//!
//! The file name only selects the codec; delivery of exported payloads is up to
//! the caller, with [`ExportPayload::write_to`] as a filesystem convenience.

pub mod csv;
pub mod json;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::info;

use crate::{
    domain::{AmountPolicy, Transaction},
    errors::{Result, TrackerError},
    time::{Clock, SystemClock},
};

/// Prefix used for exported file names unless configured otherwise.
pub const DEFAULT_EXPORT_PREFIX: &str = "yakstra_transactions";

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Picks the codec from a file name's extension.
    pub fn from_filename(name: &str) -> Result<Self> {
        if name.ends_with(".json") {
            Ok(FileFormat::Json)
        } else if name.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else {
            Err(TrackerError::Format(format!(
                "Unsupported file format: `{}`",
                name
            )))
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileFormat::Json => "application/json",
            FileFormat::Csv => "text/csv",
        }
    }
}

/// Encoded export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl ExportPayload {
    /// Writes the payload into `dir` under its suggested file name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        info!(path = %path.display(), bytes = self.content.len(), "export written");
        Ok(path)
    }
}

/// `<prefix>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(prefix: &str, date: NaiveDate, format: FileFormat) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn export(
    transactions: &[Transaction],
    format: FileFormat,
    prefix: &str,
    date: NaiveDate,
) -> Result<ExportPayload> {
    let content = match format {
        FileFormat::Json => json::encode(transactions)?,
        FileFormat::Csv => csv::encode(transactions),
    };
    info!(
        count = transactions.len(),
        format = format.extension(),
        "transactions exported"
    );
    Ok(ExportPayload {
        filename: export_filename(prefix, date, format),
        mime_type: format.mime_type(),
        content,
    })
}

/// Decodes file content, choosing the codec by `filename`.
pub fn import_str(filename: &str, content: &str, policy: AmountPolicy) -> Result<Vec<Transaction>> {
    let clock = SystemClock;
    import_str_with_clock(filename, content, policy, &clock)
}

pub fn import_str_with_clock(
    filename: &str,
    content: &str,
    policy: AmountPolicy,
    clock: &dyn Clock,
) -> Result<Vec<Transaction>> {
    let transactions = match FileFormat::from_filename(filename)? {
        FileFormat::Json => json::decode_with_clock(content, policy, clock)?,
        FileFormat::Csv => csv::decode_with_clock(content, policy, clock)?,
    };
    info!(filename, count = transactions.len(), "transactions decoded");
    Ok(transactions)
}

/// Reads and decodes a file in one shot.
pub fn import_file(path: &Path, policy: AmountPolicy) -> Result<Vec<Transaction>> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TrackerError::Format(format!("`{}` has no file name", path.display())))?;
    FileFormat::from_filename(name)?;
    let content = fs::read_to_string(path)?;
    import_str(name, &content, policy)
}
