//! Tabular I/O: CSV/TSV reading and writing plus column detection.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Headers recognized as the identifier column, normalized form.
const IDENTIFIER_HEADERS: &[&str] = &["ean", "barcode", "gtin"];

/// Headers recognized as the product-name column, normalized form.
const NAME_HEADERS: &[&str] = &["product", "name", "title", "description"];

/// Errors from reading or writing a sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("unsupported file extension '{0}' (expected .csv or .tsv)")]
    UnsupportedFormat(String),

    #[error("input sheet has no columns")]
    Empty,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported tabular file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Tsv,
}

impl SheetFormat {
    /// Determines the format from a file path's extension.
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();

        match ext.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "tsv" | "tab" => Ok(SheetFormat::Tsv),
            other => Err(SheetError::UnsupportedFormat(other.to_string())),
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            SheetFormat::Csv => b',',
            SheetFormat::Tsv => b'\t',
        }
    }
}

/// An in-memory table of string cells with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads a table from a CSV or TSV file.
    pub fn read(path: &Path) -> Result<Self, SheetError> {
        let format = SheetFormat::from_path(path)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter())
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(SheetError::Empty);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        debug!("Read {} rows x {} columns from {}", rows.len(), headers.len(), path.display());

        Ok(Self { headers, rows })
    }

    /// Writes the table to a CSV or TSV file, chosen by extension.
    pub fn write(&self, path: &Path) -> Result<(), SheetError> {
        let format = SheetFormat::from_path(path)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(format.delimiter())
            .flexible(true)
            .from_path(path)?;

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Returns a cell, treating short rows as padded with empty strings.
    pub fn cell<'a>(row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Normalizes a header for matching: lowercased, non-alphanumerics stripped.
pub fn normalize(header: &str) -> String {
    header.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase()
}

/// Detected identifier and product-name columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub identifier: Option<usize>,
    pub product_name: Option<usize>,
}

/// Finds the identifier and product-name columns by header.
///
/// Positional fallback (columns one and two) applies only when neither header
/// matches.
pub fn detect_columns(headers: &[String]) -> ColumnMap {
    let identifier =
        headers.iter().position(|h| IDENTIFIER_HEADERS.contains(&normalize(h).as_str()));
    let product_name =
        headers.iter().position(|h| NAME_HEADERS.contains(&normalize(h).as_str()));

    match (identifier, product_name) {
        (None, None) => ColumnMap {
            identifier: Some(0),
            product_name: if headers.len() > 1 { Some(1) } else { None },
        },
        _ => ColumnMap { identifier, product_name },
    }
}
