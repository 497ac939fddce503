//! Batch command: run the lookup over every row of a spreadsheet.

use crate::config::Config;
use crate::lookup::LookupEngine;
use crate::sheet::{detect_columns, Table};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns appended to the input table, in order.
pub const RESULT_HEADERS: [&str; 4] = ["RRP", "Currency", "Source", "Checked At (UTC)"];

/// Processes a spreadsheet row by row and writes the priced copy out.
pub struct BatchCommand {
    config: Config,
}

impl BatchCommand {
    /// Creates a new batch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the batch against real retailers and returns a summary line.
    pub async fn execute(&self, input: &Path, output: &Path) -> Result<String> {
        let engine = LookupEngine::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_engine(&engine, input, output).await
    }

    /// Runs the batch with a provided engine (for testing).
    pub async fn execute_with_engine(
        &self,
        engine: &LookupEngine,
        input: &Path,
        output: &Path,
    ) -> Result<String> {
        let mut table = Table::read(input)
            .with_context(|| format!("Failed to read input sheet: {}", input.display()))?;

        let columns = detect_columns(&table.headers);
        debug!(
            "Detected columns: identifier={:?}, product_name={:?}",
            columns.identifier, columns.product_name
        );

        // One timestamp shared by every row in the batch
        let checked_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        for header in RESULT_HEADERS {
            table.headers.push(header.to_string());
        }

        let total = table.rows.len();
        let mut found = 0usize;
        let mut skipped = 0usize;

        for (i, row) in table.rows.iter_mut().enumerate() {
            let identifier = columns
                .identifier
                .map(|c| Table::cell(row, c).trim().to_string())
                .filter(|s| !s.is_empty());
            let product_name = columns
                .product_name
                .map(|c| Table::cell(row, c).trim().to_string())
                .filter(|s| !s.is_empty());

            if identifier.is_none() && product_name.is_none() {
                row.extend(RESULT_HEADERS.iter().map(|_| String::new()));
                skipped += 1;
                continue;
            }

            info!(
                "Row {}/{}: {}",
                i + 1,
                total,
                product_name.as_deref().or(identifier.as_deref()).unwrap_or_default()
            );

            match engine.lookup(identifier.as_deref(), product_name.as_deref()).await {
                Some(quote) => {
                    found += 1;
                    row.push(format!("{:.2}", quote.price));
                    row.push(quote.currency);
                    row.push(quote.source_url);
                    row.push(checked_at.clone());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                    row.push(String::new());
                    row.push(checked_at.clone());
                }
            }
        }

        table
            .write(output)
            .with_context(|| format!("Failed to write output sheet: {}", output.display()))?;

        Ok(format!(
            "Processed {} rows ({} priced, {} skipped). Results written to {}",
            total,
            found,
            skipped,
            output.display()
        ))
    }
}

/// Derives the default output path from the input: `products.csv` becomes
/// `products-rrp.csv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("csv");
    input.with_file_name(format!("{}-rrp.{}", stem, ext))
}
