//! Lookup command: a one-off price lookup without a spreadsheet.

use crate::config::Config;
use crate::format::Formatter;
use crate::lookup::{build_query, LookupEngine};
use anyhow::{Context, Result};

/// Executes a single product lookup.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the lookup against real retailers and returns formatted output.
    pub async fn execute(&self, name: &str, identifier: Option<&str>) -> Result<String> {
        let engine = LookupEngine::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_engine(&engine, name, identifier).await
    }

    /// Runs the lookup with a provided engine (for testing).
    pub async fn execute_with_engine(
        &self,
        engine: &LookupEngine,
        name: &str,
        identifier: Option<&str>,
    ) -> Result<String> {
        let query = build_query(identifier, Some(name)).unwrap_or_default();
        let quote = engine.lookup(identifier, Some(name)).await;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_quote(&query, quote.as_ref()))
    }
}
