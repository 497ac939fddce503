//! Output formatting for single lookup results (table, JSON).

use crate::config::OutputFormat;
use crate::lookup::Quote;

/// Formats a lookup outcome for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the outcome of a single lookup.
    pub fn format_quote(&self, query: &str, quote: Option<&Quote>) -> String {
        match self.format {
            OutputFormat::Json => self.json(quote),
            OutputFormat::Table => self.table(query, quote),
        }
    }

    fn json(&self, quote: Option<&Quote>) -> String {
        serde_json::to_string_pretty(&quote).unwrap_or_else(|_| "null".to_string())
    }

    fn table(&self, query: &str, quote: Option<&Quote>) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Query:    {}", query));

        match quote {
            Some(quote) => {
                lines.push(format!("RRP:      {} {:.2}", quote.currency, quote.price));
                lines.push(format!("Source:   {}", quote.source_url));
            }
            None => {
                lines.push("RRP:      not found".to_string());
            }
        }

        lines.join("\n")
    }
}
