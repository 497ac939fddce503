//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::market::Market;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Market to look prices up in
    #[serde(default)]
    pub market: Market,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay between retailer lookups in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to the delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format for single lookups
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_delay_ms() -> u64 {
    800
}

fn default_delay_jitter_ms() -> u64 {
    400
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: Market::Uk,
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            timeout_secs: default_timeout_secs(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("rrp-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(market) = std::env::var("RRP_MARKET") {
            if let Ok(m) = market.parse() {
                self.market = m;
            }
        }

        if let Ok(proxy) = std::env::var("RRP_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("RRP_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

/// Output format for single lookup results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: table, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.market, Market::Uk);
        assert_eq!(config.delay_ms, 800);
        assert_eq!(config.delay_jitter_ms, 400);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
        assert!(err.contains("table, json"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            market = "uk"
            delay_ms = 1500
            timeout_secs = 30
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.market, Market::Uk);
        assert_eq!(config.delay_ms, 1500);
        assert_eq!(config.timeout_secs, 30);
        // Unset fields keep their defaults
        assert_eq!(config.delay_jitter_ms, 400);
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            market = "uk"
            proxy = "socks5://localhost:1080"
            delay_ms = 2000
            delay_jitter_ms = 1000
            timeout_secs = 20
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.delay_ms, 2000);
        assert_eq!(config.delay_jitter_ms, 1000);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            market = "uk"
            delay_ms = 1200
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.market, Market::Uk);
        assert_eq!(config.delay_ms, 1200);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            delay_ms = 500
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.delay_ms, 500);
    }

    #[test]
    fn test_config_with_env() {
        let orig_proxy = std::env::var("RRP_PROXY").ok();
        let orig_delay = std::env::var("RRP_DELAY").ok();

        std::env::set_var("RRP_PROXY", "http://proxy:8080");
        std::env::set_var("RRP_DELAY", "2500");

        let config = Config::new().with_env();
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.delay_ms, 2500);

        match orig_proxy {
            Some(v) => std::env::set_var("RRP_PROXY", v),
            None => std::env::remove_var("RRP_PROXY"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("RRP_DELAY", v),
            None => std::env::remove_var("RRP_DELAY"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_values() {
        let orig_market = std::env::var("RRP_MARKET").ok();
        let orig_delay = std::env::var("RRP_DELAY").ok();

        std::env::set_var("RRP_MARKET", "not_a_market");
        std::env::set_var("RRP_DELAY", "not_a_number");

        let config = Config::new().with_env();
        // Invalid values are ignored, keeping defaults
        assert_eq!(config.market, Market::Uk);
        assert_eq!(config.delay_ms, 800);

        match orig_market {
            Some(v) => std::env::set_var("RRP_MARKET", v),
            None => std::env::remove_var("RRP_MARKET"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("RRP_DELAY", v),
            None => std::env::remove_var("RRP_DELAY"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            market: Market::Uk,
            proxy: Some("socks5://localhost:1080".to_string()),
            delay_ms: 1000,
            delay_jitter_ms: 250,
            timeout_secs: 10,
            format: OutputFormat::Json,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.market, config.market);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.delay_ms, config.delay_ms);
        assert_eq!(parsed.delay_jitter_ms, config.delay_jitter_ms);
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
        assert_eq!(parsed.format, config.format);
    }
}
