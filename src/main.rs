//! rrp-crawler - recommended retail price lookup for product spreadsheets

use anyhow::Result;
use clap::{Parser, Subcommand};
use rrp_crawler::commands::{batch, BatchCommand, LookupCommand};
use rrp_crawler::config::{Config, OutputFormat};
use rrp_crawler::market::Market;
use rrp_crawler::retailers::Retailer;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rrp-crawler",
    version,
    about = "Recommended retail price lookup for product spreadsheets",
    long_about = "Looks up recommended retail prices by searching the web for retailer \
                  product pages and extracting prices from their markup."
)]
struct Cli {
    /// Market to look prices up in
    #[arg(short, long, default_value = "uk", global = true)]
    market: Market,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "RRP_PROXY")]
    proxy: Option<String>,

    /// Delay between retailer lookups in milliseconds
    #[arg(long, default_value = "800", global = true, env = "RRP_DELAY")]
    delay: u64,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for single lookups
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price every row of a spreadsheet (CSV/TSV)
    #[command(alias = "b")]
    Batch {
        /// Input spreadsheet
        input: PathBuf,

        /// Output path (defaults to <input>-rrp.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up a single product
    #[command(alias = "l")]
    Lookup {
        /// Product name
        name: String,

        /// EAN/barcode to sharpen the search
        #[arg(long)]
        ean: Option<String>,
    },

    /// List supported retailers
    Retailers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.market = cli.market;
    config.format = cli.format;
    config.delay_ms = cli.delay;

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Batch { input, output } => {
            let output = output.unwrap_or_else(|| batch::default_output_path(&input));

            let cmd = BatchCommand::new(config);
            let summary = cmd.execute(&input, &output).await?;
            println!("{}", summary);
        }

        Commands::Lookup { name, ean } => {
            let cmd = LookupCommand::new(config);
            let output = cmd.execute(&name, ean.as_deref()).await?;
            println!("{}", output);
        }

        Commands::Retailers => {
            println!("Supported retailers:\n");
            println!("{:<14} {:<20} {:<8}", "Name", "Domain", "Market");
            println!("{:-<14} {:-<20} {:-<8}", "", "", "");

            for retailer in Retailer::for_market(config.market) {
                println!(
                    "{:<14} {:<20} {:<8}",
                    retailer.name(),
                    retailer.domain(),
                    retailer.market().to_string()
                );
            }
        }
    }

    Ok(())
}
