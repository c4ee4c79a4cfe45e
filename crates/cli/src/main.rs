//! Catalog sync CLI - local runs and queue management.
//!
//! # Usage
//!
//! ```bash
//! # Process one page and queue the next offset, exactly as the worker would
//! ciq-sync run --offset 0
//!
//! # Back-fill the whole catalog in-process without the queue
//! ciq-sync drive --offset 0
//!
//! # Stop a back-fill after 20 pages
//! ciq-sync drive --offset 0 --max-pages 20
//!
//! # Show the productSet input a catalog record maps to
//! ciq-sync map product.json
//!
//! # Start a sync by queueing its first offset
//! ciq-sync publish --offset 0
//! ```
//!
//! # Commands
//!
//! - `run` - Process one page
//! - `drive` - Process pages until the catalog is exhausted
//! - `map` - Dry-run the field mapper
//! - `publish` - Seed the offsets topic

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ciq-sync")]
#[command(author, version, about = "CatalogIQ to Shopify sync tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one catalog page and publish the next offset
    Run {
        /// Page cursor to process
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
    },
    /// Process pages in-process until the catalog is exhausted
    Drive {
        /// Page cursor to start from
        #[arg(short, long, default_value_t = 0)]
        offset: u64,

        /// Stop after this many pages without sending the completion email
        #[arg(short, long)]
        max_pages: Option<u64>,
    },
    /// Print the productSet input for a catalog record
    Map {
        /// Path to a JSON file holding one catalog record
        file: String,

        /// Vendor to write on the product
        #[arg(long, default_value = catalog_sync_core::DEFAULT_VENDOR)]
        vendor: String,

        /// Keep at most this many variants
        #[arg(long, default_value_t = 100)]
        max_variants: usize,
    },
    /// Publish an offset message to the offsets topic
    Publish {
        /// Page cursor to queue
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { offset } => commands::run::one_page(offset).await?,
        Commands::Drive { offset, max_pages } => {
            commands::drive::until_complete(offset, max_pages).await?;
        }
        Commands::Map {
            file,
            vendor,
            max_variants,
        } => commands::map::print_input(&file, &vendor, max_variants).await?,
        Commands::Publish { offset } => commands::publish::seed(offset).await?,
    }
    Ok(())
}
