//! # swift-cli
//!
//! Command-line interface for the SWIFT code registry.
//!
//! Every subcommand opens the configured store, initializes its schema and
//! runs one registry operation. Views are printed as JSON on stdout; logs go
//! to stderr.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use swift_adapter_csv::{SwiftCodeReader, load_countries, load_countries_from_path};
use swift_adapter_db::DbConnection;
use swift_model::RecordInput;
use swift_registry::RegistryService;
use swift_validation::CountryTable;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "swift-registry")]
#[command(about = "SWIFT/BIC code registry")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL (local path, :memory:, or libsql:// for remote)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Country reference CSV with ISO2 and NAME columns
    #[arg(long, global = true)]
    countries: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CSV batch of SWIFT codes
    Import {
        /// Batch file; defaults to `import_path` from the configuration
        input: Option<PathBuf>,
    },

    /// Show one SWIFT code
    Get {
        code: String,
    },

    /// List every SWIFT code of a country
    Country {
        iso2: String,
    },

    /// Add a headquarters or a branch
    Add {
        #[arg(long)]
        code: String,

        #[arg(long, default_value = "")]
        bank_name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long)]
        country_iso2: String,

        /// Must match the reference name for the ISO2 when given
        #[arg(long)]
        country_name: Option<String>,

        /// Register as headquarters (code must end with XXX)
        #[arg(long)]
        headquarters: bool,
    },

    /// Delete a headquarters with its branches, or a single branch
    Delete {
        code: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(path) = cli.countries {
        config.countries_path = Some(path);
    }

    let countries = Arc::new(load_country_table(&config)?);
    let store = DbConnection::with_config(config.connection());
    store
        .initialize()
        .await
        .context("failed to initialize registry store")?;
    let service = RegistryService::new(store, Arc::clone(&countries));

    match cli.command {
        Commands::Import { input } => {
            let path = input
                .or_else(|| config.import_path.clone())
                .context("no import file given and import_path is not configured")?;
            let report = SwiftCodeReader::new(&countries)
                .read_path(&path)
                .with_context(|| format!("failed to read batch '{}'", path.display()))?;
            if !report.rejected.is_empty() {
                warn!(rejected = report.rejected.len(), "some rows were not imported");
            }
            info!(
                headquarters = report.headquarters_count(),
                branches = report.branch_count(),
                "importing batch"
            );
            let summary = service.import_batch(report.records).await?;
            if !summary.has_changes() {
                info!("registry already up to date");
            }
            info!(total = summary.total_processed(), "import complete");
            println!("{summary}");
        }
        Commands::Get { code } => {
            let view = service.get_details(&code).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Country { iso2 } => {
            let view = service.get_by_country(&iso2).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Add {
            code,
            bank_name,
            address,
            country_iso2,
            country_name,
            headquarters,
        } => {
            let mut record = RecordInput::new(code, country_iso2, headquarters)
                .with_bank_name(bank_name)
                .with_address(address);
            if let Some(name) = country_name {
                record = record.with_country_name(name);
            }
            println!("{}", service.add(record).await?);
        }
        Commands::Delete { code } => {
            println!("{}", service.delete(&code).await?);
        }
    }

    service.store().close().await;
    Ok(())
}

fn load_country_table(config: &AppConfig) -> Result<CountryTable> {
    match &config.countries_path {
        Some(path) => load_countries_from_path(path)
            .with_context(|| format!("failed to load countries from '{}'", path.display())),
        None => load_countries().context("failed to load embedded country table"),
    }
}
