use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::plan::OutputFormat;
use concertim_core::GlueConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "concertim-glue",
    about = "Concertim/OpenStack glue — rack placement planning and token checks",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to concertim.toml (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a batch of devices against an inventory file, without a live Concertim.
    ///
    /// The inventory is a JSON document `{"racks": [...], "templates": [...]}`
    /// shaped like the Concertim rack detail and template listings. Requests
    /// are a JSON array of `{"name", "description", "vcpus"}`.
    Plan {
        /// Inventory JSON file
        #[arg(short, long)]
        inventory: PathBuf,
        /// Device requests JSON file
        #[arg(short, long)]
        requests: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check an Authorization header value against the configured secret.
    VerifyToken {
        /// Full header value, e.g. "Bearer eyJ..."
        #[arg(short, long)]
        authorization: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GlueConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.filter))?,
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan {
            inventory,
            requests,
            format,
        } => commands::plan::plan(&inventory, &requests, format).await,
        Commands::VerifyToken { authorization } => {
            commands::token::verify(&config, &authorization)
        }
    }
}
