// Native client for the link backend: exercise both endpoints without a browser.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use linkglue::{
    config::{self, ConfigArgs},
    platform, ExchangeRequest, HttpBackend, LinkBackend, LinkMetadata, PublicToken,
};

/// linkglue - talk to the account-link endpoints of a running backend
///
/// Configuration priority: CLI args > Environment variables > config file > Defaults
#[derive(Parser, Debug)]
#[command(name = "linkglue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Account-link backend client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a link token and print its masked form
    Token,

    /// Send a public token + widget metadata to the exchange endpoint
    Exchange {
        /// Public token returned by the widget
        #[arg(long)]
        public_token: String,

        /// JSON file holding the widget's success metadata
        #[arg(long)]
        metadata: PathBuf,

        /// Print the request body and exit without sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    platform::init_logging(log::Level::Info);
    linkglue::debug::init_from_url_and_storage_once();

    let cli = Cli::parse();
    let cfg = config::load(&cli.config).context("Failed to load configuration")?;
    if cfg.base_url.is_empty() {
        bail!("LINK_BASE_URL (or --base-url) is required outside the browser");
    }
    cfg.print_summary();

    match cli.command {
        Command::Token => {
            let backend = HttpBackend::new(&cfg)?;
            let token = backend.create_link_token().await?;
            if token.is_empty() {
                bail!("backend returned an empty link token");
            }
            println!("link token: {}", token.masked());
        }
        Command::Exchange {
            public_token,
            metadata,
            dry_run,
        } => {
            let raw = std::fs::read_to_string(&metadata)
                .with_context(|| format!("Failed to read {}", metadata.display()))?;
            let metadata: LinkMetadata = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid link metadata in {}", metadata.display()))?;
            let request = ExchangeRequest::new(PublicToken::new(public_token), metadata);

            if dry_run {
                println!("{}", request.to_json()?);
                return Ok(());
            }

            let backend = HttpBackend::new(&cfg)?;
            let outcome = backend.exchange_public_token(&request).await?;
            println!("exchange accepted (HTTP {})", outcome.status);
        }
    }

    Ok(())
}
