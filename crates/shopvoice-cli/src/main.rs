use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shopvoice_core::SyncResult;
use shopvoice_sync::{ClientSettings, ConfiguredSession, SyncError, SyncPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopvoice-cli")]
#[command(about = "Sync a Shopify shop into a Voiceflow knowledge base")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload the active product catalog as one knowledge-base table.
    SyncProducts {
        /// Replace existing documents with the same identity.
        #[arg(long)]
        overwrite: bool,
    },
    /// Upload each storefront page from the sitemap as a URL document.
    SyncUrls {
        #[arg(long)]
        overwrite: bool,
    },
    /// Print the pages a URL sync would upload, without uploading.
    ListPages,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = shopvoice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let session = ConfiguredSession::from_config(&config);
    let pipeline = SyncPipeline::new(ClientSettings::from_config(&config));
    let ctx = session.context();

    let outcome = match cli.command {
        Commands::SyncProducts { overwrite } => pipeline.sync_products(ctx, overwrite).await,
        Commands::SyncUrls { overwrite } => pipeline.sync_urls(ctx, overwrite).await,
        Commands::ListPages => {
            let pages = pipeline.discover_pages(ctx).await?;
            println!("{}", serde_json::to_string_pretty(&pages)?);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let (result, code) = report(outcome);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(code)
}

fn report(outcome: Result<SyncResult, SyncError>) -> (SyncResult, ExitCode) {
    match outcome {
        Ok(result) => (result, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "sync failed");
            (SyncResult::failure(e.to_string()), ExitCode::FAILURE)
        }
    }
}
