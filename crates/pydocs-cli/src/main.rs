mod logging;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pydocs_client::ReqwestFetcher;
use pydocs_core::{CachedFetcher, DiskCache, Mode, ParserConfig, ParserService};

use crate::logging::LogConfig;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pydocs", version, about = "Python documentation parser")]
struct Cli {
    /// Parser mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the HTTP cache before running
    #[arg(short, long, default_value_t = false)]
    clear_cache: bool,

    /// Additional output method
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Directory holding logs, downloads, results and the HTTP cache
    #[arg(long, env = "PYDOCS_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let parsed = Cli::try_parse();
    let base_dir = resolve_base_dir(parsed.as_ref().ok());
    let log_ctx = logging::init(&LogConfig::new(base_dir.join("logs")))
        .context("Failed to set up logging")?;
    tracing::info!("Parser started");

    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) => {
            drop(log_ctx);
            e.exit();
        }
    };
    tracing::info!("Command-line arguments: {:?}", cli);

    let config = ParserConfig::from_env()
        .inspect_err(|e| tracing::error!("Invalid configuration: {e}"))?
        .with_base_dir(base_dir);

    let fetcher = ReqwestFetcher::with_timeout(config.request_timeout)
        .context("Failed to create HTTP client")?;
    let cache = DiskCache::new(config.cache_dir()).with_ttl(config.cache_ttl);
    if cli.clear_cache {
        cache.clear().await.context("Failed to clear HTTP cache")?;
    }

    let service = ParserService::new(CachedFetcher::new(fetcher, cache), config);
    let results = service.run(cli.mode).await?;

    if let Some(table) = results {
        output::control_output(&table, cli.output, cli.mode, &service.config().results_dir())?;
    }

    tracing::info!("Parser finished");
    Ok(())
}

/// Base directory for logs and outputs: `--base-dir`, then
/// `PYDOCS_BASE_DIR`, then the current directory. Needed before the rest of
/// the configuration is loaded.
fn resolve_base_dir(cli: Option<&Cli>) -> PathBuf {
    cli.and_then(|cli| cli.base_dir.clone())
        .or_else(|| std::env::var_os("PYDOCS_BASE_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
