// attire-intelligence/src/main.rs

#[cfg(feature = "cli")]
use anyhow::Context;
#[cfg(feature = "cli")]
use attire_intelligence::{config::Config, telemetry, RecommendationRequest, SharedSignalState};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::io::Read;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Build a recommendation context from a request JSON document
#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "attire-intelligence", version, about)]
struct Cli {
    /// Request JSON file; reads stdin when omitted or `-`
    request: Option<PathBuf>,

    /// Catalog override directory (takes precedence over ATTIRE_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Pin the monthly calendar signal to this month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Pretty-print the context
    #[arg(long)]
    pretty: bool,
}

#[cfg(feature = "cli")]
fn read_request(path: Option<&PathBuf>) -> anyhow::Result<RecommendationRequest> {
    let raw = match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("Failed to read request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Request is not a valid recommendation request")
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let mut cfg = Config::from_env()?;
    if cli.data_dir.is_some() {
        cfg.data_dir = cli.data_dir.clone();
    }
    if cli.month.is_some() {
        cfg.calendar_month = cli.month;
    }

    let request = read_request(cli.request.as_ref())?;
    let state = SharedSignalState::init(cfg)?;
    let context = state.orchestrator().build_context(&request).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&context)?
    } else {
        serde_json::to_string(&context)?
    };
    println!("{}", output);

    state.shutdown().await;
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Enable with --features cli");
}
