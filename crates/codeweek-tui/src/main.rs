//! Codeweek TUI entry point.

use std::path::PathBuf;

use clap::Parser;
use codeweek_app::{Runtime, SettingsStore};
use codeweek_client::{CHANNEL_MAIN, ChatClient, ClientConfig, DEFAULT_ENDPOINT};
use codeweek_tui::{Backend, TerminalDriver, logging};
use tracing::info;

/// Codeweek terminal chat client
#[derive(Parser, Debug)]
#[command(name = "codeweek-tui")]
#[command(about = "Terminal client for the Codeweek message board")]
#[command(version)]
struct Args {
    /// GraphQL HTTP endpoint.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// GraphQL WebSocket endpoint. Derived from --endpoint if omitted.
    #[arg(long)]
    ws_endpoint: Option<String>,

    /// Run against an in-process simulated backend instead of the network.
    #[arg(long)]
    simulate: bool,

    /// Settings file. Defaults to codeweek/settings.json in the config
    /// directory.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file. Defaults to codeweek/codeweek.log in the config directory.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file =
        args.log_file.unwrap_or_else(|| SettingsStore::default_dir().join("codeweek.log"));
    logging::init(&log_file, &args.log_level)?;

    let settings = args.settings.map_or_else(SettingsStore::load, SettingsStore::open);

    let (backend, channel) = if args.simulate {
        info!("using simulated backend");
        (Backend::simulated(0), CHANNEL_MAIN.to_string())
    } else {
        let mut config = ClientConfig::new(&args.endpoint)?;
        if let Some(ws_endpoint) = &args.ws_endpoint {
            config = config.with_ws_url(ws_endpoint)?;
        }
        info!(http = %config.http_url, ws = %config.ws_url, "using network backend");
        (Backend::network(&config)?, config.channel.clone())
    };

    let client = ChatClient::new(backend, channel);
    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, client, settings);

    Ok(runtime.run().await?)
}
