//! `rollcall`: terminal client for the node registry.
//!
//! ```bash
//! rollcall --server http://10.0.0.1:8080 --log-file /tmp/rollcall.log
//! ```
//!
//! Logs never go to the terminal the UI is drawn on; pass `--log-file` and
//! set `RUST_LOG` to see them.

use std::{
    error::Error,
    fs::File,
    io,
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use clap::Parser;
use rollcall_app::{ClientConfig, FilePreferences, Runtime};
use rollcall_client::HttpApi;
use rollcall_tui::TerminalDriver;
use tracing_subscriber::EnvFilter;

/// Terminal client for the node registry.
#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about)]
struct Args {
    /// Registry server base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Milliseconds between automatic refreshes.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Upper bound on each request, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Preferences file. Defaults to the platform config directory.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);
    match log_file {
        Some(path) => {
            let file = Mutex::new(File::create(path)?);
            let _ = builder.with_writer(file).try_init();
        },
        None => {
            let _ = builder.with_writer(io::sink).try_init();
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = ClientConfig {
        base_url: args.server,
        poll_interval: Duration::from_millis(args.interval_ms.max(1)),
        request_timeout: Duration::from_millis(args.timeout_ms.max(1)),
        prefs_path: args.prefs.or_else(FilePreferences::default_path),
    };

    let prefs_path = config.prefs_path.clone().unwrap_or_else(|| PathBuf::from("rollcall.json"));
    let prefs = FilePreferences::load(prefs_path)?;
    tracing::debug!(path = %prefs.path().display(), "preferences loaded");

    let api =
        HttpApi::builder().base_url(&config.base_url).timeout(config.request_timeout).build()?;

    let driver = TerminalDriver::new(config.base_url.clone())?;
    let app = Runtime::new(driver, api, prefs, config).run().await?;

    tracing::info!(nodes = app.snapshot().nodes.len(), "exited");
    Ok(())
}
