use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fmsh::app::App;
use fmsh::config::{self, APP_NAME, APP_VERSION, AppConfig, DEFAULT_LOG_FILTER, LOG_FILE};
use fmsh::core::SessionStore;

#[derive(Parser)]
#[command(name = "fmsh", version, about = "Paged console file manager")]
struct Args {
    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the last directory and page are kept between runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to a file; stdout belongs to the window.
    let log_dir = args.log_dir.unwrap_or_else(config::default_log_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    info!("starting {} {}", APP_NAME, APP_VERSION);

    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let settings = AppConfig::load_or_default(&config_path).settings();

    let store = SessionStore::new(args.state.unwrap_or_else(config::default_state_path));
    let state = store.restore();

    let stdin = io::stdin();
    let mut app = App::new(settings, store, state, stdin.lock(), io::stdout())
        .context("cannot build the command table")?;
    app.run().context("console I/O failed")?;

    info!("exiting");
    Ok(())
}
