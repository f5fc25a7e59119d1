use std::path::PathBuf;

use clap::Parser;
use portscope_core::{config::Config, session::Session};
use portscope_tui::theme::Theme;

#[derive(Parser)]
#[command(name = "portscope", about = "Search and fly between the world's ports in a terminal map")]
struct Cli {
    /// Write debug logs to /tmp/portscope-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Read configuration from this file instead of ~/.config/portscope/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection of ports to search instead of the bundled set.
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Colour theme (`default`, `gruvbox`). Overrides `ui.theme`.
    #[arg(long)]
    theme: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/portscope-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("portscope debug log started, tail -f /tmp/portscope-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config unreadable, using defaults");
            Config::defaults()
        }),
    };
    if let Some(name) = cli.theme {
        config.ui.theme = name;
    }
    let theme = Theme::by_name(&config.ui.theme);

    // Lookups run on the runtime's workers while the main thread draws.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("portscope-search")
        .enable_all()
        .build()?;

    let session = Session::bootstrap(&config, cli.dataset.as_deref(), runtime.handle().clone())?;
    let result = portscope_tui::run(session, config.ui, theme);

    runtime.shutdown_background();
    result
}
