use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use trivia_quiz::server::app::run_server;
use trivia_quiz::settings::Settings;
use trivia_quiz::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on, overrides `server.port`
    #[clap(long)]
    port: Option<u16>,
    /// Directory served under /static, overrides `server.static_dir`
    #[clap(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        settings.server.static_dir = static_dir;
    }
    if !settings.server.static_dir.is_dir() {
        anyhow::bail!(
            "Static directory {} does not exist",
            settings.server.static_dir.display()
        );
    }
    run_server(settings).await
}
