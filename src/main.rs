// ABOUTME: Entry point for chatscout — runs the pipeline against a scripted replay surface.
// ABOUTME: Parses CLI args, loads config, initializes tracing, and drives the replay script.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatscout::app::Assistant;
use chatscout::config::Config;
use chatscout::notify::ConsoleNotifier;
use chatscout::replay;
use chatscout::surface::ScriptedSurface;

#[derive(Parser)]
#[command(
    name = "scout",
    about = "Watches a messaging UI, classifies opened chats, and surfaces phone numbers"
)]
struct Cli {
    /// JSON step script simulating the host UI (see the replay module).
    script: PathBuf,

    /// Config file path (defaults to ~/.chatscout/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Acknowledge notifications immediately instead of waiting for Enter.
    #[arg(long)]
    auto_ack: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let script = replay::load_script(&cli.script)?;

    let surface = ScriptedSurface::new();
    let notifier = Arc::new(ConsoleNotifier::new(cli.auto_ack));
    let assistant = Assistant::new(Arc::new(surface.clone()), notifier, config);

    let pipeline = tokio::spawn(async move { assistant.run().await });

    replay::run_script(&surface, script).await;

    // The pipeline returns once every activation binding is gone. Dropping
    // the surface's bindings closes its activation channel; the pipeline then
    // finishes the in-flight chain (if any) and drains the queue before
    // exiting, so nothing is killed mid-navigation or mid-acknowledgment.
    surface.clear_bindings();
    pipeline.await??;

    Ok(())
}
