mod repl_cmd;
mod runtime;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use coachline_config::{load_and_prepare, PreparedConfig};

#[derive(Parser)]
#[command(name = "coachline")]
#[command(about = "Coachline: practice job interviews against a conversational agent")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.coachline/coachline.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the full-screen interview UI
    Ui,
    /// Line-oriented session over stdin/stdout
    Repl,
    /// Show whether an agent is configured, and the effective config
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let PreparedConfig { config, warnings } = load_and_prepare(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    let _log_guard = coachline_logging::init_logger(&runtime::logger_settings(
        &config,
        matches!(cli.command, Commands::Status),
    ));
    runtime::report_config_warnings(&warnings);

    match cli.command {
        Commands::Ui => {
            let (handle, task) = runtime::build_coordinator(&config).spawn();
            info!(configured = config.agent.is_configured(), "Starting interview UI");
            let outcome = coachline_tui::run_ui(handle.clone()).await;
            // Stop the loop even if the UI failed, so an open session is ended.
            let _ = handle.shutdown();
            task.await.context("session coordinator panicked")?;
            outcome?;
        }
        Commands::Repl => {
            let (handle, task) = runtime::build_coordinator(&config).spawn();
            repl_cmd::run(&handle).await?;
            let _ = handle.shutdown();
            task.await.context("session coordinator panicked")?;
        }
        Commands::Status => status_cmd::run(&config)?,
    }

    Ok(())
}
