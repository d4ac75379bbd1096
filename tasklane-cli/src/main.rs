use anyhow::bail;
use clap::Parser;
use tasklane::{BoardEditor, Config, LoadState, SaveStatus};
use tasklane_cli::logging::configure_logging;
use tasklane_cli::{execute, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    tracing::debug!(api_url = %config.api_url, "using board service");

    let mut editor = BoardEditor::from_config(&config);
    if let LoadState::Failed(reason) = editor.load().await {
        bail!("Could not connect to the server. ({})", reason);
    }

    let output = execute(&mut editor, cli.command, cli.format)?;

    // Writes are queued; wait for them before reporting
    editor.flush().await;
    if let SaveStatus::Error(message) = editor.save_status() {
        bail!("Failed to save: {}", message);
    }

    if !cli.quiet {
        println!("{}", output);
    }
    Ok(())
}
