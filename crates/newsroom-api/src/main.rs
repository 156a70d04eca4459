//! Newsroom CLI entry point.
//!
//! Binary name: `newsroom`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,newsroom_core=debug,newsroom_infra=debug",
        _ => "trace",
    };
    newsroom_observe::init_tracing(filter).map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "newsroom", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration
    let state = AppState::init().await?;

    match cli.command {
        Commands::Publish {
            topic,
            essay_only,
            timeout,
            output_dir,
            refine_rounds,
        } => {
            let opts = cli::publish::PublishOpts {
                essay_only,
                timeout,
                output_dir,
                refine_rounds,
            };
            cli::publish::publish(&state, &topic, opts, cli.json).await?;
        }

        Commands::Research { topic, save } => {
            cli::research::research(&state, &topic, save, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
