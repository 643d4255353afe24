//! Comenius CLI binary.
//!
//! This binary provides command-line access to Comenius:
//! - Generate a tutorial for a topic, streaming events as JSON lines
//! - Check that a configured provider is reachable

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_provider, run_generate};

    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => {
            run_generate(args).await?;
        }

        Commands::Check { provider } => {
            check_provider(provider.as_deref()).await?;
        }
    }

    Ok(())
}
