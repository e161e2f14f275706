//! Greyroom CLI - interactive batch image editor.
//!
//! Greyroom loads images into memory, blends them toward grayscale and
//! writes them back out. Everything happens in one session: images stay
//! resident until they are exported.
//!
//! # Usage
//!
//! ```bash
//! # Start the interactive prompt
//! greyroom
//!
//! # One-shot: ingest a folder, grayscale at 60%, export and exit
//! greyroom run ./photos --grayscale 60 --output ./out
//!
//! # View configuration
//! greyroom config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Greyroom - in-memory batch image editor.
#[derive(Parser, Debug)]
#[command(name = "greyroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive prompt (default)
    Repl,

    /// Ingest, filter and export in one go
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match greyroom_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `greyroom config path`."
            );
            greyroom_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Greyroom v{}", greyroom_core::VERSION);

    match cli.command {
        None | Some(Commands::Repl) => cli::interactive::run(config),
        Some(Commands::Run(args)) => cli::run::execute(args, config),
        Some(Commands::Config(args)) => cli::config::execute(args),
    }
}
