//! The `greyroom config` command.

use std::fmt::Write as _;
use std::path::Path;

use clap::{Args, Subcommand};
use greyroom_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Print the working directories and defaults the prompt will use
    Dirs,

    /// Write a config file with defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => print!("{}", Config::load()?.to_toml()?),
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Dirs => print!("{}", summary(&Config::load()?)),
        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            let config = Config::default();
            write_default(&path, &config, force)?;
            println!("Configuration initialized at: {}", path.display());
            print!("{}", summary(&config));
        }
    }
    Ok(())
}

/// Write `config` to `path` unless a file is already there and `force` is off.
fn write_default(path: &Path, config: &Config, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_toml()?)?;
    tracing::debug!("Config file written to {}", path.display());
    Ok(())
}

/// Resolved `[paths]` plus the `[filter]` and `[export]` defaults.
fn summary(config: &Config) -> String {
    let mut out = String::new();
    let rows = [
        ("Input (-i)", config.input_dir().display().to_string()),
        ("Preview (-p)", config.preview_dir().display().to_string()),
        ("Output (-o)", config.output_dir().display().to_string()),
        (
            "Grayscale",
            format!("{}% by default", config.filter.default_intensity),
        ),
        (
            "Export",
            format!(
                "JPEG quality {}, {}",
                config.export.jpeg_quality,
                if config.export.clear_after_export {
                    "clears exported images"
                } else {
                    "keeps exported images"
                }
            ),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<14} {}", label, value);
    }
    out
}
