//! The `glimpse config` command: show, locate, or seed the settings file.
//!
//! The settings file controls which extensions are scanned, the
//! format-to-compression table, and the default output format.

use std::path::Path;

use clap::{Args, Subcommand};
use glimpse_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration as TOML
    Show,

    /// Show where the settings file is looked up
    Path,

    /// Write a settings file with the default scan setup
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            println!("{}", init_at(&Config::default_path(), force)?);
        }
    }

    Ok(())
}

/// Write the default settings file, refusing to clobber one unless forced.
fn init_at(path: &Path, force: bool) -> anyhow::Result<String> {
    if path.exists() && !force {
        anyhow::bail!(
            "Settings file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;

    Ok(format!(
        "Default configuration written to: {}\n\
         Edit [scan] to change the scanned extensions and [compression] to \
         adjust the format table.",
        path.display()
    ))
}
