// CLI module - command-line argument parsing and handlers
//
// Running without a subcommand starts the TUI. The config subcommand is for
// inspecting and resetting the config file:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults

use crate::config::{Config, Overrides, VERSION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// clipz - terminal clipboard history
#[derive(Parser, Debug)]
#[command(name = "clipz")]
#[command(version = VERSION)]
#[command(about = "Clipboard history manager for the terminal", long_about = None)]
pub struct Cli {
    /// Directory holding config.toml and the saved clips (default ~/.clipz)
    #[arg(short = 'c', long = "configdir", global = true)]
    pub configdir: Option<PathBuf>,

    /// Keep leading and trailing CR/LF on captured clips
    #[arg(short = 'l', long = "leavecrlf", global = true)]
    pub leavecrlf: bool,

    /// Number of clips kept in the capture history (default 100)
    #[arg(
        short = 'b',
        long = "buffersize",
        visible_alias = "scrollback",
        global = true,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub buffersize: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_dir: self.configdir.clone(),
            buffer_size: self.buffersize.map(|n| n as usize),
            leave_crlf: self.leavecrlf,
        }
    }
}

/// Handle a subcommand. Returns true if one ran (exit after).
pub fn handle_command(cli: &Cli) -> Result<bool> {
    let Some(Commands::Config { show, reset, path }) = &cli.command else {
        return Ok(false);
    };

    let config = Config::load(&cli.overrides());
    if *path {
        println!("{}", config.config_path().display());
    } else if *show {
        handle_config_show(&config);
    } else if *reset {
        handle_config_reset(&config)?;
    } else {
        println!("Usage: clipz config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    Ok(true)
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (flags > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    let path = config.config_path();
    if path.exists() {
        println!("# Source: {}", path.display());
    } else {
        println!("# Source: defaults (no config file)");
    }
}

fn handle_config_reset(config: &Config) -> Result<()> {
    let path = config.config_path();

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    std::fs::create_dir_all(&config.config_dir)
        .with_context(|| format!("Failed to create {}", config.config_dir.display()))?;

    let template = Config::with_dir(config.config_dir.clone()).to_toml();
    std::fs::write(&path, template)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["clipz", "-c", "/tmp/c", "-l", "-b", "12"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.config_dir, Some(PathBuf::from("/tmp/c")));
        assert!(overrides.leave_crlf);
        assert_eq!(overrides.buffer_size, Some(12));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_scrollback_alias() {
        let cli = Cli::try_parse_from(["clipz", "--scrollback", "7"]).unwrap();
        assert_eq!(cli.buffersize, Some(7));
    }

    #[test]
    fn test_buffersize_must_be_positive() {
        assert!(Cli::try_parse_from(["clipz", "--buffersize", "0"]).is_err());
        assert!(Cli::try_parse_from(["clipz", "--buffersize", "-3"]).is_err());
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::try_parse_from(["clipz", "config", "--path", "-c", "/tmp/c"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config { path: true, .. })
        ));
        assert_eq!(cli.configdir, Some(PathBuf::from("/tmp/c")));
    }
}
