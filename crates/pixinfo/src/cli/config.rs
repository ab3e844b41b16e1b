//! The `pixinfo config` command, plus the settings summary shared with
//! interactive mode.

use anyhow::Context;
use clap::{Args, Subcommand};
use console::Style;
use pixinfo_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Summarize the effective settings
    Show {
        /// Print the full TOML instead of the summary
        #[arg(long)]
        toml: bool,
    },

    /// Show config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();
    match args.command {
        ConfigCommand::Show { toml } => {
            let config = load_at(&path)?;
            if toml {
                print!("{}", config.to_toml()?);
            } else {
                for (label, value) in summary_rows(&config, &path) {
                    println!("{:<16} {}", format!("{label}:"), value);
                }
            }
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
            if !path.exists() {
                let dim = Style::new().for_stderr().dim();
                eprintln!("{}", dim.apply_to("(not created yet; defaults are in use)"));
            }
        }

        ConfigCommand::Init { force } => {
            init_at(&path, force)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Load the config at `path`, or defaults when there is no file.
///
/// A file that exists but does not parse or validate is an error naming the
/// file and the way out.
pub fn load_at(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load_from(path).with_context(|| {
        format!(
            "Config file {} is invalid; fix it or run `pixinfo config init --force`",
            path.display()
        )
    })
}

/// Write default settings to `path`, then read them back through the normal
/// loader so a written file is known to load.
pub fn init_at(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Config::load_from(path)
        .with_context(|| format!("Written config at {} does not load", path.display()))?;

    tracing::info!("Config file created at: {}", path.display());
    Ok(())
}

/// Label/value pairs describing the effective settings.
pub fn summary_rows(config: &Config, path: &Path) -> Vec<(&'static str, String)> {
    let file_note = if path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };
    vec![
        ("Config file", format!("{} {}", path.display(), file_note)),
        ("Formats", config.processing.supported_formats.join(", ")),
        (
            "Directory reads",
            format!(
                "{} entries per page, {} links",
                config.processing.page_size,
                if config.processing.follow_links {
                    "following"
                } else {
                    "not following"
                }
            ),
        ),
        (
            "Limits",
            format!(
                "{} MB, {} ms decode timeout",
                config.limits.max_file_size_mb, config.limits.decode_timeout_ms
            ),
        ),
        (
            "Output",
            format!(
                "{}{}",
                config.output.format,
                if config.output.pretty { " (pretty)" } else { "" }
            ),
        ),
        (
            "Logging",
            format!("{} ({})", config.logging.level, config.logging.format),
        ),
        (
            "Idle prompt",
            format!(
                "\"{}\" after {} ms",
                config.status.idle_prompt, config.status.idle_delay_ms
            ),
        ),
    ]
}
