//! Pixinfo CLI - Inspect dimensions, resolution, color depth and format of images.
//!
//! Pixinfo collects image files from the paths you give it, probes each one in
//! turn, and prints one row per image.
//!
//! # Usage
//!
//! ```bash
//! # Inspect dropped files and folders (folders are walked recursively)
//! pixinfo scan ~/Desktop/shots ./logo.png
//!
//! # Inspect exactly these files
//! pixinfo files a.jpg b.png --format json
//!
//! # Inspect the images directly inside one folder
//! pixinfo folder ./photos --output results.jsonl --format jsonl
//!
//! # Interactive mode
//! pixinfo
//! ```

use clap::{CommandFactory, Parser, Subcommand};

mod cli;
mod logging;

/// Pixinfo - Inspect dimensions, DPI, color depth and format of image files.
#[derive(Parser, Debug)]
#[command(name = "pixinfo")]
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
    /// Inspect files and folders; folders are walked recursively
    Scan(cli::scan::ScanArgs),

    /// Inspect a flat list of files
    Files(cli::scan::FilesArgs),

    /// Inspect the images directly inside a folder (prompts when omitted)
    Folder(cli::scan::FolderArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pixinfo_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixinfo config path`."
            );
            pixinfo_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pixinfo v{}", pixinfo_core::VERSION);

    match cli.command {
        Some(Commands::Scan(args)) => cli::scan::scan(args, config).await,
        Some(Commands::Files(args)) => cli::scan::files(args, config).await,
        Some(Commands::Folder(args)) => cli::scan::folder(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if console::user_attended() && console::user_attended_stderr() => {
            cli::interactive::run(config).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["pixinfo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn scan_requires_a_path() {
        assert!(Cli::try_parse_from(["pixinfo", "scan"]).is_err());
    }

    #[test]
    fn folder_path_is_optional() {
        let cli = Cli::try_parse_from(["pixinfo", "folder"]).unwrap();
        match cli.command {
            Some(Commands::Folder(args)) => assert!(args.dir.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pixinfo", "files", "a.png", "-v", "--json-logs"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
    }
}
