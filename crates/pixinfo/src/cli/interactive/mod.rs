//! Interactive CLI mode: a menu-driven session for bare `pixinfo` invocation.
//!
//! The session keeps one results table and one status line across actions.
//! The menu prompt always shows the current status.

pub mod theme;

use console::Style;
use dialoguer::{Input, Select};
use pixinfo_core::{CollectInput, Config, Inspector, ResultTable, RunOutcome, StatusLine};
use std::path::PathBuf;

use super::picker::{expand_path, PromptPicker};
use super::scan::{entries_from_paths, handles_from_paths, Reporter};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &[
    "Select image files",
    "Select a folder",
    "Scan files and folders (recursive)",
    "Show results table",
    "Clear results",
    "Configuration",
    "Exit",
];

/// State that lives for the whole interactive session.
struct Session {
    inspector: Inspector,
    table: ResultTable,
    status: StatusLine,
}

impl Session {
    fn new(config: Config) -> Self {
        let status = StatusLine::new(&config.status);
        Self {
            inspector: Inspector::new(config),
            table: ResultTable::new(),
            status,
        }
    }

    async fn inspect(&mut self, input: CollectInput) {
        let outcome = {
            let mut reporter = Reporter::new().with(&mut self.table).with(&mut self.status);
            self.inspector.inspect(input, &mut reporter).await
        };
        self.report(&outcome);
    }

    async fn select_folder(&mut self) {
        let picker = PromptPicker::new(&self.inspector.config().processing);
        let result = {
            let mut reporter = Reporter::new().with(&mut self.table).with(&mut self.status);
            self.inspector.select_folder(&picker, &mut reporter).await
        };
        match result {
            Ok(outcome) => self.report(&outcome),
            Err(e) => theme::error(e),
        }
    }

    fn report(&self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed(_) => self.show_table(),
            RunOutcome::NoImages => theme::warn("No image files found."),
            RunOutcome::Cancelled => {}
        }
    }

    fn show_table(&self) {
        if self.table.is_empty() {
            theme::note("No results yet.");
            return;
        }
        println!();
        print!("{}", self.table.render());
        println!();
    }

    fn clear(&mut self) {
        self.table.clear();
        theme::note("Results cleared.");
    }
}

/// Entry point for interactive mode. Called when `pixinfo` is invoked with no subcommand on a TTY.
pub async fn run(config: Config) -> anyhow::Result<()> {
    theme::print_banner();

    let menu_theme = theme::pixinfo_theme();
    let mut session = Session::new(config);

    loop {
        let selection = Select::with_theme(&menu_theme)
            .with_prompt(session.status.text())
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => {
                if let Some(paths) = prompt_paths("Image files")? {
                    let handles = handles_from_paths(&paths);
                    session.inspect(CollectInput::Files(handles)).await;
                }
            }
            Some(1) => session.select_folder().await,
            Some(2) => {
                if let Some(paths) = prompt_paths("Files or folders")? {
                    let entries =
                        entries_from_paths(&paths, &session.inspector.config().processing);
                    session.inspect(CollectInput::Entries(entries)).await;
                }
            }
            Some(3) => session.show_table(),
            Some(4) => session.clear(),
            Some(5) => show_config(session.inspector.config())?,
            Some(6) | None => break, // Exit or Ctrl+C / Esc
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Ask for one or more paths. Returns `None` when the user backs out.
fn prompt_paths(prompt: &str) -> anyhow::Result<Option<Vec<PathBuf>>> {
    let theme = theme::pixinfo_theme();
    let Some(raw) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt(format!("{prompt} (space separated, quote paths with spaces)"))
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(None);
    };

    let paths: Vec<PathBuf> = split_paths(&raw)
        .iter()
        .filter_map(|token| expand_path(token))
        .collect();
    if paths.is_empty() {
        return Ok(None);
    }
    Ok(Some(paths))
}

/// Split typed or pasted input into path tokens.
///
/// Terminals paste dropped files either quoted or, on Unix, with
/// backslash-escaped spaces. Elsewhere a backslash is a path separator.
fn split_paths(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => quote = Some(c),
            (None, '\\') if cfg!(unix) => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Interactive config viewer: a short summary plus the full TOML on request.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let menu_theme = theme::pixinfo_theme();
    let dim = Style::new().for_stderr().dim();
    let label = Style::new().for_stderr().bold();

    let config_path = Config::default_path();

    loop {
        eprintln!();
        for (name, value) in super::config::summary_rows(config, &config_path) {
            eprintln!("    {:<20} {}", label.apply_to(format!("{name}:")), value);
        }
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];
        let selection = Select::with_theme(&menu_theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                }
                Err(e) => theme::error(format!("Failed to serialize config: {e}")),
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", config_path.display());
            }
            Some(2) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_paths() {
        assert_eq!(split_paths("a.png  b.jpg\tc"), vec!["a.png", "b.jpg", "c"]);
    }

    #[test]
    fn split_quoted_paths() {
        assert_eq!(
            split_paths(r#""my shots/a.png" 'b c.jpg'"#),
            vec!["my shots/a.png", "b c.jpg"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn split_escaped_spaces() {
        assert_eq!(split_paths(r"d\ e.gif f.png"), vec!["d e.gif", "f.png"]);
    }

    #[cfg(not(unix))]
    #[test]
    fn split_keeps_windows_separators() {
        assert_eq!(
            split_paths(r#"C:\shots\a.png "C:\my shots\b.png""#),
            vec![r"C:\shots\a.png", r"C:\my shots\b.png"]
        );
    }

    #[test]
    fn split_empty_input() {
        assert!(split_paths("   ").is_empty());
    }

    #[test]
    fn interrupt_maps_to_none() {
        let err = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(handle_interrupt::<String>(Err(err)).unwrap().is_none());
    }

    #[test]
    fn menu_has_exit_last() {
        assert_eq!(MENU_ITEMS.last(), Some(&"Exit"));
    }
}
