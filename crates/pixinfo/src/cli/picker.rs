//! Terminal folder picker.

use async_trait::async_trait;
use console::Style;
use dialoguer::Input;
use pixinfo_core::config::ProcessingConfig;
use pixinfo_core::pipeline::FsDirectoryEntry;
use pixinfo_core::{DirectoryEntry, DirectoryPicker, PipelineError, PipelineResult};
use std::path::PathBuf;

use super::interactive::theme::pixinfo_theme;

/// Asks for a folder path on the terminal.
///
/// An empty answer, Esc or Ctrl+C dismisses the picker. Without an attended
/// terminal the picker is unavailable.
pub struct PromptPicker {
    config: ProcessingConfig,
}

impl PromptPicker {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl DirectoryPicker for PromptPicker {
    async fn pick(&self) -> PipelineResult<Option<Box<dyn DirectoryEntry>>> {
        if !console::user_attended_stderr() {
            return Err(PipelineError::PickerUnavailable(
                "no interactive terminal to choose a folder from".to_string(),
            ));
        }

        let theme = pixinfo_theme();
        loop {
            let answer = Input::<String>::with_theme(&theme)
                .with_prompt("Folder to inspect (empty to cancel)")
                .allow_empty(true)
                .interact_text();

            let raw = match answer {
                Ok(raw) => raw,
                Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                    return Ok(None);
                }
                Err(e) => return Err(PipelineError::PickerUnavailable(e.to_string())),
            };

            let Some(path) = expand_path(&raw) else {
                return Ok(None);
            };

            if !path.is_dir() {
                let warn = Style::new().for_stderr().yellow();
                eprintln!(
                    "  {}",
                    warn.apply_to(format!("Not a folder: {}", path.display()))
                );
                continue;
            }

            return Ok(Some(Box::new(FsDirectoryEntry::new(path, &self.config))));
        }
    }
}

/// Trim and expand `~` in a typed path. Blank input means no path.
pub fn expand_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(raw).into_owned()))
}
