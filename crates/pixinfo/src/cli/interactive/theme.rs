//! Dialoguer theme, banner and message styles for interactive mode.
//!
//! Everything here prints to stderr so stdout stays clean for result tables.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Theme for menus and prompts: magenta accents, green confirmations.
pub fn pixinfo_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("◆".to_string()).for_stderr().magenta(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Dimmed note, e.g. counts and hints.
pub fn note(message: impl std::fmt::Display) {
    eprintln!("  {}", Style::new().for_stderr().dim().apply_to(message));
}

/// Yellow warning line.
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("  {}", Style::new().for_stderr().yellow().apply_to(message));
}

/// Red error line with a cross.
pub fn error(message: impl std::fmt::Display) {
    let red = Style::new().for_stderr().red();
    eprintln!("  {} {}", red.apply_to("✗"), message);
}

fn banner_lines() -> Vec<String> {
    let title = format!("pixinfo v{}", pixinfo_core::VERSION);
    let tagline = "size, resolution and depth of your images";
    let width = title.chars().count().max(tagline.chars().count()) + 4;

    vec![
        format!("  ┌{}┐", "─".repeat(width)),
        format!("  │{:^width$}│", title),
        format!("  │{:^width$}│", tagline),
        format!("  └{}┘", "─".repeat(width)),
    ]
}

/// Prints the version banner to stderr.
pub fn print_banner() {
    let accent = Style::new().for_stderr().magenta();
    eprintln!();
    for line in banner_lines() {
        eprintln!("{}", accent.apply_to(line));
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lines_share_a_width() {
        let lines = banner_lines();
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
        assert!(lines[1].contains(pixinfo_core::VERSION));
    }
}
