//! Prompt theme, banner and message styles for the interactive prompt.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// `ColorfulTheme` for the command prompt: cyan `>` prefix, no success
/// echo after each line.
pub fn greyroom_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style(">".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style(String::new()).for_stderr(),
        success_suffix: style(String::new()).for_stderr(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().white(),
        ..ColorfulTheme::default()
    }
}

/// Prints the banner to stderr so stdout stays clean for listings.
pub fn print_banner() {
    let version_line = format!("Greyroom v{}", greyroom_core::VERSION);
    let hint = "Type `help` for commands, `exit` to quit";

    let inner_width = hint.len() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", hint, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let cyan = Style::new().for_stderr().cyan();

    eprintln!();
    eprintln!("{}", cyan.apply_to(&top));
    eprintln!("{}", cyan.apply_to(&mid1));
    eprintln!("{}", cyan.apply_to(&mid2));
    eprintln!("{}", cyan.apply_to(&bot));
    eprintln!();
}

/// Prints an error line to stderr.
pub fn print_error(message: &dyn std::fmt::Display) {
    let red = Style::new().for_stderr().red();
    eprintln!("  {} {}", red.apply_to("✗"), message);
}

/// Prints a warning line to stderr.
pub fn print_warning(message: &str) {
    let yellow = Style::new().for_stderr().yellow();
    eprintln!("  {} {}", yellow.apply_to("!"), message);
}
