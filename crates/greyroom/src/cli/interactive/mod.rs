//! Interactive prompt, the default for bare `greyroom`.
//!
//! Every line is parsed into a [`Command`] and run against one long-lived
//! [`Workspace`]. A failing command prints its error and the prompt comes
//! back; only `exit`, Ctrl+C or end of input leave the loop. When stdin is
//! not a terminal, lines are read plainly so command files can be piped in.

pub mod command;
pub mod theme;

use std::io::{BufRead, IsTerminal, Write};

use console::Style;
use dialoguer::Input;
use greyroom_core::config::expand;
use greyroom_core::{format_bytes, Config, Grayscale, OutputFormat, OutputWriter, Workspace};

use self::command::{Command, Intensity};
use super::progress::IngestProgress;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const HELP: &str = "\
Commands:
  -i @\"path\"                      Add an image file or every image in a folder
  -i                              Add from the configured input folder
  @i | list [--json]              List images held in memory
  @i grayscale [N[%]] [name]      Blend toward grayscale (N in 0-100)
  -p | preview [name]             Write previews without clearing
  -o @\"path\" [--keep] [name]      Export, then clear exported images
  -o                              Export to the configured output folder
  ram                             Show memory held by images
  help                            Show this help
  exit | quit                     Leave

[name] is a file name, matched case-insensitively; `name#2` picks the
second image with that name.";

/// Entry point for the prompt.
pub fn run(config: Config) -> anyhow::Result<()> {
    let mut workspace = Workspace::new(config);
    let interactive = std::io::stdin().is_terminal();
    let mut piped = (!interactive).then(|| std::io::stdin().lock().lines());

    if interactive {
        theme::print_banner();
    }
    let theme = theme::greyroom_theme();

    loop {
        let line = match piped.as_mut() {
            Some(lines) => match lines.next() {
                Some(line) => line?,
                None => break,
            },
            None => {
                let input = Input::<String>::with_theme(&theme)
                    .with_prompt("greyroom")
                    .allow_empty(true)
                    .interact_text();
                match handle_interrupt(input)? {
                    Some(line) => line,
                    None => break,
                }
            }
        };

        match command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Exit)) => break,
            Ok(Some(cmd)) => {
                if let Err(e) = execute(&mut workspace, cmd) {
                    theme::print_error(&e);
                }
            }
            Err(e) => theme::print_error(&e),
        }
    }

    eprintln!("\nGoodbye!");
    Ok(())
}

/// Run one parsed command. `Exit` is handled by the loop.
fn execute(workspace: &mut Workspace, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Exit => {}

        Command::Help => println!("{HELP}"),

        Command::Ingest { path } => {
            let path = match path {
                Some(path) => expand(&path),
                None => workspace.config().input_dir(),
            };
            let mut progress = IngestProgress::new();
            let result = workspace.add_input_with_progress(&path, |e| progress.on_event(e));
            progress.finish();
            print!("{}", result?);
        }

        Command::List { json } => {
            let config = &workspace.config().output;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::parse(&config.format).unwrap_or(OutputFormat::Text)
            };
            let mut writer = OutputWriter::new(std::io::stdout().lock(), format, config.pretty);
            writer.write_listing(&workspace.list_input())?;
            writer.flush()?;
        }

        Command::Grayscale { intensity, target } => {
            let default = workspace.config().filter.default_intensity;
            if let Intensity::Invalid(raw) = &intensity {
                theme::print_warning(&format!("Invalid value: {raw}, using {default}%"));
            }
            let filter = Grayscale::new(intensity.resolve(default));
            let count = workspace.apply_grayscale(target.as_deref(), filter.intensity())?;
            println!(
                "Applied grayscale ({}%) to {} image(s)",
                filter.intensity(),
                count
            );
        }

        Command::Preview { target } => {
            print!("{}", workspace.save_preview(target.as_deref())?);
        }

        Command::Export { dest, keep, target } => {
            let dest = match dest {
                Some(dest) => expand(&dest),
                None => workspace.config().output_dir(),
            };
            let clear = workspace.config().export.clear_after_export && !keep;
            print!(
                "{}",
                workspace.export_output(&dest, clear, target.as_deref())?
            );
        }

        Command::Ram => {
            let bytes = workspace.ram_usage();
            let label = Style::new().bold();
            println!(
                "{} {} ({} bytes in {} image(s))",
                label.apply_to("RAM usage:"),
                format_bytes(bytes),
                bytes,
                workspace.store().len()
            );
        }
    }

    std::io::stdout().flush()?;
    Ok(())
}
