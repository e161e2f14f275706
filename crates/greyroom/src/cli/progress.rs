//! Ingest progress display shared by the prompt and `run`.

use console::Style;
use greyroom_core::{format_bytes, IngestEvent};
use indicatif::{ProgressBar, ProgressStyle};

/// Turns [`IngestEvent`]s into a progress bar plus one line per added file.
///
/// The bar only appears for folders with more than one candidate. Skipped
/// files are left to the final [`greyroom_core::IngestReport`].
#[derive(Default)]
pub struct IngestProgress {
    bar: Option<ProgressBar>,
}

impl IngestProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: IngestEvent<'_>) {
        match event {
            IngestEvent::Discovered { total } if total > 1 => {
                self.bar = Some(create_progress_bar(total as u64));
            }
            IngestEvent::Discovered { .. } => {}
            IngestEvent::Added { key, bytes } => {
                let green = Style::new().for_stderr().green();
                self.line(format!(
                    "  {} {} ({})",
                    green.apply_to("Added:"),
                    key,
                    format_bytes(bytes)
                ));
                self.advance(key);
            }
            IngestEvent::Failed { path, .. } => {
                self.advance(&path.display().to_string());
            }
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(text),
            _ => eprintln!("{text}"),
        }
    }

    fn advance(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("decoding...");
    pb
}
