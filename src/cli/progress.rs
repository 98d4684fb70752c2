//! Terminal progress display for downloads and long scans
//!
//! Wraps indicatif. When the server advertises a length, a byte bar with
//! percentage is shown; otherwise a spinner counts bytes. Everything is
//! hidden when stderr is not a terminal or quiet mode is on.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::app::{DownloadProgress, UpdateEvent};
use crate::constants::display;

/// Progress display for one update run
pub struct TransferProgress {
    bar: ProgressBar,
    sized: bool,
    enabled: bool,
}

impl TransferProgress {
    /// Create a display; `enabled = false` draws nothing
    pub fn new(enabled: bool) -> Self {
        let enabled = enabled && atty::is(atty::Stream::Stderr);
        let bar = ProgressBar::new_spinner();
        if !enabled {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self {
            bar,
            sized: false,
            enabled,
        }
    }

    /// Feed one update event
    pub fn observe(&mut self, event: UpdateEvent) {
        match event {
            UpdateEvent::Download(progress) => self.on_download(progress),
            UpdateEvent::Reformatting { formatter } => {
                self.bar.set_style(spinner_style());
                self.bar
                    .set_message(format!("Formatting bundle with {}...", formatter));
                self.bar
                    .enable_steady_tick(Duration::from_millis(display::SPINNER_INTERVAL_MS));
            }
        }
    }

    fn on_download(&mut self, progress: DownloadProgress) {
        match progress.total {
            Some(total) => {
                if !self.sized {
                    self.bar.set_length(total);
                    self.bar.set_style(bar_style());
                    self.sized = true;
                }
                self.bar.set_position(progress.downloaded);
            }
            None => {
                if !self.sized {
                    self.bar.set_style(spinner_style());
                    self.sized = true;
                }
                self.bar.set_message(format!("Downloading... {}", progress.status()));
                self.bar.tick();
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Remove the display from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Steady spinner for work without a measurable size
pub fn spinner(message: impl Into<String>, enabled: bool) -> ProgressBar {
    if !enabled || !atty::is(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(display::SPINNER_INTERVAL_MS));
    spinner
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&display::SPINNER_TICKS)
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%) {bytes_per_sec}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_display_accepts_events() {
        let mut progress = TransferProgress::new(false);
        assert!(!progress.is_enabled());

        progress.observe(UpdateEvent::Download(DownloadProgress::new(0, Some(100))));
        progress.observe(UpdateEvent::Download(DownloadProgress::new(100, Some(100))));
        progress.observe(UpdateEvent::Reformatting {
            formatter: "inline".to_string(),
        });
        progress.finish();
    }

    #[test]
    fn test_unsized_download_uses_spinner() {
        let mut progress = TransferProgress::new(false);
        progress.observe(UpdateEvent::Download(DownloadProgress::new(10, None)));
        assert!(progress.sized);
        assert_eq!(progress.bar.length(), None);
        progress.finish();
    }

    #[test]
    fn test_sized_download_sets_length() {
        let mut progress = TransferProgress::new(false);
        progress.observe(UpdateEvent::Download(DownloadProgress::new(40, Some(80))));
        assert_eq!(progress.bar.length(), Some(80));
        assert_eq!(progress.bar.position(), 40);
    }

    #[test]
    fn test_hidden_spinner() {
        let spinner = spinner("Analyzing machines...", false);
        assert!(spinner.is_hidden());
        spinner.finish_and_clear();
    }
}
