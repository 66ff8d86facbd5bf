//! Terminal progress bar fed by page counts.
//!
//! The assembler reports `(done, total)` every few pages; [`ProgressBar`]
//! turns those reports into a single redrawn stderr line. Nothing is drawn
//! when stderr is not a terminal.
//!
//! # Examples
//!
//! ```
//! use pdfmix::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(100, ProgressStyle::Bar);
//! progress.set_message("Assembling");
//!
//! for done in (0..=100).step_by(8) {
//!     progress.update(done);
//! }
//!
//! progress.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// `[=====>    ] 50% 5/10`
    Bar,
    /// `5/10`
    Counter,
}

/// Progress bar for page and file counts.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    last_draw: Option<Instant>,
    min_redraw: Duration,
    enabled: bool,
}

impl ProgressBar {
    /// Width of the bar between the brackets.
    const WIDTH: usize = 30;

    /// Create a new progress bar.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            last_draw: None,
            min_redraw: Duration::from_millis(80),
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Create a progress bar that never draws.
    pub fn disabled() -> Self {
        let mut bar = Self::new(0, ProgressStyle::Counter);
        bar.enabled = false;
        bar
    }

    /// Set the label drawn in front of the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Change the total, e.g. once the page count is known.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Move to `current` and redraw if enough time has passed.
    ///
    /// Reaching the total always redraws.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        let due = self
            .last_draw
            .is_none_or(|last| last.elapsed() >= self.min_redraw);
        if due || self.current >= self.total {
            self.draw();
        }
    }

    /// Update from an assembler-style `(done, total)` report.
    pub fn report(&mut self, done: usize, total: usize) {
        self.total = total;
        self.update(done);
    }

    /// Advance by one.
    pub fn increment(&mut self) {
        self.update(self.current + 1);
    }

    /// Draw the final state and end the line.
    pub fn finish(&mut self) {
        self.current = self.total;
        if self.enabled {
            self.draw();
            eprintln!();
        }
    }

    /// Erase the bar.
    pub fn clear(&self) {
        if self.enabled {
            eprint!("\r\x1b[K");
            io::stderr().flush().ok();
        }
    }

    /// Completed fraction as a percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Current value.
    pub fn position(&self) -> usize {
        self.current
    }

    fn draw(&mut self) {
        self.last_draw = Some(Instant::now());
        if !self.enabled {
            return;
        }

        eprint!("\r\x1b[K{}", self.line());
        io::stderr().flush().ok();
    }

    /// Text of the current state, without control characters.
    fn line(&self) -> String {
        let counter = format!("{}/{}", self.current, self.total);
        let elapsed = format_duration(self.start_time.elapsed());

        let body = match self.style {
            ProgressStyle::Bar => {
                let filled = (Self::WIDTH * self.current) / self.total.max(1);
                let filled = filled.min(Self::WIDTH);
                let head = if filled > 0 && filled < Self::WIDTH { ">" } else { "" };
                let bar = "=".repeat(filled.saturating_sub(head.len()));
                format!(
                    "[{bar}{head}{}] {:>3.0}% {counter} {elapsed}",
                    " ".repeat(Self::WIDTH - filled),
                    self.percent()
                )
            }
            ProgressStyle::Counter => format!("{counter} {elapsed}"),
        };

        match &self.message {
            Some(message) => format!("{message} {body}"),
            None => body,
        }
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
