//! Progress reporting for analysis runs
//!
//! Progress bars and spinners for long-running analyses using the
//! `indicatif` crate. Output goes to stderr so it never mixes with a report
//! written to stdout.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for document analysis
pub struct AnalyzeProgress {
    bar: ProgressBar,
}

impl AnalyzeProgress {
    /// Create a new progress reporter
    ///
    /// # Arguments
    /// * `total_records` - Expected number of records (`None` for unknown)
    pub fn new(total_records: Option<u64>) -> Self {
        let bar = match total_records {
            Some(total) if total > 0 => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} records ({eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░  "),
                );
                bar
            }
            _ => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress
    pub fn update(&self, processed: u64) {
        match self.bar.length() {
            Some(total) if total > 0 => {
                // Estimates can fall short of the real count.
                if processed > total {
                    self.bar.set_length(processed);
                }
                self.bar.set_position(processed);
            }
            _ => self
                .bar
                .set_message(format!("Analyzed {} records", format_number(processed))),
        }
    }

    /// Finish with success message
    pub fn finish_success(&self, msg: &str) {
        self.bar.finish_with_message(format!("✓ {}", msg));
    }

    /// Finish with error message
    pub fn finish_error(&self, msg: &str) {
        self.bar.abandon_with_message(format!("✗ {}", msg));
    }
}

/// Format a record count with comma thousand separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    out.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        out.push(',');
        out.extend(group.iter().map(|&b| char::from(b)));
    }
    out
}
