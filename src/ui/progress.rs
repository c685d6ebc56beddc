use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use crate::ui::icons::CLOCK;

/// Spinner shown while a gate call is in flight.
///
/// Hidden when stdout is not a terminal so piped output stays clean.
pub struct CallSpinner {
    bar: ProgressBar,
    started: Instant,
}

impl CallSpinner {
    pub fn start(scenario_id: &str, binding: Option<&str>) -> Self {
        let bar = if console::Term::stdout().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let spinner_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("  Gate");

        let detail = match binding {
            Some(b) => format!("{} with binding {}", scenario_id, style(b).cyan()),
            None => scenario_id.to_string(),
        };
        bar.set_message(format!("judging {}", detail));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            started: Instant::now(),
        }
    }

    /// Stop the spinner and, when verbose, print the round-trip time.
    pub fn finish(self, verbose: bool) {
        self.bar.finish_and_clear();
        if verbose {
            let elapsed = self.started.elapsed();
            println!(
                "  {}{}",
                CLOCK,
                style(format!("gate replied in {} ms", elapsed.as_millis())).dim()
            );
        }
    }
}
