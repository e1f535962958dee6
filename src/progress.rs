//! Progress indicators for long-running provider calls.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for an operation with no known length.
///
/// The caller is responsible for `finish_and_clear()` once the
/// operation completes (or failing that, drop clears it).
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
