use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Creates the spinner shown while a run is in progress
///
/// Returns a hidden bar when `show` is false so callers can report progress
/// unconditionally.
pub fn create_spinner(message: &str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    setup_progress_style(&pb);
    pb.set_message(message.to_string());
    pb
}

/// Configures a progress bar with the spinner style used across the tool
pub fn setup_progress_style(pb: &ProgressBar) {
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
}
