//! Progress bars for table loading, backed by indicatif
//!
//! A hidden bar still counts, so loaders tick it whether or not progress is
//! drawn.

use indicatif::{ProgressBar, ProgressStyle};

const TABLES_TEMPLATE: &str = "{spinner:.magenta} [{elapsed_precise}] [{bar:30.magenta/white}] {pos}/{len} tables {msg}";

/// Bar counting loaded tables
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>, visible: bool) -> ProgressBar {
    let pb = if visible {
        ProgressBar::new(length)
    } else {
        ProgressBar::hidden()
    };
    pb.set_length(length);

    // Template is a constant; fall back to the plain bar if indicatif rejects it
    let style = ProgressStyle::with_template(TABLES_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("=> "));
    pb.set_style(style);

    if let Some(description) = description {
        pb.set_message(description.to_owned());
    }
    pb
}

pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    match message {
        Some(message) => pb.finish_with_message(message.to_owned()),
        None => pb.finish_and_clear(),
    }
}
