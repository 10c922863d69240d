//! Terminal progress display for file ingestion

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static FEED_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{bytes}}/{{total_bytes}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks bytes fed into a channel and frames produced
pub struct FeedProgress {
    bar: ProgressBar,
    frames: u64,
}

impl FeedProgress {
    /// Create a bar for `total_bytes` of input read from `path`
    pub fn new(path: &Path, total_bytes: u64) -> Self {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(FEED_STYLE.clone());
        bar.set_prefix(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        Self { bar, frames: 0 }
    }

    /// Create a bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            frames: 0,
        }
    }

    /// Report `bytes` more input consumed
    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    /// Report the number of frames exported so far
    pub fn set_frames(&mut self, frames: u64) {
        if frames != self.frames {
            self.frames = frames;
            self.bar.set_message(format!("{frames} frames"));
        }
    }

    /// Bytes reported so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Frames reported so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Finish and clear the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
