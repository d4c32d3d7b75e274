use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(100);

pub trait MultiProgressNew {
    fn add_spinner(&self) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_spinner(&self) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyleTemplate::spinner());
        pb.enable_steady_tick(SPINNER_TICK);
        pb
    }
}

/// Spinner that reports one fixture file being read.
pub trait FileProgress {
    fn reading(&self, path: &str);
    fn loaded(&self, path: &str, count: usize);
    fn failed(&self, path: &str);
}

impl FileProgress for ProgressBar {
    fn reading(&self, path: &str) {
        self.set_message(format!("Read file `{}` ...", path));
    }

    fn loaded(&self, path: &str, count: usize) {
        self.finish_with_message(format!("✅ Loaded `{}` ({} entries)", path, count));
    }

    fn failed(&self, path: &str) {
        self.abandon_with_message(format!("❌ Failed to load `{}`", path));
    }
}
