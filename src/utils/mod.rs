mod multi_progress;
mod progress_style;

pub use multi_progress::{FileProgress, MultiProgressNew};
pub use progress_style::ProgressStyleTemplate;
