use indicatif::ProgressStyle;

const SPINNER_TEMPLATE: &str = "{spinner} {wide_msg}";
const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✔";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn spinner() -> ProgressStyle {
        ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(SPINNER_TICKS)
    }
}
