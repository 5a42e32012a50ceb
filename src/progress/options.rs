use crate::Result;
use ohno::app_err;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LABEL_TEMPLATE: &str = "{k} out of {n} complete";
pub const DEFAULT_FILL_CHARACTER: char = '-';
pub const DEFAULT_BAR_WIDTH: usize = 50;
pub const DEFAULT_SCROLLBACK: usize = 5;

/// Placeholder replaced by the current step in a label template.
pub const STEP_PLACEHOLDER: &str = "{k}";

/// Placeholder replaced by the total step count in a label template.
pub const TOTAL_PLACEHOLDER: &str = "{n}";

/// Narrowest bar that still fits its brackets and a `100%` overlay.
pub const MIN_BAR_WIDTH: usize = 7;

/// Presentation settings for a [`ProgressBar`](super::ProgressBar).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProgressOptions {
    /// Label shown after the bar, with `{k}` and `{n}` placeholders
    pub label_template: String,

    /// Status shown in parentheses after the label when non-empty
    pub status: String,

    /// Character used for completed segments
    pub fill_character: char,

    /// Total width of the bracketed bar
    pub bar_width: usize,

    /// Number of recent log messages redrawn under the bar in notebook mode
    pub scrollback: usize,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
            status: String::new(),
            fill_character: DEFAULT_FILL_CHARACTER,
            bar_width: DEFAULT_BAR_WIDTH,
            scrollback: DEFAULT_SCROLLBACK,
        }
    }
}

impl ProgressOptions {
    #[must_use]
    pub fn label_template(mut self, template: impl Into<String>) -> Self {
        self.label_template = template.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub const fn fill_character(mut self, fill: char) -> Self {
        self.fill_character = fill;
        self
    }

    #[must_use]
    pub const fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    #[must_use]
    pub const fn scrollback(mut self, lines: usize) -> Self {
        self.scrollback = lines;
        self
    }

    /// Check that the options can produce a well-formed bar.
    ///
    /// A template lacking placeholders is allowed but logged, since the label
    /// then never changes.
    pub fn validate(&self) -> Result<()> {
        if self.bar_width < MIN_BAR_WIDTH {
            return Err(app_err!("bar_width must be at least {MIN_BAR_WIDTH}, got {}", self.bar_width));
        }

        if self.fill_character.is_control() {
            return Err(app_err!("fill_character must be printable, got {:?}", self.fill_character));
        }

        if !self.label_template.contains(STEP_PLACEHOLDER) || !self.label_template.contains(TOTAL_PLACEHOLDER) {
            log::warn!(
                "label template '{}' is missing {STEP_PLACEHOLDER} or {TOTAL_PLACEHOLDER}",
                self.label_template
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProgressOptions::default();
        assert_eq!(options.label_template, "{k} out of {n} complete");
        assert_eq!(options.status, "");
        assert_eq!(options.fill_character, '-');
        assert_eq!(options.bar_width, 50);
        assert_eq!(options.scrollback, 5);
        options.validate().unwrap();
    }

    #[test]
    fn test_narrow_bar_rejected() {
        let err = ProgressOptions::default().bar_width(6).validate().unwrap_err();
        assert!(err.to_string().contains("bar_width"), "{err}");
        ProgressOptions::default().bar_width(7).validate().unwrap();
    }

    #[test]
    fn test_control_fill_rejected() {
        assert!(ProgressOptions::default().fill_character('\n').validate().is_err());
    }

    #[test]
    fn test_template_without_placeholders_is_allowed() {
        ProgressOptions::default().label_template("working").validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: ProgressOptions = toml::from_str("bar_width = 30\nfill_character = '#'").unwrap();
        assert_eq!(options.bar_width, 30);
        assert_eq!(options.fill_character, '#');
        assert_eq!(options.label_template, DEFAULT_LABEL_TEMPLATE);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<ProgressOptions>("colour = 'red'").is_err());
    }
}
