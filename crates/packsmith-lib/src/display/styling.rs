//! Semantic styling on top of `console`
//!
//! Colour is decided once from the resolved [`ColorMode`]; every helper then
//! returns plain `String`s so output sinks never deal with ANSI state.

use crate::primitives::ColorMode;
use console::Style;

const CHECKMARK: &str = "✓";
const CROSS: &str = "✗";
const WARNING: &str = "!";
const INFO: &str = "·";
const BULLET: &str = "•";

/// Style manager shared by every display surface
#[derive(Debug, Clone)]
pub struct StyleManager {
    ansi: bool,
}

impl StyleManager {
    pub fn new(color: ColorMode) -> Self {
        Self {
            ansi: color.use_ansi(),
        }
    }

    /// Plain styling, used for captured output
    pub fn plain() -> Self {
        Self { ansi: false }
    }

    pub fn ansi(&self) -> bool {
        self.ansi
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.force_styling(self.ansi).apply_to(text).to_string()
    }

    pub fn style_success(&self, text: &str) -> String {
        self.paint(Style::new().green(), text)
    }

    pub fn style_error(&self, text: &str) -> String {
        self.paint(Style::new().red(), text)
    }

    pub fn style_warning(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }

    pub fn style_info(&self, text: &str) -> String {
        self.paint(Style::new().cyan(), text)
    }

    pub fn style_emphasis(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub fn style_subtle(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_success(CHECKMARK), message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_error(CROSS), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_warning(WARNING), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_info(INFO), message)
    }

    pub fn bullet(&self) -> &'static str {
        BULLET
    }
}
