//! Status display for user feedback
//!
//! Semantic status lines that replace raw println! usage. Every line goes
//! through the owning [`Display`](super::Display) sink so commands can be
//! exercised with captured output.

use super::Display;

/// Status display manager for semantic user feedback
pub struct StatusDisplay<'a> {
    display: &'a Display,
}

impl<'a> StatusDisplay<'a> {
    pub(crate) fn new(display: &'a Display) -> Self {
        Self { display }
    }

    fn detail(item: &str, details: &str) -> String {
        if details.is_empty() {
            item.to_string()
        } else {
            format!("{}: {}", item, details)
        }
    }

    /// Output: `✓ pack.zip: 12 mods`
    pub fn success(&self, item: &str, details: &str) {
        let line = self.display.styling().format_success(&Self::detail(item, details));
        self.display.write_line(&line);
    }

    /// Output: `✗ some.mod: no update resolver`
    pub fn error(&self, item: &str, details: &str) {
        let line = self.display.styling().format_error(&Self::detail(item, details));
        self.display.write_line(&line);
    }

    pub fn warning(&self, message: &str) {
        let line = self.display.styling().format_warning(message);
        self.display.write_line(&line);
    }

    pub fn info(&self, message: &str) {
        let line = self.display.styling().format_info(message);
        self.display.write_line(&line);
    }

    /// Display a simple message without status symbols
    pub fn message(&self, text: &str) {
        self.display.write_line(text);
    }

    pub fn emphasis(&self, text: &str) {
        let line = self.display.styling().style_emphasis(text);
        self.display.write_line(&line);
    }

    pub fn subtle(&self, text: &str) {
        let line = self.display.styling().style_subtle(text);
        self.display.write_line(&line);
    }

    /// Display a list of items with bullets
    pub fn list(&self, items: &[&str]) {
        for item in items {
            let line = format!("  {} {}", self.display.styling().bullet(), item);
            self.display.write_line(&line);
        }
    }

    /// Aligned `key: value` rows
    pub fn properties(&self, rows: &[(&str, &str)]) {
        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        for (key, value) in rows {
            let key = format!("{:width$}", key, width = width);
            let line = format!("{}  {}", self.display.styling().style_subtle(&key), value);
            self.display.write_line(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    include!("status.test.rs");
}
