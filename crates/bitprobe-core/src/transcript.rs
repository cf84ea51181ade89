//! Line-oriented transcript of a conversion or a test run.
//!
//! Every line is also forwarded to the `log` facade, so callers that only
//! want logs can ignore the returned buffer.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a progress line.
    pub fn line(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.lines.push(message);
    }

    /// Append a `Warning:` line for a recoverable condition.
    pub fn warn(&mut self, message: impl fmt::Display) {
        log::warn!("{message}");
        self.lines.push(format!("Warning: {message}"));
    }

    /// Append an `Error:` line for a failure scoped to one item.
    pub fn error(&mut self, message: impl fmt::Display) {
        log::error!("{message}");
        self.lines.push(format!("Error: {message}"));
    }

    pub fn separator(&mut self, ch: char, width: usize) {
        self.lines.push(ch.to_string().repeat(width));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.lines.iter().any(|l| l.starts_with("Warning:"))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn append(&mut self, other: Transcript) {
        self.lines.extend(other.lines);
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_prefixed() {
        let mut t = Transcript::new();
        t.line("Loaded 10 bits");
        assert!(!t.has_warnings());
        t.warn("offset reset");
        assert!(t.has_warnings());
        assert_eq!(t.lines()[1], "Warning: offset reset");
    }

    #[test]
    fn display_preserves_order() {
        let mut t = Transcript::new();
        t.line("a");
        t.error("b");
        t.separator('-', 3);
        assert_eq!(t.to_string(), "a\nError: b\n---\n");
    }
}
