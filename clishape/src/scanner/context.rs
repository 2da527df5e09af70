//! Per-scan context shared between rules.

use indexmap::IndexMap;

/// Ephemeral state of one scan.
///
/// Holds named modes that let a rule's interpretation of a line depend on the
/// lines before it: which statistics section is open, whether the Rcvd or
/// Sent block of that section is active, which peer a multi-line record
/// belongs to. A fresh context is created for every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    modes: IndexMap<String, String>,
    line_number: usize,
}

impl ScanContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a mode already set.
    pub fn with_mode(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a mode, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.modes.insert(name.into(), value.into());
    }

    /// Clear a mode.
    pub fn clear(&mut self, name: &str) {
        self.modes.shift_remove(name);
    }

    /// Get the value of a mode.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.modes.get(name).map(String::as_str)
    }

    /// Check if a mode is set.
    pub fn is_set(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Check if a mode is set to a specific value.
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    /// 1-based number of the line being scanned (0 before the first line).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub(crate) fn advance_line(&mut self) {
        self.line_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes() {
        let mut ctx = ScanContext::new().with_mode("section", "icmp");
        assert!(ctx.is("section", "icmp"));
        assert!(!ctx.is("section", "udp"));
        assert!(!ctx.is_set("direction"));

        ctx.set("direction", "rcvd");
        assert_eq!(ctx.get("direction"), Some("rcvd"));

        ctx.set("direction", "sent");
        assert_eq!(ctx.get("direction"), Some("sent"));

        ctx.clear("direction");
        assert_eq!(ctx.get("direction"), None);
        assert!(ctx.is_set("section"));
    }

    #[test]
    fn test_line_number() {
        let mut ctx = ScanContext::new();
        assert_eq!(ctx.line_number(), 0);
        ctx.advance_line();
        ctx.advance_line();
        assert_eq!(ctx.line_number(), 2);
    }
}
