//! Per-call binding configuration.

use serde::{Deserialize, Serialize};

/// Tag key consulted when no other is configured
pub const DEFAULT_TAG: &str = "excel";

/// Options for a bind call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    /// Tag key read from each field (empty means [`DEFAULT_TAG`])
    pub tag: String,

    /// Substitute zero values for unconvertible cells instead of dropping the row
    pub tolerant: bool,

    /// Zero-based index of the header row
    pub header_row: usize,

    /// Skip fields of unsupported types instead of failing resolution
    pub allow_unsupported: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            tolerant: false,
            header_row: 0,
            allow_unsupported: false,
        }
    }
}

impl BindOptions {
    /// Create options in tolerant mode (most lenient common case)
    pub fn tolerant() -> Self {
        Self {
            tolerant: true,
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    pub fn allowing_unsupported(mut self) -> Self {
        self.allow_unsupported = true;
        self
    }

    /// Effective tag key
    pub fn tag_name(&self) -> &str {
        if self.tag.is_empty() {
            DEFAULT_TAG
        } else {
            &self.tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BindOptions::default();
        assert_eq!(options.tag_name(), "excel");
        assert!(!options.tolerant);
        assert_eq!(options.header_row, 0);
        assert!(!options.allow_unsupported);
    }

    #[test]
    fn test_empty_tag_falls_back() {
        let options = BindOptions::default().with_tag("");
        assert_eq!(options.tag_name(), DEFAULT_TAG);
    }

    #[test]
    fn test_builders() {
        let options = BindOptions::tolerant().with_tag("csv").with_header_row(2);
        assert!(options.tolerant);
        assert_eq!(options.tag_name(), "csv");
        assert_eq!(options.header_row, 2);
    }
}
