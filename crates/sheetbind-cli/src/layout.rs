//! Layout files
//!
//! A layout describes the record rows are bound into, the target shape and
//! the bind options:
//!
//! ```toml
//! target = "&mut Vec<Person>"
//!
//! [bind]
//! tag = "excel"
//! header_row = 0
//! tolerant = false
//!
//! [record]
//! name = "Person"
//!
//! [[record.fields]]
//! name = "name"
//! type = "String"
//! tags = { excel = "Name", csv = "name" }
//!
//! [[record.fields]]
//! name = "age"
//! type = "i32"
//! tags = { excel = "Age" }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sheetbind::{BindOptions, RecordDesc, TypeDesc};

/// Default target shape: a vector of record values
pub const DEFAULT_TARGET: &str = "&mut Vec<Record>";

/// Top-level layout structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Target shape expression
    #[serde(default = "default_target")]
    pub target: String,
    /// Bind options
    #[serde(default)]
    pub bind: BindOptions,
    /// Record description
    pub record: RecordDesc,
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl Layout {
    /// Parse a layout from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load a layout file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse layout: {}", path.display()))
    }

    /// Parsed target shape
    pub fn shape(&self) -> Result<TypeDesc> {
        TypeDesc::parse(&self.target, &self.record)
            .with_context(|| format!("Invalid target in layout: {}", self.target))
    }
}

/// Command-line overrides for layout bind options
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub header_row: Option<usize>,
    pub tolerant: bool,
    pub tag: Option<String>,
}

impl Overrides {
    /// Apply the overrides on top of the layout's options
    pub fn apply(&self, mut options: BindOptions) -> BindOptions {
        if let Some(header_row) = self.header_row {
            options.header_row = header_row;
        }
        if self.tolerant {
            options.tolerant = true;
        }
        if let Some(tag) = &self.tag {
            options.tag = tag.clone();
        }
        options
    }
}
