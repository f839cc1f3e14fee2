//! sheetbind CLI - Command-line interface library
//!
//! This library provides the CLI functionality for sheetbind, including:
//! - Bind: Bind sheet rows to records described by a layout file, print JSON
//! - Headers: Show the header schema of a sheet
//! - Sheets: List the sheets of a workbook
//!
//! # Binary Usage
//!
//! ```bash
//! # Bind rows of the first sheet
//! sheetbind bind people.xlsx --layout person.toml
//!
//! # Keep rows with bad cells, one JSON object per line
//! sheetbind bind people.csv --layout person.toml --tolerant --format ndjson
//!
//! # Show header columns of a sheet
//! sheetbind headers people.xlsx --sheet Staff
//! ```

pub mod app;
pub mod layout;

// Re-export main entry point and types
pub use app::{
    bind_command, bind_sheet, headers_command, load_sheet, render_records, sheet_headers,
    sheets_command,
};
pub use app::{run_cli, OutputFormat};
pub use layout::{Layout, Overrides};
