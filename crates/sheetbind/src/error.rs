//! Error types for binding and data sources.

use thiserror::Error;

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, BindError>;

/// Setup failures that abort a bind call before any row is processed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The target is not behind a pointer/reference
    #[error("supports only unmarshaling to pointer")]
    NotPointer,

    /// The pointed-to target is not a sequence
    #[error("supports only unmarshaling to slice")]
    NotSequence,

    /// The sequence element is not a record
    #[error("supports only unmarshaling to slice that element is struct")]
    NotStruct,

    /// A field bound to a header column has a type the coercer cannot produce
    #[error("field `{field}` has unsupported type `{type_name}`")]
    UnsupportedField { field: String, type_name: String },

    /// The header row index is past the last row of the sheet
    #[error("header row {index} out of bounds (sheet has {rows} rows)")]
    HeaderRowOutOfBounds { index: usize, rows: usize },

    /// Invalid shape expression in a runtime layout
    #[error("Invalid type expression: {0}")]
    InvalidTypeExpr(String),
}

/// A cell value could not be converted to the requested type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CellError {
    /// Text did not parse as a number of the requested kind
    #[error("cannot parse {text:?} as {kind}")]
    Parse { text: String, kind: &'static str },

    /// Numeric value does not fit the requested integer type
    #[error("{value} is out of range for {kind}")]
    OutOfRange { value: String, kind: &'static str },

    /// The cell holds a value of a different type (e.g. a boolean)
    #[error("{found} cell cannot be read as {kind}")]
    TypeMismatch {
        found: &'static str,
        kind: &'static str,
    },
}

/// Result type for data source operations
pub type DataResult<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data source operations
#[derive(Debug, Error)]
pub enum DataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Failed to open workbook
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    /// Sheet not found in workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Malformed CSV record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Calamine error
    #[error("Excel error: {0}")]
    Calamine(String),
}

impl From<calamine::Error> for DataError {
    fn from(err: calamine::Error) -> Self {
        DataError::Calamine(err.to_string())
    }
}
