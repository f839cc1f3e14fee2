//! Data source implementations.
//!
//! This module contains adapters that load sheets from Excel workbooks and
//! CSV files into in-memory [`Grid`]s of [`CellValue`]s.

pub mod csv;
pub mod excel;

pub use self::csv::{CsvOptions, CsvSource};
pub use self::excel::ExcelSource;

use crate::error::DataResult;
use crate::sheet::{CellValue, Grid};

/// Trait for data sources that can provide sheets
pub trait DataSource {
    /// Load a whole sheet
    ///
    /// # Arguments
    /// * `sheet` - Sheet name (ignored by single-sheet sources like CSV)
    ///
    /// # Returns
    /// The sheet's rows, with column indices matching the source columns
    fn load_sheet(&self, sheet: &str) -> DataResult<Grid<CellValue>>;

    /// List available sheets/tables in the source
    fn list_sheets(&self) -> DataResult<Vec<String>>;

    /// Get the default sheet name
    fn default_sheet(&self) -> Option<String>;
}
