//! Excel workbook data source using calamine.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::sheet::{CellValue, Grid};
use crate::sources::DataSource;

/// Excel workbook data source (xlsx, xlsm, xlsb, xls, ods)
pub struct ExcelSource {
    /// Path to the workbook
    path: PathBuf,
    /// Sheet names cache
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Create a new Excel source from a file path
    pub fn new(path: impl AsRef<Path>) -> DataResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        let workbook = open_workbook_auto(&path)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;
        let sheet_names = workbook.sheet_names();

        Ok(Self { path, sheet_names })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert a calamine cell to a cell value
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::String(format!("#ERROR: {:?}", e)),
            Data::DateTime(dt) => CellValue::String(format!("{}", dt)),
            Data::DateTimeIso(s) => CellValue::String(s.clone()),
            Data::DurationIso(s) => CellValue::String(s.clone()),
        }
    }

    /// Materialize a sheet range as rows anchored at A1.
    ///
    /// calamine ranges start at the first used cell; rows and columns before
    /// it are filled with empty cells so indices match the sheet. Every row
    /// spans the used width, except fully blank rows, which have no cells so
    /// they end the data.
    fn range_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
        let Some((end_row, end_col)) = range.end() else {
            return Vec::new();
        };

        let mut rows = Vec::with_capacity(end_row as usize + 1);
        for row_idx in 0..=end_row {
            let mut row: Vec<CellValue> = (0..=end_col)
                .map(|col_idx| {
                    range
                        .get_value((row_idx, col_idx))
                        .map(Self::convert_cell)
                        .unwrap_or_default()
                })
                .collect();
            if row.iter().all(CellValue::is_empty) {
                row.clear();
            }
            rows.push(row);
        }
        rows
    }
}

impl DataSource for ExcelSource {
    fn load_sheet(&self, sheet: &str) -> DataResult<Grid<CellValue>> {
        // Re-open workbook for reading (calamine requires this pattern)
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", self.path.display(), e)))?;

        if !self.sheet_names.iter().any(|name| name == sheet) {
            return Err(DataError::SheetNotFound(sheet.to_string()));
        }

        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| DataError::SheetNotFound(format!("{}: {}", sheet, e)))?;

        let rows = Self::range_rows(&range);
        debug!(sheet, rows = rows.len(), "loaded worksheet");
        Ok(Grid::new(sheet, rows))
    }

    fn list_sheets(&self) -> DataResult<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheet_names.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell() {
        assert_eq!(ExcelSource::convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            ExcelSource::convert_cell(&Data::String("hello".to_string())),
            CellValue::String("hello".to_string())
        );
        assert_eq!(
            ExcelSource::convert_cell(&Data::String(String::new())),
            CellValue::Empty
        );
        assert_eq!(ExcelSource::convert_cell(&Data::Int(42)), CellValue::Int(42));
        assert_eq!(
            ExcelSource::convert_cell(&Data::Float(2.5)),
            CellValue::Float(2.5)
        );
        assert_eq!(
            ExcelSource::convert_cell(&Data::Bool(true)),
            CellValue::Bool(true)
        );
    }

    #[test]
    fn test_range_rows_anchored_at_a1() {
        // used range B2:C3
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Name".to_string()));
        range.set_value((1, 2), Data::String("Age".to_string()));
        range.set_value((2, 1), Data::String("Alice".to_string()));

        let rows = ExcelSource::range_rows(&range);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(
            rows[1],
            vec![
                CellValue::Empty,
                CellValue::from("Name"),
                CellValue::from("Age")
            ]
        );
        // trailing blank kept so the row is as wide as the header
        assert_eq!(
            rows[2],
            vec![CellValue::Empty, CellValue::from("Alice"), CellValue::Empty]
        );
    }

    #[test]
    fn test_range_rows_blank_row_has_no_cells() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("Name".to_string()));
        range.set_value((0, 1), Data::String("Note".to_string()));
        range.set_value((2, 0), Data::String("Bob".to_string()));

        let rows = ExcelSource::range_rows(&range);

        assert_eq!(rows[0].len(), 2);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], vec![CellValue::from("Bob"), CellValue::Empty]);
    }

    #[test]
    fn test_range_rows_empty() {
        let range: Range<Data> = Range::empty();
        assert!(ExcelSource::range_rows(&range).is_empty());
    }

    #[test]
    fn test_excel_source_file_not_found() {
        let result = ExcelSource::new("/nonexistent/path/file.xlsx");
        assert!(matches!(result, Err(DataError::FileNotFound(_))));
    }
}
