//! Sheet, row and cell abstractions.
//!
//! The binder only needs a sheet as an ordered sequence of rows, each an
//! ordered sequence of cells. A [`Cell`] exposes its raw text plus typed
//! accessors; the default accessors parse the raw text.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CellError;

/// A single spreadsheet cell
pub trait Cell {
    /// Raw text of the cell
    fn text(&self) -> Cow<'_, str>;

    /// Read the cell as a 32-bit integer
    fn int(&self) -> Result<i32, CellError> {
        parse_text(&self.text(), "i32")
    }

    /// Read the cell as a 64-bit integer
    fn int64(&self) -> Result<i64, CellError> {
        parse_text(&self.text(), "i64")
    }

    /// Read the cell as a floating point number
    fn float(&self) -> Result<f64, CellError> {
        parse_text(&self.text(), "f64")
    }

    /// Read the cell as a string (never fails)
    fn string(&self) -> String {
        self.text().into_owned()
    }
}

fn parse_text<T: std::str::FromStr>(text: &str, kind: &'static str) -> Result<T, CellError> {
    text.parse::<T>().map_err(|_| CellError::Parse {
        text: text.to_string(),
        kind,
    })
}

impl Cell for String {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Cell for str {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<C: Cell + ?Sized> Cell for &C {
    fn text(&self) -> Cow<'_, str> {
        (**self).text()
    }

    fn int(&self) -> Result<i32, CellError> {
        (**self).int()
    }

    fn int64(&self) -> Result<i64, CellError> {
        (**self).int64()
    }

    fn float(&self) -> Result<f64, CellError> {
        (**self).float()
    }

    fn string(&self) -> String {
        (**self).string()
    }
}

/// A typed cell value as read from a workbook or CSV file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Text cell
    String(String),
    /// Integer cell
    Int(i64),
    /// Floating point cell
    Float(f64),
    /// Boolean cell
    Bool(bool),
}

impl CellValue {
    /// Whether the cell holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::String(_) => "string",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Bool(_) => "bool",
        }
    }

    /// Integral floats are accepted, anything with a fraction is not
    fn integral(&self, kind: &'static str) -> Result<i64, CellError> {
        match self {
            CellValue::Int(i) => Ok(*i),
            CellValue::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(*f as i64)
                } else {
                    Err(CellError::Parse {
                        text: self.text().into_owned(),
                        kind,
                    })
                }
            }
            CellValue::String(s) => parse_text(s, kind),
            CellValue::Empty => parse_text("", kind),
            CellValue::Bool(_) => Err(CellError::TypeMismatch {
                found: self.type_name(),
                kind,
            }),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl Cell for CellValue {
    fn text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::String(s) => Cow::Borrowed(s.as_str()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => {
                // Format floats nicely (remove unnecessary decimals)
                if f.fract() == 0.0 && f.is_finite() {
                    Cow::Owned(format!("{:.0}", f))
                } else {
                    Cow::Owned(f.to_string())
                }
            }
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    fn int(&self) -> Result<i32, CellError> {
        let value = self.integral("i32")?;
        i32::try_from(value).map_err(|_| CellError::OutOfRange {
            value: value.to_string(),
            kind: "i32",
        })
    }

    fn int64(&self) -> Result<i64, CellError> {
        self.integral("i64")
    }

    fn float(&self) -> Result<f64, CellError> {
        match self {
            CellValue::Int(i) => Ok(*i as f64),
            CellValue::Float(f) => Ok(*f),
            CellValue::String(s) => parse_text(s, "f64"),
            CellValue::Empty => parse_text("", "f64"),
            CellValue::Bool(_) => Err(CellError::TypeMismatch {
                found: self.type_name(),
                kind: "f64",
            }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s)
        }
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// An ordered sequence of rows
pub trait Sheet {
    /// Cell type stored in the rows
    type Cell: Cell;

    /// Number of rows
    fn row_count(&self) -> usize;

    /// Cells of the row at `index`, `None` past the last row
    fn row(&self, index: usize) -> Option<&[Self::Cell]>;
}

impl<C: Cell> Sheet for Vec<Vec<C>> {
    type Cell = C;

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<&[C]> {
        self.get(index).map(Vec::as_slice)
    }
}

impl<C: Cell> Sheet for [Vec<C>] {
    type Cell = C;

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<&[C]> {
        self.get(index).map(Vec::as_slice)
    }
}

/// An in-memory named sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid<C = CellValue> {
    name: String,
    rows: Vec<Vec<C>>,
}

impl<C> Grid<C> {
    /// Create a grid from its name and rows
    pub fn new(name: impl Into<String>, rows: Vec<Vec<C>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<C>] {
        &self.rows
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<C>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Vec<C>> {
        self.rows
    }
}

impl<C: Cell> Sheet for Grid<C> {
    type Cell = C;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&[C]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_cell_accessors() {
        let cell = "42".to_string();
        assert_eq!(cell.int().unwrap(), 42);
        assert_eq!(cell.int64().unwrap(), 42);
        assert_eq!(cell.float().unwrap(), 42.0);
        assert_eq!(cell.string(), "42");
    }

    #[test]
    fn test_string_cell_parse_failure() {
        let cell = "x";
        assert!(matches!(cell.int(), Err(CellError::Parse { kind: "i32", .. })));
        assert!(cell.int64().is_err());
        assert!(cell.float().is_err());
        assert_eq!(cell.string(), "x");
    }

    #[test]
    fn test_empty_text_is_not_a_number() {
        assert!("".int().is_err());
        assert!(CellValue::Empty.int().is_err());
        assert!(CellValue::Empty.float().is_err());
        assert_eq!(CellValue::Empty.string(), "");
    }

    #[test]
    fn test_cell_value_text() {
        assert_eq!(CellValue::Empty.text(), "");
        assert_eq!(CellValue::from("hello").text(), "hello");
        assert_eq!(CellValue::Int(42).text(), "42");
        assert_eq!(CellValue::Float(2.5).text(), "2.5");
        assert_eq!(CellValue::Float(10.0).text(), "10");
        assert_eq!(CellValue::Bool(true).text(), "true");
    }

    #[test]
    fn test_cell_value_integral_float() {
        assert_eq!(CellValue::Float(30.0).int().unwrap(), 30);
        assert_eq!(CellValue::Float(30.0).int64().unwrap(), 30);
        assert!(CellValue::Float(30.5).int().is_err());
        assert_eq!(CellValue::Float(30.5).float().unwrap(), 30.5);
    }

    #[test]
    fn test_cell_value_int_range() {
        let big = CellValue::Int(i64::from(i32::MAX) + 1);
        assert!(matches!(big.int(), Err(CellError::OutOfRange { .. })));
        assert_eq!(big.int64().unwrap(), i64::from(i32::MAX) + 1);
    }

    #[test]
    fn test_cell_value_bool_is_not_numeric() {
        let cell = CellValue::Bool(false);
        assert!(matches!(cell.int(), Err(CellError::TypeMismatch { .. })));
        assert!(cell.float().is_err());
        assert_eq!(cell.string(), "false");
    }

    #[test]
    fn test_grid_rows() {
        let mut grid = Grid::new("People", vec![vec!["Name".to_string()]]);
        grid.push_row(vec!["Alice".to_string()]);

        assert_eq!(grid.name(), "People");
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.row(1).unwrap()[0], "Alice");
        assert!(grid.row(2).is_none());
    }
}
