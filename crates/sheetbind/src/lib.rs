//! # sheetbind
//!
//! Bind the rows of a spreadsheet (Excel workbook, CSV file, or any in-memory
//! grid) into a `Vec` of typed records, matching fields to columns by header
//! name.
//!
//! ## Features
//!
//! - **Header schema**: one row supplies the column names
//! - **Tagged fields**: each field names its column under a tag key
//!   (`excel` by default), several keys per field are allowed
//! - **Strict or tolerant**: drop rows with unconvertible cells, or keep
//!   them with zero values
//! - **Sources**: `.xlsx`/`.xls`/`.ods` via `calamine`, CSV via `csv`
//!
//! ## Example
//!
//! ```rust
//! use sheetbind::{unmarshal, BindOptions, Record};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Person {
//!     #[excel("Name")]
//!     name: String,
//!     #[excel("Age")]
//!     age: i32,
//! }
//!
//! let sheet = vec![
//!     vec!["Name", "Age"],
//!     vec!["Alice", "30"],
//!     vec!["Bob", "x"],
//! ];
//!
//! let mut people: Vec<Person> = Vec::new();
//! unmarshal(&mut people, &sheet, &BindOptions::default())?;
//! assert_eq!(people, vec![Person { name: "Alice".into(), age: 30 }]);
//! # Ok::<(), sheetbind::BindError>(())
//! ```

// Lets the derive's `::sheetbind::` paths resolve inside this crate.
extern crate self as sheetbind;

pub mod binder;
pub mod coerce;
pub mod dynamic;
pub mod error;
pub mod options;
pub mod record;
pub mod resolve;
pub mod schema;
pub mod sheet;
pub mod sources;

// Re-exports
pub use binder::{unmarshal, unmarshal_with, BindReport};
pub use coerce::{coerce, Value};
pub use dynamic::{unmarshal_dynamic, DynElement, DynRecord, FieldDesc, RecordDesc, TypeDesc};
pub use error::{BindError, CellError, DataError, DataResult, Result};
pub use options::{BindOptions, DEFAULT_TAG};
pub use record::{Element, ElementForm, Field, FieldKind, Record, Setter};
pub use schema::Schema;
pub use sheet::{Cell, CellValue, Grid, Sheet};
pub use sources::{CsvOptions, CsvSource, DataSource, ExcelSource};

#[cfg(feature = "derive")]
pub use sheetbind_derive::Record;

use std::path::Path;

/// Open a workbook or CSV file by extension
///
/// `.csv`, `.tsv` and `.tab` files are read with [`CsvSource`], everything
/// else with [`ExcelSource`].
pub fn open_source(path: impl AsRef<Path>) -> DataResult<Box<dyn DataSource>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["csv", "tsv", "tab"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

    if is_csv {
        Ok(Box::new(CsvSource::with_options(
            path,
            CsvOptions::for_path(path),
        )?))
    } else {
        Ok(Box::new(ExcelSource::new(path)?))
    }
}
