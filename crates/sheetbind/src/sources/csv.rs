//! CSV data source.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{DataError, DataResult};
use crate::sheet::{CellValue, Grid};
use crate::sources::DataSource;

/// Name of the single sheet a CSV file provides
pub const CSV_SHEET: &str = "data";

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether to trim whitespace from fields (default: off).
    ///
    /// When on, string fields receive the trimmed text and a whitespace-only
    /// header cell counts as blank.
    pub trim: bool,
    /// Whether to allow records with differing field counts.
    ///
    /// On by default: a short record marks the end of the data for binding.
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: false,
            flexible: true,
        }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Create options for semicolon-separated values (common in European locales)
    pub fn semicolon() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }

    /// Pick options from a file extension (`tsv`/`tab` → TSV, otherwise comma)
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => {
                Self::tsv()
            }
            _ => Self::default(),
        }
    }
}

/// CSV file data source
pub struct CsvSource {
    /// Path to the CSV file
    path: PathBuf,
    /// Parsing options
    options: CsvOptions,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(path: impl AsRef<Path>) -> DataResult<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Create a new CSV source with custom options
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> DataResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        Ok(Self { path, options })
    }

    /// Read all records from the CSV file
    pub fn read_all(&self) -> DataResult<Vec<Vec<CellValue>>> {
        let file = File::open(&self.path)?;
        read_records(BufReader::new(file), &self.options)
    }
}

/// Parse CSV records from any reader
pub fn read_records<R: Read>(reader: R, options: &CsvOptions) -> DataResult<Vec<Vec<CellValue>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false) // the binder picks the header row itself
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .flexible(options.flexible)
        .from_reader(reader);

    let mut result = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        result.push(record.iter().map(CellValue::from).collect());
    }
    Ok(result)
}

impl DataSource for CsvSource {
    fn load_sheet(&self, _sheet: &str) -> DataResult<Grid<CellValue>> {
        // CSV doesn't have sheets, ignore the sheet parameter
        Ok(Grid::new(CSV_SHEET, self.read_all()?))
    }

    fn list_sheets(&self) -> DataResult<Vec<String>> {
        Ok(vec![CSV_SHEET.to_string()])
    }

    fn default_sheet(&self) -> Option<String> {
        Some(CSV_SHEET.to_string())
    }
}
