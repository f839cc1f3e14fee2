//! Row binding: walk the data rows and fill records.

use serde::Serialize;
use tracing::{debug, warn};

use crate::coerce::{coerce, Value};
use crate::error::{BindError, Result};
use crate::options::BindOptions;
use crate::record::{Element, Setter};
use crate::resolve::{resolve, FieldBinding};
use crate::schema::Schema;
use crate::sheet::{Cell, Sheet};

/// Summary of a bind call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindReport {
    /// Records appended to the target
    pub appended: usize,
    /// Rows dropped because a cell failed conversion (strict mode)
    pub dropped: usize,
    /// Cells replaced by a zero value (tolerant mode)
    pub substituted: usize,
    /// Index of the row shorter than the header that ended binding
    pub terminated_at: Option<usize>,
}

/// Bind the rows of `sheet` into `target`.
///
/// The header row (`options.header_row`) supplies the column names. Every
/// other row becomes one element appended to `target`, in sheet order, until
/// a row has fewer cells than the header row. In strict mode a row with an
/// unconvertible cell is dropped; in tolerant mode the cell's field gets its
/// zero value and the row is kept. Conversion problems are logged, never
/// returned.
///
/// Setup failures return an error before `target` is touched.
pub fn unmarshal<E, S>(target: &mut Vec<E>, sheet: &S, options: &BindOptions) -> Result<BindReport>
where
    E: Element,
    S: Sheet + ?Sized,
{
    let schema = header_schema(sheet, options)?;
    let binding = resolve::<E::Record>(&schema, options)?;
    debug!(form = ?E::FORM, "binding rows into typed target");

    let report = bind_rows(
        sheet,
        &schema,
        &binding,
        options,
        <E::Record as Default>::default,
        |record, setter: &Setter<E::Record>, value| setter.assign(record, value),
        |record| target.push(E::from_record(record)),
    );
    Ok(report)
}

/// Positional form of [`unmarshal`]; an empty `tag` means `"excel"`.
pub fn unmarshal_with<E, S>(
    target: &mut Vec<E>,
    sheet: &S,
    header_row: usize,
    tolerant: bool,
    tag: &str,
) -> Result<BindReport>
where
    E: Element,
    S: Sheet + ?Sized,
{
    let options = BindOptions::default()
        .with_header_row(header_row)
        .with_tolerant(tolerant)
        .with_tag(tag);
    unmarshal(target, sheet, &options)
}

/// Build the schema from the configured header row
pub(crate) fn header_schema<S: Sheet + ?Sized>(sheet: &S, options: &BindOptions) -> Result<Schema> {
    let header = sheet
        .row(options.header_row)
        .ok_or(BindError::HeaderRowOutOfBounds {
            index: options.header_row,
            rows: sheet.row_count(),
        })?;
    let schema = Schema::from_header(header);
    debug!(
        header_row = options.header_row,
        columns = schema.len(),
        width = schema.width(),
        "built header schema"
    );
    Ok(schema)
}

/// The row loop shared by typed and runtime-described targets
pub(crate) fn bind_rows<S, T, X>(
    sheet: &S,
    schema: &Schema,
    binding: &FieldBinding<'_, X>,
    options: &BindOptions,
    mut new_record: impl FnMut() -> T,
    mut assign: impl FnMut(&mut T, &X, Value),
    mut emit: impl FnMut(T),
) -> BindReport
where
    S: Sheet + ?Sized,
{
    let mut report = BindReport::default();

    'rows: for index in 0..sheet.row_count() {
        let Some(row) = sheet.row(index) else {
            break;
        };
        if row.len() < schema.width() {
            debug!(row = index, cells = row.len(), "short row, end of data");
            report.terminated_at = Some(index);
            break;
        }
        if index == options.header_row {
            continue;
        }

        let mut record = new_record();
        for bound in binding.iter() {
            let cell = &row[bound.column];
            match coerce(bound.kind, cell) {
                Ok(value) => assign(&mut record, &bound.slot, value),
                Err(err) => {
                    warn!(
                        row = index,
                        column = bound.column,
                        field = bound.field,
                        kind = %bound.kind,
                        value = %cell.text(),
                        tolerant = options.tolerant,
                        "bad value: {}",
                        err
                    );
                    if !options.tolerant {
                        report.dropped += 1;
                        continue 'rows;
                    }
                    report.substituted += 1;
                    assign(&mut record, &bound.slot, Value::zero(bound.kind));
                }
            }
        }

        emit(record);
        report.appended += 1;
    }

    report
}
