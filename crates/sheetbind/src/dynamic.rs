//! Runtime-described targets.
//!
//! Layout files describe a record and the shape of the collection it is
//! bound into as a Rust type expression, e.g. `&mut Vec<Box<Record>>`. The
//! shape is checked here, so the target errors that the compiler catches for
//! typed targets surface as [`BindError::NotPointer`],
//! [`BindError::NotSequence`] and [`BindError::NotStruct`].

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::binder::{bind_rows, header_schema, BindReport};
use crate::coerce::Value;
use crate::error::{BindError, Result};
use crate::options::BindOptions;
use crate::record::{ElementForm, FieldKind};
use crate::resolve::{resolve_decls, FieldDecl};
use crate::sheet::Sheet;

/// A field of a runtime-described record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDesc {
    pub name: String,
    /// Rust type name: `i32`, `i64`, `f64` or `String`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Tag key to header name
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl FieldDesc {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type_name(&self.type_name).unwrap_or(FieldKind::Unsupported("unknown"))
    }
}

/// A runtime-described record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDesc {
    /// Name used for the record in type expressions
    #[serde(default = "default_record_name")]
    pub name: String,
    pub fields: Vec<FieldDesc>,
}

fn default_record_name() -> String {
    "Record".to_string()
}

impl RecordDesc {
    pub fn new(fields: Vec<FieldDesc>) -> Self {
        Self {
            name: default_record_name(),
            fields,
        }
    }
}

/// Deepest nesting accepted in a shape expression
pub const MAX_TYPE_DEPTH: usize = 32;

/// A type in a target shape expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// `&T`, `&mut T`, `Box<T>`, `Rc<T>`, `Arc<T>`
    Pointer(Box<TypeDesc>),
    /// `Vec<T>`, `[T]`
    Sequence(Box<TypeDesc>),
    /// The described record
    Record(RecordDesc),
    /// Any other named type
    Scalar(String),
}

impl TypeDesc {
    /// `&mut Vec<R>` for a record
    pub fn vec_of(record: RecordDesc) -> Self {
        TypeDesc::Pointer(Box::new(TypeDesc::Sequence(Box::new(TypeDesc::Record(record)))))
    }

    /// Parse a type expression; the identifier `Record` (or the record's own
    /// name) stands for `record`.
    pub fn parse(expr: &str, record: &RecordDesc) -> Result<Self> {
        Self::parse_nested(expr, record, 0)
    }

    fn parse_nested(expr: &str, record: &RecordDesc, depth: usize) -> Result<Self> {
        if depth > MAX_TYPE_DEPTH {
            return Err(BindError::InvalidTypeExpr(format!(
                "type nested deeper than {} levels",
                MAX_TYPE_DEPTH
            )));
        }
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(BindError::InvalidTypeExpr("empty type".to_string()));
        }

        if let Some(rest) = expr.strip_prefix('&') {
            let rest = rest.trim_start();
            let rest = match rest.strip_prefix("mut") {
                Some(after) if after.starts_with(char::is_whitespace) => after,
                _ => rest,
            };
            let inner = Self::parse_nested(rest, record, depth + 1)?;
            return Ok(TypeDesc::Pointer(Box::new(inner)));
        }

        if let Some(inner) = expr.strip_prefix('[') {
            let inner = inner
                .strip_suffix(']')
                .ok_or_else(|| BindError::InvalidTypeExpr(format!("unclosed `[` in `{}`", expr)))?;
            let inner = Self::parse_nested(inner, record, depth + 1)?;
            return Ok(TypeDesc::Sequence(Box::new(inner)));
        }

        if let Some(open) = expr.find('<') {
            let head = expr[..open].trim();
            let inner = expr[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| BindError::InvalidTypeExpr(format!("unclosed `<` in `{}`", expr)))?;
            let inner = Box::new(Self::parse_nested(inner, record, depth + 1)?);
            return match head {
                "Box" | "Rc" | "Arc" => Ok(TypeDesc::Pointer(inner)),
                "Vec" => Ok(TypeDesc::Sequence(inner)),
                other => Err(BindError::InvalidTypeExpr(format!(
                    "unknown generic type `{}`",
                    other
                ))),
            };
        }

        if !expr.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(BindError::InvalidTypeExpr(format!("invalid type `{}`", expr)));
        }
        if expr == "Record" || expr == record.name {
            Ok(TypeDesc::Record(record.clone()))
        } else {
            Ok(TypeDesc::Scalar(expr.to_string()))
        }
    }

    /// Check the target shape and return the element form and record.
    ///
    /// The target must be a pointer to a sequence whose element, after
    /// stripping one optional pointer, is the record.
    pub fn element(&self) -> Result<(ElementForm, &RecordDesc)> {
        let TypeDesc::Pointer(target) = self else {
            return Err(BindError::NotPointer);
        };
        let TypeDesc::Sequence(element) = target.as_ref() else {
            return Err(BindError::NotSequence);
        };
        let (form, element) = match element.as_ref() {
            TypeDesc::Pointer(inner) => (ElementForm::Pointer, inner.as_ref()),
            other => (ElementForm::Value, other),
        };
        match element {
            TypeDesc::Record(record) => Ok((form, record)),
            _ => Err(BindError::NotStruct),
        }
    }
}

/// A bound runtime record; every declared field is present, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct DynRecord {
    values: Vec<(String, Value)>,
}

impl DynRecord {
    fn zeroed(desc: &RecordDesc) -> Self {
        let values = desc
            .fields
            .iter()
            .map(|field| (field.name.clone(), Value::zero(field.kind())))
            .collect();
        Self { values }
    }

    /// Value of a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for DynRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Element of a runtime-described target collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DynElement {
    Value(DynRecord),
    Pointer(Box<DynRecord>),
}

impl DynElement {
    pub fn record(&self) -> &DynRecord {
        match self {
            DynElement::Value(record) => record,
            DynElement::Pointer(record) => record,
        }
    }

    pub fn form(&self) -> ElementForm {
        match self {
            DynElement::Value(_) => ElementForm::Value,
            DynElement::Pointer(_) => ElementForm::Pointer,
        }
    }
}

/// Bind the rows of `sheet` into `out` following the runtime shape `target`.
///
/// Same row policy as [`crate::unmarshal`]. The shape is checked before the
/// header row is read, and `out` is left untouched on any setup error.
pub fn unmarshal_dynamic<S>(
    target: &TypeDesc,
    out: &mut Vec<DynElement>,
    sheet: &S,
    options: &BindOptions,
) -> Result<BindReport>
where
    S: Sheet + ?Sized,
{
    let (form, record) = target.element()?;
    let schema = header_schema(sheet, options)?;

    let tag = options.tag_name();
    let decls = record.fields.iter().enumerate().map(|(index, field)| FieldDecl {
        name: field.name.as_str(),
        tag: field.tags.get(tag).map(String::as_str),
        kind: field.kind(),
        type_name: field.type_name.as_str(),
        slot: index,
    });
    let binding = resolve_decls(decls, &schema, options)?;
    debug!(form = ?form, record = %record.name, "binding rows into runtime target");

    let report = bind_rows(
        sheet,
        &schema,
        &binding,
        options,
        || DynRecord::zeroed(record),
        |dyn_record: &mut DynRecord, index: &usize, value| {
            dyn_record.values[*index].1 = value
        },
        |dyn_record| {
            out.push(match form {
                ElementForm::Value => DynElement::Value(dyn_record),
                ElementForm::Pointer => DynElement::Pointer(Box::new(dyn_record)),
            })
        },
    );
    Ok(report)
}
