//! Record descriptors.
//!
//! A [`Record`] publishes a static table of its fields: the field name, its
//! tags (`(key, value)` pairs such as `("excel", "Name")`) and a typed setter.
//! The table is normally generated by `#[derive(Record)]` but can be written
//! by hand:
//!
//! ```rust
//! use sheetbind::{Element, ElementForm, Field, Record, Setter};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Record for Person {
//!     const FIELDS: &'static [Field<Self>] = &[
//!         Field::new("name", &[("excel", "Name")], Setter::String(|p: &mut Person, v| p.name = v)),
//!         Field::new("age", &[("excel", "Age")], Setter::Int(|p: &mut Person, v| p.age = v)),
//!     ];
//! }
//!
//! impl Element for Person {
//!     type Record = Self;
//!     const FORM: ElementForm = ElementForm::Value;
//!     fn from_record(record: Self) -> Self {
//!         record
//!     }
//! }
//! ```

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Declared type of a bindable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 32-bit integer (`i32`)
    Int,
    /// 64-bit integer (`i64`)
    Int64,
    /// Floating point (`f64`)
    Float,
    /// Text (`String`)
    String,
    /// Any other type; carries the declared type name
    Unsupported(&'static str),
}

impl FieldKind {
    /// Kind for a Rust scalar type name, `None` if it is not bindable
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "i32" => Some(FieldKind::Int),
            "i64" => Some(FieldKind::Int64),
            "f64" => Some(FieldKind::Float),
            "String" => Some(FieldKind::String),
            _ => None,
        }
    }

    /// Rust type name of the kind
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Int => "i32",
            FieldKind::Int64 => "i64",
            FieldKind::Float => "f64",
            FieldKind::String => "String",
            FieldKind::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldKind::Unsupported(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Typed assignment into a field of `R`
pub enum Setter<R> {
    Int(fn(&mut R, i32)),
    Int64(fn(&mut R, i64)),
    Float(fn(&mut R, f64)),
    String(fn(&mut R, String)),
    /// Field whose type cannot be produced from a cell
    Unsupported(&'static str),
}

impl<R> Setter<R> {
    /// Declared kind of the target field
    pub fn kind(&self) -> FieldKind {
        match self {
            Setter::Int(_) => FieldKind::Int,
            Setter::Int64(_) => FieldKind::Int64,
            Setter::Float(_) => FieldKind::Float,
            Setter::String(_) => FieldKind::String,
            Setter::Unsupported(name) => FieldKind::Unsupported(name),
        }
    }
}

// Manual impls: a derive would require `R: Clone`.
impl<R> Clone for Setter<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Setter<R> {}

impl<R> fmt::Debug for Setter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setter({})", self.kind())
    }
}

/// Static description of one record field
pub struct Field<R> {
    /// Field name
    pub name: &'static str,
    /// Tag key/value pairs, e.g. `("excel", "Name")`
    pub tags: &'static [(&'static str, &'static str)],
    /// Typed setter
    pub setter: Setter<R>,
}

impl<R> Field<R> {
    pub const fn new(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        setter: Setter<R>,
    ) -> Self {
        Self { name, tags, setter }
    }

    /// Tag value under `key`, if present
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(tag_key, _)| *tag_key == key)
            .map(|(_, value)| *value)
    }

    pub fn kind(&self) -> FieldKind {
        self.setter.kind()
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A struct that rows can be bound into
pub trait Record: Default + Sized + 'static {
    /// Field table, in declaration order
    const FIELDS: &'static [Field<Self>];
}

/// How bound records are stored in the target collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementForm {
    /// The record itself
    Value,
    /// A pointer to the record (`Box`, `Rc`, `Arc`)
    Pointer,
}

/// Element type of a target collection
pub trait Element: Sized {
    /// Record produced for each row
    type Record: Record;

    /// Value or pointer storage
    const FORM: ElementForm;

    /// Wrap a freshly bound record
    fn from_record(record: Self::Record) -> Self;
}

impl<R: Record> Element for Box<R> {
    type Record = R;
    const FORM: ElementForm = ElementForm::Pointer;

    fn from_record(record: R) -> Self {
        Box::new(record)
    }
}

impl<R: Record> Element for Rc<R> {
    type Record = R;
    const FORM: ElementForm = ElementForm::Pointer;

    fn from_record(record: R) -> Self {
        Rc::new(record)
    }
}

impl<R: Record> Element for Arc<R> {
    type Record = R;
    const FORM: ElementForm = ElementForm::Pointer;

    fn from_record(record: R) -> Self {
        Arc::new(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Row {
        id: i64,
    }

    impl Record for Row {
        const FIELDS: &'static [Field<Self>] = &[Field::new(
            "id",
            &[("excel", "ID"), ("csv", "id")],
            Setter::Int64(|r: &mut Row, v| r.id = v),
        )];
    }

    #[test]
    fn test_field_tag_lookup() {
        let field = &Row::FIELDS[0];
        assert_eq!(field.tag("excel"), Some("ID"));
        assert_eq!(field.tag("csv"), Some("id"));
        assert_eq!(field.tag("json"), None);
        assert_eq!(field.kind(), FieldKind::Int64);
    }

    #[test]
    fn test_setter_assigns() {
        let mut row = Row::default();
        if let Setter::Int64(set) = Row::FIELDS[0].setter {
            set(&mut row, 7);
        }
        assert_eq!(row.id, 7);
    }

    #[test]
    fn test_field_kind_names() {
        assert_eq!(FieldKind::from_type_name("i32"), Some(FieldKind::Int));
        assert_eq!(FieldKind::from_type_name("String"), Some(FieldKind::String));
        assert_eq!(FieldKind::from_type_name("bool"), None);
        assert_eq!(FieldKind::Unsupported("bool").to_string(), "bool");
        assert!(!FieldKind::Unsupported("bool").is_supported());
    }

    #[test]
    fn test_pointer_elements() {
        assert_eq!(<Box<Row> as Element>::FORM, ElementForm::Pointer);
        let boxed = <Box<Row> as Element>::from_record(Row { id: 3 });
        assert_eq!(boxed.id, 3);
    }
}
