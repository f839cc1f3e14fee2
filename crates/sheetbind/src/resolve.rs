//! Field resolution: which record field reads which column.

use tracing::debug;

use crate::error::{BindError, Result};
use crate::options::BindOptions;
use crate::record::{FieldKind, Record, Setter};
use crate::schema::Schema;

/// A field declaration as seen by the resolver
#[derive(Debug, Clone)]
pub(crate) struct FieldDecl<'f, S> {
    pub name: &'f str,
    /// Tag value under the active tag key
    pub tag: Option<&'f str>,
    pub kind: FieldKind,
    /// Declared type name, for diagnostics
    pub type_name: &'f str,
    /// Where bound values go
    pub slot: S,
}

/// A field bound to a column
#[derive(Debug, Clone)]
pub struct BoundField<'f, S> {
    pub field: &'f str,
    pub column: usize,
    pub kind: FieldKind,
    pub slot: S,
}

/// Resolved field-to-column binding for one call
#[derive(Debug, Clone)]
pub struct FieldBinding<'f, S> {
    fields: Vec<BoundField<'f, S>>,
}

impl<'f, S> FieldBinding<'f, S> {
    pub fn iter(&self) -> impl Iterator<Item = &BoundField<'f, S>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column bound to `field`, if any
    pub fn column(&self, field: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|bound| bound.field == field)
            .map(|bound| bound.column)
    }
}

/// Resolve the fields of record type `R` against `schema`.
///
/// A field is bound when its tag under the active key is present, non-empty
/// and names a schema column. Everything else keeps its default value.
pub fn resolve<R: Record>(
    schema: &Schema,
    options: &BindOptions,
) -> Result<FieldBinding<'static, Setter<R>>> {
    let tag = options.tag_name();
    let decls = R::FIELDS.iter().map(|field| FieldDecl {
        name: field.name,
        tag: field.tag(tag),
        kind: field.kind(),
        type_name: field.kind().type_name(),
        slot: field.setter,
    });
    resolve_decls(decls, schema, options)
}

pub(crate) fn resolve_decls<'f, S>(
    decls: impl IntoIterator<Item = FieldDecl<'f, S>>,
    schema: &Schema,
    options: &BindOptions,
) -> Result<FieldBinding<'f, S>> {
    let mut fields = Vec::new();

    for decl in decls {
        let Some(tag) = decl.tag.filter(|tag| !tag.is_empty()) else {
            continue;
        };
        let Some(column) = schema.column(tag) else {
            continue;
        };

        if !decl.kind.is_supported() {
            if options.allow_unsupported {
                debug!(
                    field = decl.name,
                    type_name = decl.type_name,
                    "skipping field of unsupported type"
                );
                continue;
            }
            return Err(BindError::UnsupportedField {
                field: decl.name.to_string(),
                type_name: decl.type_name.to_string(),
            });
        }

        fields.push(BoundField {
            field: decl.name,
            column,
            kind: decl.kind,
            slot: decl.slot,
        });
    }

    debug!(
        bound = fields.len(),
        columns = schema.len(),
        tag = options.tag_name(),
        "resolved field binding"
    );
    Ok(FieldBinding { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[derive(Default)]
    struct Person {
        name: String,
        age: i32,
        nickname: String,
        active: bool,
    }

    impl Record for Person {
        const FIELDS: &'static [Field<Self>] = &[
            Field::new(
                "name",
                &[("excel", "Name"), ("csv", "name")],
                Setter::String(|p: &mut Person, v| p.name = v),
            ),
            Field::new(
                "age",
                &[("excel", "Age")],
                Setter::Int(|p: &mut Person, v| p.age = v),
            ),
            Field::new(
                "nickname",
                &[("excel", "")],
                Setter::String(|p: &mut Person, v| p.nickname = v),
            ),
            Field::new("active", &[("excel", "Active")], Setter::Unsupported("bool")),
        ];
    }

    #[test]
    fn test_resolve_matches_tags() {
        let schema = Schema::from_header(&["Age", "Name", "Nickname"]);
        let binding = resolve::<Person>(&schema, &BindOptions::default()).unwrap();

        assert_eq!(binding.len(), 2);
        assert_eq!(binding.column("name"), Some(1));
        assert_eq!(binding.column("age"), Some(0));
        // empty tag is never bound
        assert_eq!(binding.column("nickname"), None);
    }

    #[test]
    fn test_resolve_skips_unknown_columns() {
        let schema = Schema::from_header(&["Name"]);
        let binding = resolve::<Person>(&schema, &BindOptions::default()).unwrap();

        assert_eq!(binding.len(), 1);
        assert_eq!(binding.column("age"), None);
    }

    #[test]
    fn test_resolve_with_other_tag_key() {
        let schema = Schema::from_header(&["name", "Age"]);
        let options = BindOptions::default().with_tag("csv");
        let binding = resolve::<Person>(&schema, &options).unwrap();

        assert_eq!(binding.len(), 1);
        assert_eq!(binding.column("name"), Some(0));
    }

    #[test]
    fn test_unsupported_field_is_rejected() {
        let schema = Schema::from_header(&["Name", "Active"]);
        let err = resolve::<Person>(&schema, &BindOptions::default()).unwrap_err();

        assert_eq!(
            err,
            BindError::UnsupportedField {
                field: "active".to_string(),
                type_name: "bool".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_field_allowed() {
        let schema = Schema::from_header(&["Name", "Active"]);
        let options = BindOptions::default().allowing_unsupported();
        let binding = resolve::<Person>(&schema, &options).unwrap();

        assert_eq!(binding.len(), 1);
        assert_eq!(binding.column("active"), None);
    }

    #[test]
    fn test_unsupported_field_without_column_is_fine() {
        let schema = Schema::from_header(&["Name"]);
        assert!(resolve::<Person>(&schema, &BindOptions::default()).is_ok());
    }
}
