//! `#[derive(Record)]` end to end

use std::sync::Arc;

use sheetbind::{
    unmarshal, unmarshal_with, BindError, BindOptions, CellValue, Element, ElementForm, FieldKind,
    Grid, Record,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Employee {
    #[excel("Name")]
    name: String,
    #[tag(excel = "ID", csv = "employee_id")]
    id: i64,
    #[excel = "Salary"]
    salary: f64,
    #[excel("Age")]
    age: i32,
    nickname: String,
}

#[derive(Debug, Default, Record)]
struct WithFlag {
    #[excel("Name")]
    name: String,
    #[excel("Active")]
    active: bool,
}

fn staff() -> Grid<CellValue> {
    Grid::new(
        "Staff",
        vec![
            vec!["Name".into(), "ID".into(), "Salary".into(), "Age".into()],
            vec!["Ann".into(), 7i64.into(), 5200.5.into(), 34i64.into()],
            vec!["Ben".into(), 8i64.into(), "n/a".into(), 29i64.into()],
            vec!["Cid".into(), 9.0.into(), 4100i64.into(), 51i64.into()],
        ],
    )
}

fn employee(name: &str, id: i64, salary: f64, age: i32) -> Employee {
    Employee {
        name: name.to_string(),
        id,
        salary,
        age,
        nickname: String::new(),
    }
}

#[test]
fn test_derived_field_table() {
    let fields = Employee::FIELDS;

    let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["name", "id", "salary", "age", "nickname"]);

    assert_eq!(fields[0].tag("excel"), Some("Name"));
    assert_eq!(fields[1].tag("excel"), Some("ID"));
    assert_eq!(fields[1].tag("csv"), Some("employee_id"));
    assert_eq!(fields[2].tag("excel"), Some("Salary"));
    assert_eq!(fields[4].tag("excel"), None);

    let kinds: Vec<FieldKind> = fields.iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::String,
            FieldKind::Int64,
            FieldKind::Float,
            FieldKind::Int,
            FieldKind::String,
        ]
    );
    assert_eq!(<Employee as Element>::FORM, ElementForm::Value);
}

#[test]
fn test_strict_bind() {
    let mut staff_rows: Vec<Employee> = Vec::new();

    let report = unmarshal(&mut staff_rows, &staff(), &BindOptions::default()).unwrap();

    assert_eq!(
        staff_rows,
        vec![employee("Ann", 7, 5200.5, 34), employee("Cid", 9, 4100.0, 51)]
    );
    assert_eq!(report.appended, 2);
    assert_eq!(report.dropped, 1);
}

#[test]
fn test_tolerant_bind_into_arc() {
    let mut shared: Vec<Arc<Employee>> = Vec::new();

    let report = unmarshal(&mut shared, &staff(), &BindOptions::tolerant()).unwrap();

    assert_eq!(shared.len(), 3);
    assert_eq!(*shared[1], employee("Ben", 8, 0.0, 29));
    assert_eq!(report.substituted, 1);
}

#[test]
fn test_bind_by_csv_tag() {
    let grid: Vec<Vec<&str>> = vec![
        vec!["employee_id", "Name"],
        vec!["42", "Dora"],
    ];
    let mut rows: Vec<Box<Employee>> = Vec::new();

    unmarshal_with(&mut rows, &grid, 0, false, "csv").unwrap();

    // only `id` carries a csv tag
    assert_eq!(*rows[0], employee("", 42, 0.0, 0));
}

#[test]
fn test_unsupported_field_type() {
    let grid: Vec<Vec<&str>> = vec![vec!["Name", "Active"], vec!["Eli", "yes"]];
    let mut rows: Vec<WithFlag> = Vec::new();

    let err = unmarshal(&mut rows, &grid, &BindOptions::default()).unwrap_err();
    assert_eq!(
        err,
        BindError::UnsupportedField {
            field: "active".to_string(),
            type_name: "bool".to_string(),
        }
    );
    assert!(rows.is_empty());

    let options = BindOptions::default().allowing_unsupported();
    unmarshal(&mut rows, &grid, &options).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Eli");
    assert!(!rows[0].active);
}

#[test]
fn test_unsupported_field_without_column() {
    let grid: Vec<Vec<&str>> = vec![vec!["Name"], vec!["Fay"]];
    let mut rows: Vec<WithFlag> = Vec::new();

    unmarshal(&mut rows, &grid, &BindOptions::default()).unwrap();

    assert_eq!(rows[0].name, "Fay");
}
