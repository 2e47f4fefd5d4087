use frame_columnar::{
    ColumnarError, Group, GroupedTable, GroupingVariant, Table, Value, Vector,
};
use pretty_assertions::assert_eq;

fn sales() -> Table {
    Table::from_columns([
        ("region", Vector::from(vec!["east", "west", "east", "north", "west"])),
        ("year", Vector::from(vec![2020_i64, 2020, 2021, 2020, 2020])),
        ("amount", Vector::from(vec![1.0, 2.0, 3.0, 4.0, 5.0])),
    ])
    .unwrap()
}

#[test]
fn group_by_orders_groups_by_first_occurrence() {
    let grouped = GroupedTable::group_by(sales(), &["region"]).unwrap();
    let groups = grouped.groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].key, vec![Value::from("east")]);
    assert_eq!(groups[0].rows, vec![0, 2]);
    assert_eq!(groups[1].key, vec![Value::from("west")]);
    assert_eq!(groups[1].rows, vec![1, 4]);
    assert_eq!(groups[2].key, vec![Value::from("north")]);
}

#[test]
fn group_keys_has_one_row_per_group() {
    let grouped = GroupedTable::group_by(sales(), &["region", "year"]).unwrap();
    let keys = grouped.group_keys().unwrap();
    assert_eq!(keys.row_count(), 4);
    assert_eq!(keys.names(), &["region".to_string(), "year".to_string()]);
    assert_eq!(
        keys.column("region").unwrap(),
        &Vector::from(vec!["east", "west", "east", "north"])
    );
    assert_eq!(
        keys.column("year").unwrap(),
        &Vector::from(vec![2020_i64, 2020, 2021, 2020])
    );
}

#[test]
fn ungrouped_tables_have_one_group_even_when_empty() {
    let empty = Table::from_columns([("x", Vector::Double(vec![]))]).unwrap();
    let grouped = GroupedTable::ungrouped(empty);
    assert_eq!(grouped.group_count(), 1);
    assert!(grouped.groups()[0].rows.is_empty());
    assert_eq!(grouped.group_keys().unwrap().row_count(), 1);
}

#[test]
fn grouping_by_no_keys_is_ungrouped() {
    let grouped = GroupedTable::group_by(sales(), &[] as &[&str]).unwrap();
    assert_eq!(grouped.variant(), &GroupingVariant::Ungrouped);
}

#[test]
fn rowwise_makes_one_group_per_row() {
    let grouped = GroupedTable::rowwise(sales(), &["region"]).unwrap();
    assert_eq!(grouped.group_count(), 5);
    assert_eq!(grouped.groups()[3].rows, vec![3]);
    assert_eq!(grouped.groups()[3].key, vec![Value::from("north")]);
}

#[test]
fn unknown_key_column_is_an_error() {
    let err = GroupedTable::group_by(sales(), &["missing"]).unwrap_err();
    assert_eq!(err, ColumnarError::UnknownColumn("missing".into()));
}

#[test]
fn from_parts_validates_rows_and_key_arity() {
    let variant = GroupingVariant::Grouped {
        keys: vec!["region".into()],
    };
    let err = GroupedTable::from_parts(
        sales(),
        variant.clone(),
        vec![Group {
            rows: vec![0, 10],
            key: vec![Value::from("east")],
        }],
    )
    .unwrap_err();
    assert!(matches!(err, ColumnarError::InvalidPartition(_)));

    let err = GroupedTable::from_parts(
        sales(),
        variant,
        vec![Group {
            rows: vec![0],
            key: vec![],
        }],
    )
    .unwrap_err();
    assert!(matches!(err, ColumnarError::InvalidPartition(_)));
}

#[test]
fn into_parts_hands_back_table_and_groups() {
    let (table, variant, groups) = GroupedTable::group_by(sales(), &["year"])
        .unwrap()
        .into_parts();
    assert_eq!(table, sales());
    assert_eq!(
        variant,
        GroupingVariant::Grouped {
            keys: vec!["year".into()]
        }
    );
    assert_eq!(
        groups,
        vec![
            Group {
                rows: vec![0, 1, 3, 4],
                key: vec![Value::from(2020_i64)],
            },
            Group {
                rows: vec![2],
                key: vec![Value::from(2021_i64)],
            },
        ]
    );
}

#[test]
fn select_projects_columns_in_the_given_order() {
    let table = sales();
    let projected = table.select(&["amount", "region"]).unwrap();
    assert_eq!(projected.names(), ["amount", "region"]);
    assert_eq!(projected.row_count(), 5);
    assert_eq!(projected.value(3, "region"), Some(Value::from("north")));
    assert_eq!(projected.value(3, "year"), None);
    assert_eq!(table.value(9, "amount"), None);

    assert_eq!(
        table.select(&["profit"]).unwrap_err(),
        ColumnarError::UnknownColumn("profit".into())
    );
}

#[test]
fn table_rejects_duplicate_and_misaligned_columns() {
    let mut table = sales();
    assert_eq!(
        table.add_column("year", Vector::Null(5)).unwrap_err(),
        ColumnarError::DuplicateColumn("year".into())
    );
    assert!(matches!(
        table.add_column("short", Vector::Null(2)).unwrap_err(),
        ColumnarError::LengthMismatch { expected: 5, actual: 2, .. }
    ));

    table.set_column("year", Vector::Null(5)).unwrap();
    assert_eq!(table.names()[1], "year");
    assert_eq!(table.column("year").unwrap(), &Vector::Null(5));
}
