mod common;

use common::{column, f, run, sales_by};
use frame_columnar::{DataType, Vector};
use frame_summarise::{expand, Across, ColumnSelector, Entry, Expr, Expression, SummariseError};
use pretty_assertions::assert_eq;

fn names(cols: &[&str]) -> ColumnSelector {
    ColumnSelector::Names(cols.iter().map(|c| c.to_string()).collect())
}

#[test]
fn single_function_keeps_column_names() {
    let data = sales_by(&["region"]);
    let out = run(
        &data,
        vec![Entry::across(
            Across::new(ColumnSelector::OfType(DataType::Integer)).function("sum"),
        )],
    )
    .unwrap();

    assert_eq!(out.table.names(), ["region", "amount"]);
    assert_eq!(column(&out, "amount"), &Vector::from(vec![90_i64, 60]));
}

#[test]
fn several_functions_fan_out_columns_first() {
    let data = sales_by(&["region"]);
    let out = run(
        &data,
        vec![Entry::across(
            Across::new(names(&["amount", "price"]))
                .labeled("total", "sum")
                .labeled("top", "max"),
        )],
    )
    .unwrap();

    assert_eq!(
        out.table.names(),
        ["region", "amount_total", "amount_top", "price_total", "price_top"]
    );
    assert_eq!(column(&out, "price_top"), &Vector::from(vec![3.5, 3.0]));
}

#[test]
fn custom_templates_and_later_references() {
    let data = sales_by(&["region"]);
    let out = run(
        &data,
        vec![
            Entry::across(
                Across::new(names(&["amount"]))
                    .function("min")
                    .names("{.fn}_of_{.col}"),
            ),
            Entry::named("twice", f("sum", Expr::col("min_of_amount"))),
        ],
    )
    .unwrap();

    assert_eq!(column(&out, "min_of_amount"), &Vector::from(vec![10_i64, 20]));
    assert_eq!(column(&out, "twice"), &Vector::from(vec![10_i64, 20]));
}

#[test]
fn expansion_records_provenance() {
    let data = sales_by(&["region"]);
    let entries = [
        Entry::named("rows", Expr::call("n", Vec::<Expr>::new())),
        Entry::across(Across::new(ColumnSelector::Everything).function("first")),
    ];
    let expanded = expand(&entries, &data).unwrap();

    let summary: Vec<(usize, &str, bool, Option<usize>)> = expanded
        .iter()
        .map(|e| (e.source, e.name.as_str(), e.named, e.position))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, "rows", true, None),
            (1, "product", true, Some(0)),
            (1, "amount", true, Some(1)),
            (1, "price", true, Some(2)),
        ]
    );
    assert_eq!(expanded[2].expr.label(), "first(amount)");
}

#[test]
fn malformed_fan_outs_are_rejected_before_evaluation() {
    let data = sales_by(&["region"]);
    let cases = [
        (
            Entry::across(Across::new(names(&["amount"]))),
            "a column fan-out needs at least one function",
        ),
        (
            Entry::across(Across::new(names(&["region"])).function("first")),
            "can't fan out over grouping column `region`",
        ),
        (
            Entry::across(Across::new(names(&["nope"])).function("first")),
            "column `nope` doesn't exist",
        ),
        (
            Entry::across(Across::new(ColumnSelector::OfType(DataType::Boolean)).function("sum")),
            "the column selection matched no columns",
        ),
        (
            Entry::across(
                Across::new(names(&["amount", "price"]))
                    .function("sum")
                    .names("{.fn}"),
            ),
            "the names template produces `sum` more than once",
        ),
        (
            Entry::across(Across::new(names(&["amount"])).function("sum")).with_name("x"),
            "a column fan-out can't be given a name (got `x`)",
        ),
    ];

    for (entry, reason) in cases {
        let err = run(&data, vec![Entry::named("ok", Expr::lit(1)), entry]).unwrap_err();
        assert_eq!(
            err,
            SummariseError::Expansion {
                entry: 2,
                reason: reason.to_string(),
            }
        );
    }
}
