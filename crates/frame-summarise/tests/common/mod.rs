#![allow(dead_code)]

use frame_columnar::{GroupedTable, Table, Vector};
use frame_summarise::{
    summarise, BinaryOp, Entry, Expr, SummariseOptions, SummariseResult, Summary,
};

/// Five sales rows: east holds rows 0, 2, 4 and west rows 1, 3.
pub fn sales() -> Table {
    Table::from_columns([
        ("region", Vector::from(vec!["east", "west", "east", "west", "east"])),
        ("product", Vector::from(vec!["x", "x", "y", "x", "y"])),
        ("amount", Vector::from(vec![10_i64, 20, 30, 40, 50])),
        ("price", Vector::from(vec![1.5, 2.0, 2.5, 3.0, 3.5])),
    ])
    .unwrap()
}

pub fn sales_by(keys: &[&str]) -> GroupedTable {
    GroupedTable::group_by(sales(), keys).unwrap()
}

pub fn options() -> SummariseOptions {
    SummariseOptions::default().sequential()
}

pub fn run(data: &GroupedTable, entries: Vec<Entry>) -> SummariseResult<Summary> {
    summarise(data, &entries, &options())
}

pub fn column<'a>(summary: &'a Summary, name: &str) -> &'a Vector {
    summary
        .table
        .column(name)
        .unwrap_or_else(|| panic!("missing output column `{name}`"))
}

pub fn f(name: &str, arg: Expr) -> Expr {
    Expr::call(name, vec![arg])
}

pub fn n() -> Expr {
    Expr::call("n", Vec::<Expr>::new())
}

/// `cur_group_id() == id`
pub fn in_group(id: i64) -> Expr {
    Expr::binary(
        BinaryOp::Equals,
        Expr::call("cur_group_id", Vec::<Expr>::new()),
        Expr::lit(id),
    )
}
