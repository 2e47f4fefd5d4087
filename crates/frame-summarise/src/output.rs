use crate::error::SummariseResult;
use frame_columnar::{GroupedTable, Table, Vector};
use indexmap::IndexMap;

/// Assemble the summary table: the key columns with row `g` repeated `sizes[g]` times, followed
/// by the summary columns. A summary column named like a key column replaces it in place.
pub(crate) fn build_output(
    data: &GroupedTable,
    columns: IndexMap<String, Vector>,
    sizes: &[usize],
) -> SummariseResult<Table> {
    let keys = data.group_keys()?;
    let rows: Vec<usize> = sizes
        .iter()
        .enumerate()
        .flat_map(|(g, &size)| std::iter::repeat(g).take(size))
        .collect();

    let mut out = keys.take_rows(&rows);
    for (name, column) in columns {
        out.set_column(name, column)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_rows_repeat_per_group_size() {
        let table = Table::from_columns([
            ("g", Vector::from(vec!["a", "b", "a"])),
            ("x", Vector::from(vec![1_i64, 2, 3])),
        ])
        .unwrap();
        let data = GroupedTable::group_by(table, &["g"]).unwrap();

        let mut columns = IndexMap::new();
        columns.insert("n".to_string(), Vector::from(vec![10_i64, 11, 20]));
        let out = build_output(&data, columns, &[2, 1]).unwrap();

        assert_eq!(out.names(), ["g", "n"]);
        assert_eq!(out.column("g"), Some(&Vector::from(vec!["a", "a", "b"])));
        assert_eq!(out.column("n"), Some(&Vector::from(vec![10_i64, 11, 20])));
    }
}
