//! Grouping partitions over a [`Table`].
//!
//! A [`GroupedTable`] pairs a table with the variant of grouping it carries and the partition
//! itself: an ordered list of row-index sets, each with the key values that identify it.
use crate::error::{ColumnarError, ColumnarResult};
use crate::table::Table;
use crate::types::{DataType, Value};
use crate::vector::Vector;
use std::collections::HashMap;

/// The kind of grouping metadata a table carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupingVariant {
    Ungrouped,
    Grouped { keys: Vec<String> },
    /// Every row is its own group; `keys` are carried along as identifying columns.
    Rowwise { keys: Vec<String> },
}

impl GroupingVariant {
    pub fn keys(&self) -> &[String] {
        match self {
            GroupingVariant::Ungrouped => &[],
            GroupingVariant::Grouped { keys } | GroupingVariant::Rowwise { keys } => keys,
        }
    }

    pub fn is_ungrouped(&self) -> bool {
        matches!(self, GroupingVariant::Ungrouped)
    }
}

/// One partition cell: the rows it covers plus its key values (aligned with the variant keys).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub rows: Vec<usize>,
    pub key: Vec<Value>,
}

#[derive(Clone, Debug)]
pub struct GroupedTable {
    table: Table,
    variant: GroupingVariant,
    groups: Vec<Group>,
}

impl GroupedTable {
    /// A single implicit group holding every row, even when the table is empty.
    pub fn ungrouped(table: Table) -> Self {
        let groups = vec![Group {
            rows: (0..table.row_count()).collect(),
            key: Vec::new(),
        }];
        Self {
            table,
            variant: GroupingVariant::Ungrouped,
            groups,
        }
    }

    /// Partition rows by the values of `keys`, with groups ordered by first occurrence.
    pub fn group_by(table: Table, keys: &[impl AsRef<str>]) -> ColumnarResult<Self> {
        if keys.is_empty() {
            return Ok(Self::ungrouped(table));
        }
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        let key_columns = key_columns(&table, &keys)?;

        let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        for row in 0..table.row_count() {
            let key = row_key(&key_columns, row);
            match index.get(&key) {
                Some(&g) => groups[g].rows.push(row),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        rows: vec![row],
                        key,
                    });
                }
            }
        }

        Ok(Self {
            table,
            variant: GroupingVariant::Grouped { keys },
            groups,
        })
    }

    /// One group per row.
    pub fn rowwise(table: Table, keys: &[impl AsRef<str>]) -> ColumnarResult<Self> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        let key_columns = key_columns(&table, &keys)?;
        let groups = (0..table.row_count())
            .map(|row| Group {
                rows: vec![row],
                key: row_key(&key_columns, row),
            })
            .collect();

        Ok(Self {
            table,
            variant: GroupingVariant::Rowwise { keys },
            groups,
        })
    }

    /// Wrap a partition computed elsewhere, validating it against the table.
    pub fn from_parts(
        table: Table,
        variant: GroupingVariant,
        groups: Vec<Group>,
    ) -> ColumnarResult<Self> {
        key_columns(&table, variant.keys())?;
        let arity = variant.keys().len();
        for (idx, group) in groups.iter().enumerate() {
            if group.key.len() != arity {
                return Err(ColumnarError::InvalidPartition(format!(
                    "group {} has {} key values, expected {arity}",
                    idx + 1,
                    group.key.len()
                )));
            }
            if let Some(&row) = group.rows.iter().find(|&&r| r >= table.row_count()) {
                return Err(ColumnarError::InvalidPartition(format!(
                    "group {} references row {row} of a {}-row table",
                    idx + 1,
                    table.row_count()
                )));
            }
        }
        if variant.is_ungrouped() && groups.len() != 1 {
            return Err(ColumnarError::InvalidPartition(format!(
                "an ungrouped table has exactly one group, got {}",
                groups.len()
            )));
        }

        Ok(Self {
            table,
            variant,
            groups,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn variant(&self) -> &GroupingVariant {
        &self.variant
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_grouping_column(&self, name: &str) -> bool {
        self.variant.keys().iter().any(|k| k == name)
    }

    /// One row per group (in group order) holding the key columns.
    pub fn group_keys(&self) -> ColumnarResult<Table> {
        let mut out = Table::with_rows(self.groups.len());
        for (pos, name) in self.variant.keys().iter().enumerate() {
            let data_type = self
                .table
                .column(name)
                .map_or(DataType::Null, Vector::data_type);
            let values = self
                .groups
                .iter()
                .map(|g| g.key.get(pos).cloned().unwrap_or(Value::Null))
                .collect();
            out.add_column(name.clone(), Vector::from_values(values)?.cast(data_type)?)?;
        }
        Ok(out)
    }

    pub fn into_parts(self) -> (Table, GroupingVariant, Vec<Group>) {
        (self.table, self.variant, self.groups)
    }
}

fn key_columns<'a>(
    table: &'a Table,
    keys: &[String],
) -> ColumnarResult<Vec<&'a Vector>> {
    keys.iter()
        .map(|k| {
            table
                .column(k)
                .ok_or_else(|| ColumnarError::UnknownColumn(k.clone()))
        })
        .collect()
}

fn row_key(columns: &[&Vector], row: usize) -> Vec<Value> {
    columns
        .iter()
        .map(|c| c.get(row).unwrap_or(Value::Null))
        .collect()
}
