use crate::error::{ColumnarError, ColumnarResult};
use crate::types::Value;
use crate::vector::Vector;
use std::collections::HashMap;

/// An ordered set of equally long named columns.
///
/// The row count is tracked separately so a table without columns can still have rows (for
/// example the key table of an ungrouped summary).
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    names: Vec<String>,
    column_index: HashMap<String, usize>,
    columns: Vec<Vector>,
    rows: usize,
}

impl Table {
    /// A table with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            names: Vec::new(),
            column_index: HashMap::new(),
            columns: Vec::new(),
            rows,
        }
    }

    pub fn from_columns<N, I>(columns: I) -> ColumnarResult<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vector)>,
    {
        let mut columns = columns.into_iter().peekable();
        let rows = columns.peek().map_or(0, |(_, v)| v.len());
        let mut table = Self::with_rows(rows);
        for (name, values) in columns {
            table.add_column(name, values)?;
        }
        Ok(table)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_idx(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Vector> {
        self.column_idx(name).map(|idx| &self.columns[idx])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    pub fn value(&self, row: usize, name: &str) -> Option<Value> {
        self.column(name)?.get(row)
    }

    /// Append a new column. Fails on a duplicate name or a length mismatch.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vector) -> ColumnarResult<()> {
        let name = name.into();
        if self.column_index.contains_key(&name) {
            return Err(ColumnarError::DuplicateColumn(name));
        }
        self.check_len(&name, &values)?;

        self.column_index.insert(name.clone(), self.columns.len());
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Replace an existing column in place, or append it when the name is new.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vector) -> ColumnarResult<()> {
        let name = name.into();
        self.check_len(&name, &values)?;
        match self.column_index.get(&name) {
            Some(&idx) => self.columns[idx] = values,
            None => {
                self.column_index.insert(name.clone(), self.columns.len());
                self.names.push(name);
                self.columns.push(values);
            }
        }
        Ok(())
    }

    /// Gather rows by index into a new table with the same columns.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            column_index: self.column_index.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            rows: indices.len(),
        }
    }

    /// Project the named columns, in the order given.
    pub fn select(&self, names: &[impl AsRef<str>]) -> ColumnarResult<Self> {
        let mut out = Self::with_rows(self.rows);
        for name in names {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| ColumnarError::UnknownColumn(name.to_string()))?;
            out.add_column(name, column.clone())?;
        }
        Ok(out)
    }

    fn check_len(&self, name: &str, values: &Vector) -> ColumnarResult<()> {
        if values.len() != self.rows {
            return Err(ColumnarError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows,
                actual: values.len(),
            });
        }
        Ok(())
    }
}
