use frame_columnar::{GroupedTable, GroupingVariant, Vector};
use indexmap::IndexMap;

/// Name bindings visible to expressions while one group is evaluated.
///
/// A scope starts with the group's slice of every input column. After each entry is evaluated
/// the engine binds the entry's result under its name, so later entries in the same group see
/// it (shadowing a raw column of the same name). Expressions only get shared access; extending
/// the scope is reserved to the engine.
#[derive(Clone, Debug)]
pub struct Scope {
    bindings: IndexMap<String, Vector>,
    group_index: usize,
    group_size: usize,
    label: Option<String>,
}

impl Scope {
    /// A detached scope over explicit bindings, treated as a single group of `group_size` rows.
    pub fn standalone<N, I>(bindings: I, group_size: usize) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vector)>,
    {
        Self {
            bindings: bindings.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            group_index: 0,
            group_size,
            label: None,
        }
    }

    pub(crate) fn for_group(data: &GroupedTable, group: usize) -> Self {
        let rows = data
            .groups()
            .get(group)
            .map(|g| g.rows.as_slice())
            .unwrap_or_default();
        let bindings = data
            .table()
            .columns()
            .map(|(name, column)| (name.to_string(), column.take(rows)))
            .collect();

        Self {
            bindings,
            group_index: group,
            group_size: rows.len(),
            label: group_label(data, group),
        }
    }

    /// A zero-row scope used to discover output types when there are no groups at all.
    pub(crate) fn prototype(data: &GroupedTable) -> Self {
        let bindings = data
            .table()
            .columns()
            .map(|(name, column)| (name.to_string(), column.take(&[])))
            .collect();

        Self {
            bindings,
            group_index: 0,
            group_size: 0,
            label: None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Vector> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Zero-based position of the group being evaluated.
    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// Number of input rows in the group being evaluated.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn bind(&mut self, name: impl Into<String>, value: Vector) {
        self.bindings.insert(name.into(), value);
    }

    /// Forget `name`, so later entries no longer see an earlier result under it.
    pub(crate) fn unbind(&mut self, name: &str) {
        self.bindings.shift_remove(name);
    }
}

/// Human-readable label for a group, e.g. ``group 2: `region = "west"` ``.
pub(crate) fn group_label(data: &GroupedTable, group: usize) -> Option<String> {
    match data.variant() {
        GroupingVariant::Ungrouped => None,
        GroupingVariant::Rowwise { .. } => Some(format!("row {}", group + 1)),
        GroupingVariant::Grouped { keys } => {
            let key = data.groups().get(group).map(|g| g.key.as_slice())?;
            let parts = keys
                .iter()
                .zip(key)
                .map(|(k, v)| format!("`{k} = {}`", v.to_literal()))
                .collect::<Vec<_>>();
            Some(format!("group {}: {}", group + 1, parts.join(", ")))
        }
    }
}
