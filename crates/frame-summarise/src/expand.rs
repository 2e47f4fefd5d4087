//! Expansion of user entries into concrete expression entries.
//!
//! Expansion runs before any evaluation. A plain entry expands to itself; an [`Across`] entry
//! fans out into one entry per (selected column, function) pair, columns outermost.
use crate::error::{SummariseError, SummariseResult};
use crate::expr::{Expr, Expression};
use frame_columnar::{DataType, GroupedTable};
use std::collections::HashSet;
use std::sync::Arc;

/// One user-supplied summary entry.
#[derive(Clone, Debug)]
pub struct Entry {
    name: Option<String>,
    spec: EntrySpec,
}

#[derive(Clone, Debug)]
pub enum EntrySpec {
    Expression(Arc<dyn Expression>),
    Across(Across),
}

impl Entry {
    pub fn named(name: impl Into<String>, expr: impl Expression + 'static) -> Self {
        Self {
            name: Some(name.into()),
            spec: EntrySpec::Expression(Arc::new(expr)),
        }
    }

    /// An entry whose name is derived from the expression's label.
    pub fn unnamed(expr: impl Expression + 'static) -> Self {
        Self {
            name: None,
            spec: EntrySpec::Expression(Arc::new(expr)),
        }
    }

    pub fn across(across: Across) -> Self {
        Self {
            name: None,
            spec: EntrySpec::Across(across),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn spec(&self) -> &EntrySpec {
        &self.spec
    }
}

/// Which input columns an [`Across`] entry fans out over. Grouping columns are never selected.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnSelector {
    Names(Vec<String>),
    Everything,
    OfType(DataType),
}

/// A function applied to every selected column.
#[derive(Clone, Debug, PartialEq)]
pub struct AcrossFn {
    /// Name substituted for `{.fn}`; defaults to the function name.
    pub label: Option<String>,
    pub function: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Across {
    pub columns: ColumnSelector,
    pub functions: Vec<AcrossFn>,
    /// Output name template using `{.col}` and `{.fn}`.
    pub names: Option<String>,
}

impl Across {
    pub fn new(columns: ColumnSelector) -> Self {
        Self {
            columns,
            functions: Vec::new(),
            names: None,
        }
    }

    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.functions.push(AcrossFn {
            label: None,
            function: function.into(),
        });
        self
    }

    pub fn labeled(mut self, label: impl Into<String>, function: impl Into<String>) -> Self {
        self.functions.push(AcrossFn {
            label: Some(label.into()),
            function: function.into(),
        });
        self
    }

    pub fn names(mut self, template: impl Into<String>) -> Self {
        self.names = Some(template.into());
        self
    }
}

/// A concrete entry ready for evaluation.
#[derive(Clone, Debug)]
pub struct ExpandedEntry {
    /// Zero-based index of the user entry this came from.
    pub source: usize,
    pub name: String,
    /// Whether the name was given explicitly (as opposed to derived from the expression).
    pub named: bool,
    /// Position within a fan-out, if this entry came from one.
    pub position: Option<usize>,
    pub expr: Arc<dyn Expression>,
}

/// Expand every entry, preserving order.
pub fn expand(entries: &[Entry], data: &GroupedTable) -> SummariseResult<Vec<ExpandedEntry>> {
    let available: Vec<(String, DataType)> = data
        .table()
        .columns()
        .filter(|(name, _)| !data.is_grouping_column(name))
        .map(|(name, column)| (name.to_string(), column.data_type()))
        .collect();

    let mut out = Vec::with_capacity(entries.len());
    for (source, entry) in entries.iter().enumerate() {
        match &entry.spec {
            EntrySpec::Expression(expr) => out.push(ExpandedEntry {
                source,
                name: entry.name.clone().unwrap_or_else(|| expr.label()),
                named: entry.name.is_some(),
                position: None,
                expr: Arc::clone(expr),
            }),
            EntrySpec::Across(across) => {
                let fail = |reason: String| SummariseError::Expansion {
                    entry: source + 1,
                    reason,
                };
                if let Some(name) = &entry.name {
                    return Err(fail(format!(
                        "a column fan-out can't be given a name (got `{name}`)"
                    )));
                }
                out.extend(expand_across(source, across, &available, data).map_err(fail)?);
            }
        }
    }

    log::debug!(
        "expanded {} summary entries into {}",
        entries.len(),
        out.len()
    );
    Ok(out)
}

fn expand_across(
    source: usize,
    across: &Across,
    available: &[(String, DataType)],
    data: &GroupedTable,
) -> Result<Vec<ExpandedEntry>, String> {
    if across.functions.is_empty() {
        return Err("a column fan-out needs at least one function".into());
    }

    let columns: Vec<&str> = match &across.columns {
        ColumnSelector::Everything => available.iter().map(|(n, _)| n.as_str()).collect(),
        ColumnSelector::OfType(ty) => available
            .iter()
            .filter(|(_, t)| t == ty)
            .map(|(n, _)| n.as_str())
            .collect(),
        ColumnSelector::Names(names) => {
            let mut out = Vec::with_capacity(names.len());
            for name in names {
                if data.is_grouping_column(name) {
                    return Err(format!("can't fan out over grouping column `{name}`"));
                }
                if !available.iter().any(|(n, _)| n == name) {
                    return Err(format!("column `{name}` doesn't exist"));
                }
                out.push(name.as_str());
            }
            out
        }
    };
    if columns.is_empty() {
        return Err("the column selection matched no columns".into());
    }

    let template = across.names.clone().unwrap_or_else(|| {
        if across.functions.len() == 1 && across.functions[0].label.is_none() {
            "{.col}".to_string()
        } else {
            "{.col}_{.fn}".to_string()
        }
    });

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(columns.len() * across.functions.len());
    for column in columns {
        for function in &across.functions {
            let label = function.label.as_deref().unwrap_or(&function.function);
            let name = render_name(&template, column, label)?;
            if !seen.insert(name.clone()) {
                return Err(format!("the names template produces `{name}` more than once"));
            }
            out.push(ExpandedEntry {
                source,
                name,
                named: true,
                position: Some(out.len()),
                expr: Arc::new(Expr::call(function.function.clone(), [Expr::col(column)])),
            });
        }
    }
    Ok(out)
}

fn render_name(template: &str, column: &str, function: &str) -> Result<String, String> {
    let mut out = String::with_capacity(template.len() + column.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => field.push(c),
                        None => return Err(format!("unclosed `{{` in names template {template:?}")),
                    }
                }
                match field.trim() {
                    ".col" | "col" => out.push_str(column),
                    ".fn" | "fn" => out.push_str(function),
                    other => {
                        return Err(format!(
                            "unknown field `{other}` in names template {template:?}"
                        ))
                    }
                }
            }
            '}' => return Err(format!("unmatched `}}` in names template {template:?}")),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::render_name;

    #[test]
    fn render_name_substitutes_fields() {
        assert_eq!(
            render_name("{.col}_{.fn}", "amount", "mean").unwrap(),
            "amount_mean"
        );
        assert_eq!(render_name("{fn}.{ col }", "x", "sd").unwrap(), "sd.x");
    }

    #[test]
    fn render_name_rejects_malformed_templates() {
        assert!(render_name("{.col", "x", "f").is_err());
        assert!(render_name("x}", "x", "f").is_err());
        assert!(render_name("{.column}", "x", "f").is_err());
    }
}
