use crate::error::{SummariseError, SummariseResult};
use crate::expand::ExpandedEntry;
use crate::expr::Datum;
use crate::scope::Scope;
use frame_columnar::Vector;

/// The result of one expanded entry in one group.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EntryResult {
    /// The expression produced nothing.
    Empty,
    Vector(Vector),
    /// A sub-table split into independently tracked named fields.
    Fields(Vec<(String, Vector)>),
}

/// Evaluate one entry against a group's scope. The scope is not modified.
pub(crate) fn evaluate_entry(
    entry: &ExpandedEntry,
    scope: &Scope,
) -> SummariseResult<EntryResult> {
    let group = || scope.group_label().map(str::to_string);
    let datum = entry
        .expr
        .evaluate(scope)
        .map_err(|source| SummariseError::Evaluation {
            entry: entry.name.clone(),
            group: group(),
            source,
        })?;

    match datum {
        Datum::Null => Ok(EntryResult::Empty),
        Datum::Vector(v) => Ok(EntryResult::Vector(v)),
        Datum::Frame(table) => {
            let mut fields: Vec<(String, Vector)> = table
                .columns()
                .map(|(name, column)| (name.to_string(), column.clone()))
                .collect();
            if !entry.named {
                return Ok(EntryResult::Fields(fields));
            }
            if fields.len() == 1 {
                if let Some((_, column)) = fields.pop() {
                    return Ok(EntryResult::Vector(column));
                }
            }
            Ok(EntryResult::Fields(
                fields
                    .into_iter()
                    .map(|(field, column)| (format!("{}${field}", entry.name), column))
                    .collect(),
            ))
        }
        Datum::Function(_) => Err(SummariseError::UnsupportedResultKind {
            entry: entry.name.clone(),
            kind: datum.kind(),
            group: group(),
        }),
    }
}

/// Evaluate every entry in order against one group, extending the scope after each entry so
/// later entries see earlier results.
pub(crate) fn evaluate_group(
    entries: &[ExpandedEntry],
    mut scope: Scope,
) -> SummariseResult<Vec<EntryResult>> {
    log::trace!(
        "evaluating {} entries for group {} ({} rows)",
        entries.len(),
        scope.group_index() + 1,
        scope.group_size()
    );

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let result = evaluate_entry(entry, &scope)?;
        match &result {
            EntryResult::Empty => scope.unbind(&entry.name),
            EntryResult::Vector(v) => scope.bind(entry.name.clone(), v.clone()),
            EntryResult::Fields(fields) => {
                for (name, column) in fields {
                    scope.bind(name.clone(), column.clone());
                }
            }
        }
        results.push(result);
    }
    Ok(results)
}
