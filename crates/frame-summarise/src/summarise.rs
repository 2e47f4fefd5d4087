//! The `summarise` driver.
//!
//! Entries are expanded once, then every group is evaluated independently (possibly in
//! parallel) with its own [`Scope`]. Only after every group has finished are the per-entry
//! chunks unified across groups, reconciled in size and assembled into the output table.
use crate::error::SummariseResult;
use crate::evaluator::{evaluate_group, EntryResult};
use crate::expand::{expand, Entry, ExpandedEntry};
use crate::groups::{resolve_groups, GroupsOption};
use crate::options::{CallerContext, SummariseOptions};
use crate::output::build_output;
use crate::recycle::{recycle, resolve_sizes};
use crate::scope::{group_label, Scope};
use crate::unify::{collect_slots, unify, UnifiedColumn};
use frame_columnar::{GroupedTable, GroupingVariant, Table, Vector};
use indexmap::IndexMap;

/// The result of a successful [`summarise`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub table: Table,
    /// Grouping the output should carry.
    pub grouping: GroupingVariant,
    /// Output row count of every input group, in group order.
    pub sizes: Vec<usize>,
    /// Informational note about the chosen grouping, if one applies.
    pub message: Option<String>,
}

impl Summary {
    /// Re-partition the output table according to `grouping`.
    pub fn into_grouped(self) -> SummariseResult<GroupedTable> {
        let grouped = match self.grouping {
            GroupingVariant::Ungrouped => GroupedTable::ungrouped(self.table),
            GroupingVariant::Grouped { keys } => GroupedTable::group_by(self.table, &keys)?,
            GroupingVariant::Rowwise { keys } => GroupedTable::rowwise(self.table, &keys)?,
        };
        Ok(grouped)
    }
}

/// Summarise every group of `data` down to the rows produced by `entries`.
pub fn summarise(
    data: &GroupedTable,
    entries: &[Entry],
    options: &SummariseOptions,
) -> SummariseResult<Summary> {
    let expanded = expand(entries, data)?;
    let group_count = data.group_count();

    // With no groups at all, a zero-row prototype is evaluated once to learn the output types.
    let (per_group, labels) = if group_count == 0 {
        let results = evaluate_group(&expanded, Scope::prototype(data))?;
        (vec![results], vec![None])
    } else {
        let labels: Vec<Option<String>> = (0..group_count).map(|g| group_label(data, g)).collect();
        (evaluate_groups(data, &expanded, options.parallel)?, labels)
    };

    let mut by_entry: Vec<Vec<EntryResult>> = expanded
        .iter()
        .map(|_| Vec::with_capacity(per_group.len()))
        .collect();
    for results in per_group {
        for (slot, result) in by_entry.iter_mut().zip(results) {
            slot.push(result);
        }
    }

    let mut unified: Vec<UnifiedColumn> = Vec::new();
    let mut visible: IndexMap<String, usize> = IndexMap::new();
    for (entry, results) in expanded.iter().zip(by_entry) {
        match collect_slots(entry, results, &labels)? {
            None => {
                visible.shift_remove(&entry.name);
            }
            Some(slots) => {
                for slot in slots {
                    let column = unify(slot, options.promotion.as_ref(), &labels)?;
                    visible.insert(column.name.clone(), unified.len());
                    unified.push(column);
                }
            }
        }
    }

    let sizes = if group_count == 0 {
        Vec::new()
    } else {
        resolve_sizes(&unified, group_count, &labels)?
    };
    if let Some(g) = sizes.iter().position(|&s| s != 1) {
        log::warn!(
            "`summarise()` produced {} rows for group {}; summaries are usually one row per group",
            sizes[g],
            g + 1
        );
    }

    let mut unified: Vec<Option<UnifiedColumn>> = unified.into_iter().map(Some).collect();
    let mut columns = IndexMap::with_capacity(visible.len());
    for (name, idx) in visible {
        let Some(column) = unified.get_mut(idx).and_then(Option::take) else {
            continue;
        };
        let values = if group_count == 0 {
            Vector::empty(column.data_type)
        } else {
            recycle(column, &sizes)?
        };
        columns.insert(name, values);
    }

    let table = build_output(data, columns, &sizes)?;
    let grouping = resolve_groups(data.variant(), options.groups, &sizes)?;
    let message = grouping_message(options, &grouping);
    if let Some(message) = &message {
        log::info!("{message}");
    }
    log::debug!(
        "summarised {group_count} groups into {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );

    Ok(Summary {
        table,
        grouping,
        sizes,
        message,
    })
}

fn evaluate_groups(
    data: &GroupedTable,
    entries: &[ExpandedEntry],
    parallel: bool,
) -> SummariseResult<Vec<Vec<EntryResult>>> {
    if parallel && data.group_count() > 1 {
        if let Some(results) = evaluate_parallel(data, entries) {
            // Collected in group order, so the first failing group is the one reported.
            return results.into_iter().collect();
        }
    }
    (0..data.group_count())
        .map(|g| evaluate_group(entries, Scope::for_group(data, g)))
        .collect()
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn evaluate_parallel(
    data: &GroupedTable,
    entries: &[ExpandedEntry],
) -> Option<Vec<SummariseResult<Vec<EntryResult>>>> {
    use rayon::prelude::*;

    let pool = crate::parallel::group_pool()?;
    Some(pool.install(|| {
        (0..data.group_count())
            .into_par_iter()
            .map(|g| evaluate_group(entries, Scope::for_group(data, g)))
            .collect()
    }))
}

#[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
fn evaluate_parallel(
    _data: &GroupedTable,
    _entries: &[ExpandedEntry],
) -> Option<Vec<SummariseResult<Vec<EntryResult>>>> {
    None
}

fn grouping_message(options: &SummariseOptions, grouping: &GroupingVariant) -> Option<String> {
    if options.groups != GroupsOption::Unspecified
        || !options.inform
        || options.caller != CallerContext::Interactive
    {
        return None;
    }
    let (kind, keys) = match grouping {
        GroupingVariant::Ungrouped => return None,
        GroupingVariant::Grouped { keys } | GroupingVariant::Rowwise { keys }
            if keys.is_empty() =>
        {
            return None
        }
        GroupingVariant::Grouped { keys } => ("grouped", keys),
        GroupingVariant::Rowwise { keys } => ("row-grouped", keys),
    };
    let keys = keys
        .iter()
        .map(|k| format!("'{k}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "`summarise()` has {kind} output by {keys}. You can override using the `.groups` argument."
    ))
}
