//! Cross-group type unification.
//!
//! Every group produces its chunk for an entry independently; before the chunks can become one
//! output column they must agree on a common type under the configured [`TypePromotion`].
use crate::error::{SummariseError, SummariseResult};
use crate::evaluator::EntryResult;
use crate::expand::ExpandedEntry;
use frame_columnar::{DataType, TypePromotion, Vector};

/// One output column's per-group chunks. `None` marks a group that produced nothing.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Slot {
    pub name: String,
    pub chunks: Vec<Option<Vector>>,
}

/// A slot whose chunks have all been cast to `data_type`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct UnifiedColumn {
    pub name: String,
    pub data_type: DataType,
    pub chunks: Vec<Option<Vector>>,
}

/// Turn one entry's per-group results into output slots.
///
/// Returns `None` when the entry produced nothing in every group.
pub(crate) fn collect_slots(
    entry: &ExpandedEntry,
    results: Vec<EntryResult>,
    labels: &[Option<String>],
) -> SummariseResult<Option<Vec<Slot>>> {
    let label = |g: usize| labels.get(g).cloned().flatten();

    let mut first_vector: Option<(usize, DataType)> = None;
    let mut first_fields: Option<(usize, Vec<String>)> = None;
    let mut first_empty: Option<usize> = None;
    for (g, result) in results.iter().enumerate() {
        match result {
            EntryResult::Empty => {
                first_empty.get_or_insert(g);
            }
            EntryResult::Vector(v) => {
                if let Some((fg, names)) = &first_fields {
                    return Err(SummariseError::IncompatibleCombine {
                        entry: entry.name.clone(),
                        previous: frame_kind(names),
                        previous_group: label(*fg),
                        actual: v.data_type().to_string(),
                        group: label(g),
                    });
                }
                first_vector.get_or_insert((g, v.data_type()));
            }
            EntryResult::Fields(fields) => {
                let names: Vec<String> = fields.iter().map(|(n, _)| n.clone()).collect();
                if let Some((vg, ty)) = first_vector {
                    return Err(SummariseError::IncompatibleCombine {
                        entry: entry.name.clone(),
                        previous: ty.to_string(),
                        previous_group: label(vg),
                        actual: frame_kind(&names),
                        group: label(g),
                    });
                }
                if let Some((fg, expected)) = &first_fields {
                    if *expected != names {
                        return Err(SummariseError::IncompatibleCombine {
                            entry: entry.name.clone(),
                            previous: frame_kind(expected),
                            previous_group: label(*fg),
                            actual: frame_kind(&names),
                            group: label(g),
                        });
                    }
                } else {
                    first_fields = Some((g, names));
                }
            }
        }
    }

    if let Some((_, names)) = first_fields {
        if let Some(g) = first_empty {
            return Err(SummariseError::MixedNull {
                entry: entry.name.clone(),
                group: label(g),
            });
        }
        let mut slots: Vec<Slot> = names
            .into_iter()
            .map(|name| Slot {
                name,
                chunks: Vec::with_capacity(results.len()),
            })
            .collect();
        for result in results {
            if let EntryResult::Fields(fields) = result {
                for (slot, (_, column)) in slots.iter_mut().zip(fields) {
                    slot.chunks.push(Some(column));
                }
            }
        }
        return Ok(Some(slots));
    }

    if first_vector.is_none() {
        return Ok(None);
    }
    let chunks = results
        .into_iter()
        .map(|result| match result {
            EntryResult::Vector(v) => Some(v),
            _ => None,
        })
        .collect();
    Ok(Some(vec![Slot {
        name: entry.name.clone(),
        chunks,
    }]))
}

/// Find the common type of a slot's chunks and cast every chunk to it.
pub(crate) fn unify(
    slot: Slot,
    promotion: &dyn TypePromotion,
    labels: &[Option<String>],
) -> SummariseResult<UnifiedColumn> {
    let label = |g: Option<usize>| g.and_then(|g| labels.get(g).cloned().flatten());

    let mut data_type = DataType::Null;
    let mut established_by: Option<usize> = None;
    for (g, chunk) in slot.chunks.iter().enumerate() {
        let Some(chunk) = chunk else {
            continue;
        };
        let ty = chunk.data_type();
        match promotion.common_type(data_type, ty) {
            Some(common) => {
                if common != data_type {
                    established_by = Some(g);
                }
                data_type = common;
            }
            None => {
                return Err(SummariseError::IncompatibleCombine {
                    entry: slot.name,
                    previous: data_type.to_string(),
                    previous_group: label(established_by),
                    actual: ty.to_string(),
                    group: label(Some(g)),
                })
            }
        }
    }

    let mut chunks = Vec::with_capacity(slot.chunks.len());
    for (g, chunk) in slot.chunks.into_iter().enumerate() {
        let cast = match chunk {
            Some(chunk) => Some(chunk.cast(data_type).map_err(|_| {
                SummariseError::IncompatibleCombine {
                    entry: slot.name.clone(),
                    previous: data_type.to_string(),
                    previous_group: label(established_by),
                    actual: chunk.data_type().to_string(),
                    group: label(Some(g)),
                }
            })?),
            None => None,
        };
        chunks.push(cast);
    }

    Ok(UnifiedColumn {
        name: slot.name,
        data_type,
        chunks,
    })
}

fn frame_kind(names: &[String]) -> String {
    format!("data frame ({})", names.join(", "))
}
