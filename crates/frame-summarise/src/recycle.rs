//! Per-group size reconciliation.
use crate::error::{SummariseError, SummariseResult};
use crate::unify::UnifiedColumn;
use frame_columnar::Vector;

/// Decide the output row count of every group.
///
/// Within a group the first chunk whose size is neither 0 nor 1 sets the target; every other
/// chunk must match it or have size 1 (broadcast) or 0 (filled with missing values). When no
/// chunk sets a target the group yields one row if any chunk has size 1, and zero rows otherwise.
pub(crate) fn resolve_sizes(
    columns: &[UnifiedColumn],
    group_count: usize,
    labels: &[Option<String>],
) -> SummariseResult<Vec<usize>> {
    let mut sizes = Vec::with_capacity(group_count);
    for g in 0..group_count {
        let mut target: Option<usize> = None;
        let mut saw_scalar = false;
        for column in columns {
            let len = column
                .chunks
                .get(g)
                .and_then(Option::as_ref)
                .map_or(0, Vector::len);
            match (len, target) {
                (0, _) => {}
                (1, _) => saw_scalar = true,
                (n, None) => target = Some(n),
                (n, Some(t)) if n == t => {}
                (n, Some(t)) => {
                    return Err(SummariseError::SizeMismatch {
                        entry: column.name.clone(),
                        expected: t,
                        actual: n,
                        group: labels.get(g).cloned().flatten(),
                    })
                }
            }
        }
        sizes.push(target.unwrap_or(usize::from(saw_scalar)));
    }
    Ok(sizes)
}

/// Expand a unified column's chunks to the resolved group sizes and concatenate them.
pub(crate) fn recycle(column: UnifiedColumn, sizes: &[usize]) -> SummariseResult<Vector> {
    let mut parts = Vec::with_capacity(sizes.len());
    for (chunk, &size) in column.chunks.into_iter().zip(sizes) {
        let part = match chunk {
            Some(chunk) if chunk.len() == size => chunk,
            Some(chunk) if chunk.len() == 1 => chunk.broadcast(size)?,
            _ => Vector::missing(column.data_type, size),
        };
        parts.push(part);
    }
    Ok(Vector::concat(column.data_type, &parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_columnar::DataType;
    use pretty_assertions::assert_eq;

    fn column(name: &str, chunks: Vec<Option<Vector>>) -> UnifiedColumn {
        UnifiedColumn {
            name: name.to_string(),
            data_type: DataType::Integer,
            chunks,
        }
    }

    fn ints(n: usize) -> Option<Vector> {
        Some(Vector::from((0..n as i64).collect::<Vec<_>>()))
    }

    #[test]
    fn first_non_scalar_size_wins() {
        let columns = vec![
            column("a", vec![ints(1), ints(0), None]),
            column("b", vec![ints(3), ints(1), None]),
        ];
        let labels = vec![None, None, None];
        assert_eq!(resolve_sizes(&columns, 3, &labels).unwrap(), vec![3, 1, 0]);
    }

    #[test]
    fn mismatch_blames_the_disagreeing_entry() {
        let columns = vec![
            column("a", vec![ints(2)]),
            column("b", vec![ints(1)]),
            column("c", vec![ints(3)]),
        ];
        let labels = vec![Some("group 1: `g = 1`".to_string())];
        let err = resolve_sizes(&columns, 1, &labels).unwrap_err();
        assert_eq!(
            err,
            SummariseError::SizeMismatch {
                entry: "c".into(),
                expected: 2,
                actual: 3,
                group: Some("group 1: `g = 1`".into()),
            }
        );
    }

    #[test]
    fn recycle_broadcasts_and_fills() {
        let col = column("a", vec![Some(Vector::from(vec![7_i64])), None, ints(2)]);
        let out = recycle(col, &[2, 1, 2]).unwrap();
        assert_eq!(
            out,
            Vector::Integer(vec![Some(7), Some(7), None, Some(0), Some(1)])
        );
    }
}
