//! Output grouping policy.
use crate::error::{SummariseError, SummariseResult};
use frame_columnar::GroupingVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the grouping of the input carries over to the summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupsOption {
    /// Drop the last grouping key.
    DropLast,
    /// Drop every grouping key.
    Drop,
    /// Keep the input keys.
    Keep,
    /// Make every output row its own group.
    Rowwise,
    /// `DropLast` when every group produced exactly one row, `Keep` otherwise.
    #[default]
    Unspecified,
}

impl GroupsOption {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupsOption::DropLast => "drop_last",
            GroupsOption::Drop => "drop",
            GroupsOption::Keep => "keep",
            GroupsOption::Rowwise => "rowwise",
            GroupsOption::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for GroupsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupsOption {
    type Err = SummariseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop_last" => Ok(GroupsOption::DropLast),
            "drop" => Ok(GroupsOption::Drop),
            "keep" => Ok(GroupsOption::Keep),
            "rowwise" => Ok(GroupsOption::Rowwise),
            "unspecified" => Ok(GroupsOption::Unspecified),
            other => Err(SummariseError::InvalidGroupingOption {
                value: other.to_string(),
                reason: "must be one of \"drop_last\", \"drop\", \"keep\" or \"rowwise\"".into(),
            }),
        }
    }
}

/// Pick the output grouping variant for a summary of `input` whose groups resolved to `sizes`.
pub fn resolve_groups(
    input: &GroupingVariant,
    option: GroupsOption,
    sizes: &[usize],
) -> SummariseResult<GroupingVariant> {
    let option = match option {
        GroupsOption::Unspecified if sizes.iter().all(|&s| s == 1) => GroupsOption::DropLast,
        GroupsOption::Unspecified => GroupsOption::Keep,
        other => other,
    };

    let resolved = match (input, option) {
        (GroupingVariant::Ungrouped, GroupsOption::Rowwise) => {
            GroupingVariant::Rowwise { keys: Vec::new() }
        }
        (GroupingVariant::Ungrouped, _) => GroupingVariant::Ungrouped,

        (GroupingVariant::Grouped { keys }, GroupsOption::DropLast) if keys.len() > 1 => {
            GroupingVariant::Grouped {
                keys: keys[..keys.len() - 1].to_vec(),
            }
        }
        (GroupingVariant::Grouped { .. }, GroupsOption::DropLast | GroupsOption::Drop) => {
            GroupingVariant::Ungrouped
        }
        (GroupingVariant::Grouped { keys }, GroupsOption::Keep | GroupsOption::Unspecified) => {
            GroupingVariant::Grouped { keys: keys.clone() }
        }
        (GroupingVariant::Grouped { keys }, GroupsOption::Rowwise) => {
            GroupingVariant::Rowwise { keys: keys.clone() }
        }

        (GroupingVariant::Rowwise { .. }, GroupsOption::Drop) => {
            return Err(SummariseError::InvalidGroupingOption {
                value: option.to_string(),
                reason: "row-grouped input only supports \"keep\" and \"rowwise\"".into(),
            })
        }
        (GroupingVariant::Rowwise { keys }, GroupsOption::Rowwise) => {
            GroupingVariant::Rowwise { keys: keys.clone() }
        }
        (GroupingVariant::Rowwise { keys }, _) => GroupingVariant::Grouped { keys: keys.clone() },
    };
    // A grouping with no keys is a single group.
    Ok(match resolved {
        GroupingVariant::Grouped { keys } if keys.is_empty() => GroupingVariant::Ungrouped,
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_policy_name() {
        for option in [
            GroupsOption::DropLast,
            GroupsOption::Drop,
            GroupsOption::Keep,
            GroupsOption::Rowwise,
            GroupsOption::Unspecified,
        ] {
            assert_eq!(option.as_str().parse::<GroupsOption>().unwrap(), option);
        }
    }

    #[test]
    fn rejects_unknown_policy_names() {
        let err = "drop_first".parse::<GroupsOption>().unwrap_err();
        assert!(matches!(
            err,
            SummariseError::InvalidGroupingOption { ref value, .. } if value == "drop_first"
        ));
    }

    #[test]
    fn unspecified_keeps_groups_for_multi_row_summaries() {
        let input = GroupingVariant::Grouped {
            keys: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            resolve_groups(&input, GroupsOption::Unspecified, &[1, 1]).unwrap(),
            GroupingVariant::Grouped {
                keys: vec!["a".into()]
            }
        );
        assert_eq!(
            resolve_groups(&input, GroupsOption::Unspecified, &[1, 2]).unwrap(),
            input
        );
    }

    #[test]
    fn keyless_rowwise_input_leaves_grouping() {
        let input = GroupingVariant::Rowwise { keys: Vec::new() };
        for option in [
            GroupsOption::Unspecified,
            GroupsOption::DropLast,
            GroupsOption::Keep,
        ] {
            assert_eq!(
                resolve_groups(&input, option, &[1, 2]).unwrap(),
                GroupingVariant::Ungrouped
            );
        }
        assert_eq!(
            resolve_groups(&input, GroupsOption::Rowwise, &[1]).unwrap(),
            input
        );
    }
}
