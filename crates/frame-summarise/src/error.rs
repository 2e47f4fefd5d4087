use frame_columnar::ColumnarError;
use std::fmt;

pub type SummariseResult<T> = Result<T, SummariseError>;

/// Phase of the summary an error is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Computing,
    Recycling,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Computing => "computing",
            Stage::Recycling => "recycling",
        })
    }
}

/// Failure raised by an [`crate::Expression`] while it evaluates against one group.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("object `{0}` not found")]
    UnknownName(String),

    #[error("could not find function `{0}`")]
    UnknownFunction(String),

    #[error("`{function}()` takes {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("type error: {0}")]
    Type(String),

    #[error("{0}")]
    Eval(String),

    #[error(transparent)]
    Columnar(#[from] ColumnarError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SummariseError {
    #[error("problem while computing `{entry}`{}: {source}", in_group(.group))]
    Evaluation {
        entry: String,
        group: Option<String>,
        source: ExprError,
    },

    #[error("problem while computing `{entry}`{}: `{entry}` must be a vector, not {kind}", in_group(.group))]
    UnsupportedResultKind {
        entry: String,
        kind: String,
        group: Option<String>,
    },

    #[error(
        "problem while computing `{entry}`: `{entry}` must return compatible vectors across groups; can't combine {}<{previous}> and {}<{actual}>",
        group_prefix(.previous_group),
        group_prefix(.group)
    )]
    IncompatibleCombine {
        entry: String,
        previous: String,
        previous_group: Option<String>,
        actual: String,
        group: Option<String>,
    },

    #[error(
        "problem while computing `{entry}`: `{entry}` must return compatible vectors across groups; {} returned no result while other groups returned a data frame",
        group_or_input(.group)
    )]
    MixedNull { entry: String, group: Option<String> },

    #[error("problem while recycling `{entry}`{}: `{entry}` must be size {expected} or 1, not {actual}", in_group(.group))]
    SizeMismatch {
        entry: String,
        expected: usize,
        actual: usize,
        group: Option<String>,
    },

    #[error("invalid `.groups` value {value:?}: {reason}")]
    InvalidGroupingOption { value: String, reason: String },

    #[error("problem while expanding entry {entry}: {reason}")]
    Expansion { entry: usize, reason: String },

    #[error(transparent)]
    Columnar(#[from] ColumnarError),
}

impl SummariseError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SummariseError::Evaluation { .. }
            | SummariseError::UnsupportedResultKind { .. }
            | SummariseError::IncompatibleCombine { .. }
            | SummariseError::MixedNull { .. } => Some(Stage::Computing),
            SummariseError::SizeMismatch { .. } => Some(Stage::Recycling),
            SummariseError::InvalidGroupingOption { .. }
            | SummariseError::Expansion { .. }
            | SummariseError::Columnar(_) => None,
        }
    }

    /// Display name of the entry the error is attributed to, if any.
    pub fn entry(&self) -> Option<&str> {
        match self {
            SummariseError::Evaluation { entry, .. }
            | SummariseError::UnsupportedResultKind { entry, .. }
            | SummariseError::IncompatibleCombine { entry, .. }
            | SummariseError::MixedNull { entry, .. }
            | SummariseError::SizeMismatch { entry, .. } => Some(entry),
            SummariseError::InvalidGroupingOption { .. }
            | SummariseError::Expansion { .. }
            | SummariseError::Columnar(_) => None,
        }
    }

    /// Label of the group the error is attributed to, if any.
    pub fn group(&self) -> Option<&str> {
        match self {
            SummariseError::Evaluation { group, .. }
            | SummariseError::UnsupportedResultKind { group, .. }
            | SummariseError::IncompatibleCombine { group, .. }
            | SummariseError::MixedNull { group, .. }
            | SummariseError::SizeMismatch { group, .. } => group.as_deref(),
            SummariseError::InvalidGroupingOption { .. }
            | SummariseError::Expansion { .. }
            | SummariseError::Columnar(_) => None,
        }
    }

    /// Render the error as a headline followed by detail bullets.
    pub fn bullets(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self {
            SummariseError::Evaluation {
                entry,
                group,
                source,
            } => {
                out.push(format!("Problem while computing `{entry}`."));
                out.push(format!("Caused by error: {source}"));
                push_group(&mut out, group);
            }
            SummariseError::UnsupportedResultKind { entry, kind, group } => {
                out.push(format!("Problem while computing `{entry}`."));
                out.push(format!("`{entry}` must be a vector, not {kind}."));
                push_group(&mut out, group);
            }
            SummariseError::IncompatibleCombine {
                entry,
                previous,
                previous_group,
                actual,
                group,
            } => {
                out.push(format!("Problem while computing `{entry}`."));
                out.push(format!(
                    "`{entry}` must return compatible vectors across groups."
                ));
                out.push(format!(
                    "Result of type <{previous}> for {}.",
                    group_or_input(previous_group)
                ));
                out.push(format!(
                    "Result of type <{actual}> for {}.",
                    group_or_input(group)
                ));
            }
            SummariseError::MixedNull { entry, group } => {
                out.push(format!("Problem while computing `{entry}`."));
                out.push(format!(
                    "`{entry}` must return compatible vectors across groups."
                ));
                out.push("Can't combine empty results with data frame results.".to_string());
                push_group(&mut out, group);
            }
            SummariseError::SizeMismatch {
                entry,
                expected,
                actual,
                group,
            } => {
                out.push(format!("Problem while recycling `{entry}`."));
                out.push(format!("`{entry}` must be size {expected} or 1, not {actual}."));
                push_group(&mut out, group);
            }
            SummariseError::InvalidGroupingOption { value, reason } => {
                out.push(format!("Invalid `.groups` value {value:?}."));
                out.push(reason.clone());
            }
            SummariseError::Expansion { entry, reason } => {
                out.push(format!("Problem while expanding entry {entry}."));
                out.push(reason.clone());
            }
            SummariseError::Columnar(err) => out.push(err.to_string()),
        }
        out
    }
}

fn push_group(out: &mut Vec<String>, group: &Option<String>) {
    if let Some(group) = group {
        out.push(format!("The error occurred in {group}."));
    }
}

fn in_group(group: &Option<String>) -> String {
    group
        .as_ref()
        .map(|g| format!(" in {g}"))
        .unwrap_or_default()
}

fn group_prefix(group: &Option<String>) -> String {
    group
        .as_ref()
        .map(|g| format!("{g} "))
        .unwrap_or_default()
}

fn group_or_input(group: &Option<String>) -> String {
    group.clone().unwrap_or_else(|| "the input".to_string())
}
