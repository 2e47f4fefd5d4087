//! Grouped summaries over [`frame_columnar`] tables.
//!
//! [`summarise`] evaluates an ordered list of [`Entry`] values against every group of a
//! [`frame_columnar::GroupedTable`], unifies each entry's per-group results to a common type,
//! reconciles per-group sizes and assembles the output table together with the grouping it should
//! carry.

#![forbid(unsafe_code)]

mod error;
mod evaluator;
mod expand;
mod expr;
mod functions;
mod groups;
mod options;
mod output;
mod parallel;
mod recycle;
mod scope;
mod summarise;
mod unify;

pub use crate::error::{ExprError, Stage, SummariseError, SummariseResult};
pub use crate::expand::{expand, Across, AcrossFn, ColumnSelector, Entry, EntrySpec, ExpandedEntry};
pub use crate::expr::{BinaryOp, Datum, Expr, ExprResult, Expression, FnExpression, UnaryOp};
pub use crate::groups::{resolve_groups, GroupsOption};
pub use crate::options::{CallerContext, SummariseOptions};
pub use crate::scope::Scope;
pub use crate::summarise::{summarise, Summary};
