//! Typed columnar values for grouped summaries.
//!
//! This crate provides:
//! - [`Vector`], a typed nullable column with a widening cast lattice,
//! - [`TypePromotion`], the pluggable rule for finding the common type of independently computed
//!   vectors,
//! - [`Table`] and [`GroupedTable`], the tables and grouping partitions consumed by
//!   `frame-summarise`.

#![forbid(unsafe_code)]

mod error;
mod grouping;
mod table;
mod types;
mod vector;

pub use crate::error::{ColumnarError, ColumnarResult};
pub use crate::grouping::{Group, GroupedTable, GroupingVariant};
pub use crate::table::Table;
pub use crate::types::{DataType, DefaultPromotion, StrictPromotion, TypePromotion, Value};
pub use crate::vector::Vector;
