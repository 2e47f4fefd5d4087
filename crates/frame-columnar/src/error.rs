use crate::types::DataType;

pub type ColumnarResult<T> = Result<T, ColumnarError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnarError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("can't cast <{from}> to <{to}>")]
    InvalidCast { from: DataType, to: DataType },

    #[error("can't recycle a vector of size {actual} to size {target}")]
    InvalidBroadcast { actual: usize, target: usize },

    #[error("invalid grouping partition: {0}")]
    InvalidPartition(String),
}
