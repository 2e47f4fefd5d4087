use ordered_float::OrderedFloat;
use std::fmt;
use std::sync::Arc;

/// Logical type of a [`crate::Vector`].
///
/// `Null` is the type of a vector that only holds missing values and has not been given a more
/// specific type yet; it promotes into every other type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Double,
    Text,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Double => "double",
            DataType::Text => "text",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Boolean | DataType::Integer | DataType::Double)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common-type rule used when values computed independently have to share one column.
///
/// Implementations must be symmetric and return `Some(a)` for `common_type(a, a)`. Returning
/// `None` means the two types cannot be combined.
pub trait TypePromotion: fmt::Debug + Send + Sync {
    fn common_type(&self, left: DataType, right: DataType) -> Option<DataType>;

    /// Fold [`TypePromotion::common_type`] over a sequence of types, starting from
    /// [`DataType::Null`].
    fn common_type_of(&self, types: &mut dyn Iterator<Item = DataType>) -> Option<DataType> {
        let mut acc = DataType::Null;
        for ty in types {
            acc = self.common_type(acc, ty)?;
        }
        Some(acc)
    }
}

/// Lattice `Null < Boolean < Integer < Double`, with `Text` only combinable with `Null` and
/// itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultPromotion;

impl TypePromotion for DefaultPromotion {
    fn common_type(&self, left: DataType, right: DataType) -> Option<DataType> {
        match (left, right) {
            (a, b) if a == b => Some(a),
            (DataType::Null, other) | (other, DataType::Null) => Some(other),
            (a, b) if a.is_numeric() && b.is_numeric() => Some(a.max(b)),
            _ => None,
        }
    }
}

/// Only allows identical types, plus filling missing (`Null`) chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrictPromotion;

impl TypePromotion for StrictPromotion {
    fn common_type(&self, left: DataType, right: DataType) -> Option<DataType> {
        match (left, right) {
            (a, b) if a == b => Some(a),
            (DataType::Null, other) | (other, DataType::Null) => Some(other),
            _ => None,
        }
    }
}

/// A single scalar cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(OrderedFloat<f64>),
    Text(Arc<str>),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Double(_) => DataType::Double,
            Value::Text(_) => DataType::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value the way it would be written as a literal (text is quoted).
    pub fn to_literal(&self) -> String {
        match self {
            Value::Text(s) => format!("{:?}", s.as_ref()),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NA"),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{}", v.0),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
