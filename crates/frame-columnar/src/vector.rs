use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{DataType, DefaultPromotion, TypePromotion, Value};
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// A typed, nullable, variable-length column of values.
///
/// `None` entries are missing values. [`Vector::Null`] stores only a length: it is the untyped
/// all-missing vector produced before anything more specific is known.
#[derive(Clone, Debug, PartialEq)]
pub enum Vector {
    Null(usize),
    Boolean(Vec<Option<bool>>),
    Integer(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Text(Vec<Option<Arc<str>>>),
}

impl Vector {
    /// An all-missing vector of `len` values typed as `data_type`.
    pub fn missing(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::Null => Vector::Null(len),
            DataType::Boolean => Vector::Boolean(vec![None; len]),
            DataType::Integer => Vector::Integer(vec![None; len]),
            DataType::Double => Vector::Double(vec![None; len]),
            DataType::Text => Vector::Text(vec![None; len]),
        }
    }

    /// A zero-length vector of the given type.
    pub fn empty(data_type: DataType) -> Self {
        Self::missing(data_type, 0)
    }

    /// Build a vector from scalar values, inferring the common type with [`DefaultPromotion`].
    pub fn from_values(values: Vec<Value>) -> ColumnarResult<Self> {
        let mut data_type = DataType::Null;
        for value in &values {
            let ty = value.data_type();
            data_type = DefaultPromotion
                .common_type(data_type, ty)
                .ok_or(ColumnarError::InvalidCast {
                    from: ty,
                    to: data_type,
                })?;
        }

        let parts = values
            .into_iter()
            .map(Vector::from_value)
            .collect::<Vec<_>>();
        Vector::concat(data_type, &parts)
    }

    /// A length-1 vector holding `value`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Vector::Null(1),
            Value::Boolean(b) => Vector::Boolean(vec![Some(b)]),
            Value::Integer(i) => Vector::Integer(vec![Some(i)]),
            Value::Double(d) => Vector::Double(vec![Some(d.0)]),
            Value::Text(s) => Vector::Text(vec![Some(s)]),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Vector::Null(_) => DataType::Null,
            Vector::Boolean(_) => DataType::Boolean,
            Vector::Integer(_) => DataType::Integer,
            Vector::Double(_) => DataType::Double,
            Vector::Text(_) => DataType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Null(n) => *n,
            Vector::Boolean(v) => v.len(),
            Vector::Integer(v) => v.len(),
            Vector::Double(v) => v.len(),
            Vector::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at `idx`, or `None` when out of range.
    pub fn get(&self, idx: usize) -> Option<Value> {
        if idx >= self.len() {
            return None;
        }
        Some(match self {
            Vector::Null(_) => Value::Null,
            Vector::Boolean(v) => v[idx].into(),
            Vector::Integer(v) => v[idx].into(),
            Vector::Double(v) => v[idx].map_or(Value::Null, |d| Value::Double(OrderedFloat(d))),
            Vector::Text(v) => v[idx].clone().map_or(Value::Null, Value::Text),
        })
    }

    pub fn is_missing(&self, idx: usize) -> bool {
        self.get(idx).map_or(true, |v| v.is_null())
    }

    pub fn null_count(&self) -> usize {
        match self {
            Vector::Null(n) => *n,
            Vector::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            Vector::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            Vector::Double(v) => v.iter().filter(|x| x.is_none()).count(),
            Vector::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |idx| self.get(idx))
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Gather rows by index. Out-of-range indices produce missing values.
    pub fn take(&self, indices: &[usize]) -> Self {
        fn gather<T: Clone>(values: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices
                .iter()
                .map(|&idx| values.get(idx).cloned().flatten())
                .collect()
        }

        match self {
            Vector::Null(_) => Vector::Null(indices.len()),
            Vector::Boolean(v) => Vector::Boolean(gather(v, indices)),
            Vector::Integer(v) => Vector::Integer(gather(v, indices)),
            Vector::Double(v) => Vector::Double(gather(v, indices)),
            Vector::Text(v) => Vector::Text(gather(v, indices)),
        }
    }

    /// Contiguous sub-range `[start, start + len)`, clamped to the vector bounds.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        let start = start.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        match self {
            Vector::Null(_) => Vector::Null(end - start),
            Vector::Boolean(v) => Vector::Boolean(v[start..end].to_vec()),
            Vector::Integer(v) => Vector::Integer(v[start..end].to_vec()),
            Vector::Double(v) => Vector::Double(v[start..end].to_vec()),
            Vector::Text(v) => Vector::Text(v[start..end].to_vec()),
        }
    }

    /// Recycle the vector to `target` values. Only length-1 vectors (or vectors already of the
    /// target length) can be recycled.
    pub fn broadcast(&self, target: usize) -> ColumnarResult<Self> {
        let len = self.len();
        if len == target {
            return Ok(self.clone());
        }
        if len != 1 {
            return Err(ColumnarError::InvalidBroadcast {
                actual: len,
                target,
            });
        }
        Ok(self.take(&vec![0; target]))
    }

    /// Cast to `to`, following the widening lattice `Null -> Boolean -> Integer -> Double`.
    ///
    /// `Null` vectors cast to every type; a vector holding only missing values may also be cast
    /// down to `Null`.
    pub fn cast(&self, to: DataType) -> ColumnarResult<Self> {
        let from = self.data_type();
        if from == to {
            return Ok(self.clone());
        }
        let out = match (self, to) {
            (Vector::Null(n), to) => Vector::missing(to, *n),
            (Vector::Boolean(v), DataType::Integer) => {
                Vector::Integer(v.iter().map(|b| b.map(i64::from)).collect())
            }
            (Vector::Boolean(v), DataType::Double) => Vector::Double(
                v.iter()
                    .map(|b| b.map(|b| if b { 1.0 } else { 0.0 }))
                    .collect(),
            ),
            (Vector::Integer(v), DataType::Double) => {
                Vector::Double(v.iter().map(|i| i.map(|i| i as f64)).collect())
            }
            (v, DataType::Null) if v.null_count() == v.len() => Vector::Null(v.len()),
            _ => return Err(ColumnarError::InvalidCast { from, to }),
        };
        Ok(out)
    }

    /// Render every value as text. Missing values stay missing.
    pub fn to_text(&self) -> Self {
        Vector::Text(
            self.iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::Text(s) => Some(s),
                    other => Some(Arc::from(other.to_string())),
                })
                .collect(),
        )
    }

    /// Concatenate `parts` after casting each one to `data_type`.
    pub fn concat(data_type: DataType, parts: &[Vector]) -> ColumnarResult<Self> {
        let mut out = Vector::empty(data_type);
        for part in parts {
            out.append(part.cast(data_type)?);
        }
        Ok(out)
    }

    fn append(&mut self, other: Vector) {
        match (self, other) {
            (Vector::Null(n), other) => *n += other.len(),
            (Vector::Boolean(a), Vector::Boolean(b)) => a.extend(b),
            (Vector::Integer(a), Vector::Integer(b)) => a.extend(b),
            (Vector::Double(a), Vector::Double(b)) => a.extend(b),
            (Vector::Text(a), Vector::Text(b)) => a.extend(b),
            _ => unreachable!("parts are cast to the output type before appending"),
        }
    }
}

impl From<Vec<bool>> for Vector {
    fn from(values: Vec<bool>) -> Self {
        Vector::Boolean(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<i64>> for Vector {
    fn from(values: Vec<i64>) -> Self {
        Vector::Integer(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Double(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for Vector {
    fn from(values: Vec<&str>) -> Self {
        Vector::Text(values.into_iter().map(|s| Some(Arc::from(s))).collect())
    }
}

impl From<Vec<String>> for Vector {
    fn from(values: Vec<String>) -> Self {
        Vector::Text(values.into_iter().map(|s| Some(Arc::from(s))).collect())
    }
}

impl From<Vec<Option<bool>>> for Vector {
    fn from(values: Vec<Option<bool>>) -> Self {
        Vector::Boolean(values)
    }
}

impl From<Vec<Option<i64>>> for Vector {
    fn from(values: Vec<Option<i64>>) -> Self {
        Vector::Integer(values)
    }
}

impl From<Vec<Option<f64>>> for Vector {
    fn from(values: Vec<Option<f64>>) -> Self {
        Vector::Double(values)
    }
}

impl From<Vec<Option<&str>>> for Vector {
    fn from(values: Vec<Option<&str>>) -> Self {
        Vector::Text(values.into_iter().map(|s| s.map(Arc::from)).collect())
    }
}
