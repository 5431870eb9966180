use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single cell value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Real(f64),
    Str(String),
}

impl Value {
    /// Read the value at `index` of an Arrow array.
    ///
    /// Arrays of a type other than the three storage types are rendered as strings.
    pub fn from_array(array: &dyn Array, index: usize) -> Result<Self, TableError> {
        if index >= array.len() {
            return Err(tabula_range::RangeError::OutOfRange {
                index,
                size: array.len(),
            }
            .into());
        }
        if array.is_null(index) {
            return Ok(Value::Null);
        }
        let value = match array.data_type() {
            DataType::Int64 => Value::Int(array.as_primitive::<Int64Type>().value(index)),
            DataType::Float64 => Value::Real(array.as_primitive::<Float64Type>().value(index)),
            DataType::Utf8 => Value::Str(array.as_string::<i32>().value(index).to_string()),
            _ => Value::Str(array_value_to_string(array, index)?),
        };
        Ok(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
