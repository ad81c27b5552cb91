//! Dynamically typed table cells.
//!
//! Live tables are typed (`Table<T>`), but the event log and the replay
//! engine only see [`Value`], so any table can be rebuilt without knowing
//! the type the algorithm used.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A table cell as stored in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// Absent value (no parent, unvisited, ...)
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer (distances, indices, counters)
    Int(i64),
    /// Unbounded distance
    Infinity,
    /// Pair of optional integers (arrival/departure intervals)
    Pair(Option<i64>, Option<i64>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "∅"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Infinity => write!(f, "∞"),
            Value::Pair(a, b) => {
                write_optional(f, *a)?;
                write!(f, ",")?;
                write_optional(f, *b)
            }
        }
    }
}

fn write_optional(f: &mut fmt::Formatter<'_>, v: Option<i64>) -> fmt::Result {
    match v {
        Some(v) => write!(f, "{}", v),
        None => write!(f, "∅"),
    }
}

/// Default cell formatter.
pub fn display_plain(value: &Value) -> String {
    value.to_string()
}

/// Formatter that leaves absent cells blank.
pub fn display_blank_null(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Types that can live in a recorded table.
pub trait CellValue: Clone + fmt::Debug {
    /// Convert to the logged representation.
    fn to_value(&self) -> Value;
}

impl CellValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl CellValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl CellValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl CellValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl CellValue for u32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl CellValue for usize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }
}

impl<T: CellValue> CellValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl CellValue for (Option<usize>, Option<usize>) {
    fn to_value(&self) -> Value {
        Value::Pair(self.0.map(|v| v as i64), self.1.map(|v| v as i64))
    }
}
