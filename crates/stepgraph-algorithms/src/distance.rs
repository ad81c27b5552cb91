//! Path lengths with an explicit infinity.

use std::fmt;

use stepgraph_core::{CellValue, Value};

/// A path length that may be unbounded.
///
/// `Finite` sorts before `Infinite`, and adding anything to `Infinite`
/// stays `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Distance {
    Finite(i64),
    #[default]
    Infinite,
}

impl Distance {
    /// Zero-length path.
    pub const ZERO: Self = Distance::Finite(0);

    /// Extend the path by an edge of weight `weight`.
    pub fn plus(self, weight: i64) -> Self {
        match self {
            Distance::Finite(d) => Distance::Finite(d.saturating_add(weight)),
            Distance::Infinite => Distance::Infinite,
        }
    }

    /// Concatenate two paths.
    pub fn join(self, other: Self) -> Self {
        match other {
            Distance::Finite(w) => self.plus(w),
            Distance::Infinite => Distance::Infinite,
        }
    }

    /// Whether a path exists.
    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// The finite length, if any.
    pub fn finite(&self) -> Option<i64> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Infinite => None,
        }
    }
}

impl From<i64> for Distance {
    fn from(d: i64) -> Self {
        Distance::Finite(d)
    }
}

impl CellValue for Distance {
    fn to_value(&self) -> Value {
        match self {
            Distance::Finite(d) => Value::Int(*d),
            Distance::Infinite => Value::Infinity,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Infinite => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Distance::Finite(i64::MAX) < Distance::Infinite);
        assert!(Distance::Finite(-5) < Distance::Finite(3));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Distance::ZERO.plus(4).plus(-1), Distance::Finite(3));
        assert_eq!(Distance::Infinite.plus(-100), Distance::Infinite);
        assert_eq!(Distance::Finite(2).join(Distance::Finite(5)), Distance::Finite(7));
        assert_eq!(Distance::Finite(2).join(Distance::Infinite), Distance::Infinite);
    }

    #[test]
    fn cell_values() {
        assert_eq!(Distance::Finite(-2).to_value(), Value::Int(-2));
        assert_eq!(Distance::Infinite.to_value(), Value::Infinity);
        assert_eq!(Distance::Infinite.to_string(), "∞");
        assert_eq!(Distance::Finite(9).finite(), Some(9));
    }
}
