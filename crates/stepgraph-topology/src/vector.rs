//! Planar vectors for vertex positions and layout forces.
//!
//! Positions are only consumed by renderers; nothing recorded during an
//! algorithm run depends on them.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A point or displacement in the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle from the positive x axis, in radians.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Distance between two points.
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Impulse pushing `self` away from `source` when closer than `spacing`,
    /// and pulling it toward `source` when farther.
    ///
    /// The force grows with the cube of the spacing error and saturates at
    /// `strength`.
    pub fn repulse(&self, source: &Self, spacing: f64, strength: f64) -> Self {
        let delta = *source - *self;
        let a = delta.angle();
        let dist = delta.magnitude();
        let d = constrain((spacing - dist).powi(3) / 1_000_000.0, -1.0, 1.0) * strength;
        Self {
            x: -a.cos() * d,
            y: -a.sin() * d,
        }
    }
}

/// Clamp `x` into `[min, max]`.
#[inline]
pub fn constrain(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

impl Add for Vector2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vector2 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for Vector2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    #[inline]
    fn mul(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
