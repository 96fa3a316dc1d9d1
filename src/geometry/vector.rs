//! 3-D point/vector type used by all geometric predicates.
//!
//! A single `f64` triple serves as both position and direction; the
//! distinction is carried by context, as is usual in mesh codes. All
//! operations are plain IEEE arithmetic with no hidden tolerancing, so
//! repeated evaluation over unchanged inputs is bitwise reproducible.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A point or vector in 3-D space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Directions and displacements use the same representation as positions.
pub type Vector3 = Point3;

impl Point3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Squared magnitude.
    #[inline]
    pub fn mag_sqr(self) -> f64 {
        self.dot(self)
    }

    /// Magnitude.
    #[inline]
    pub fn mag(self) -> f64 {
        self.mag_sqr().sqrt()
    }

    /// Distance to another point.
    #[inline]
    pub fn dist(self, other: Self) -> f64 {
        (other - self).mag()
    }

    /// Unit vector in the same direction, or `None` for a (near-)zero
    /// vector. The caller decides what a degenerate direction means.
    #[inline]
    pub fn normalized(self) -> Option<Self> {
        let m = self.mag();
        (m > f64::MIN_POSITIVE).then(|| self / m)
    }

    /// Midpoint between two points.
    #[inline]
    pub fn mid(self, other: Self) -> Self {
        (self + other) * 0.5
    }

    /// Linear interpolation from `self` towards `target`.
    #[inline]
    pub fn lerp(self, target: Self, f: f64) -> Self {
        self + (target - self) * f
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min_components(self, other: Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max_components(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }
}

impl Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Point3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Point3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Point3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned bounding box, used to prune edge-pair candidates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundBox {
    /// Box spanning two points (in any order).
    #[inline]
    pub fn spanning(a: Point3, b: Point3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Grow the box by `margin` in every direction.
    #[inline]
    pub fn inflated(self, margin: f64) -> Self {
        let d = Point3::new(margin, margin, margin);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// True when the boxes share any volume (closed comparison).
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// True when `p` lies inside or on the box.
    #[inline]
    pub fn contains(&self, p: Point3) -> bool {
        self.min.x <= p.x
            && p.x <= self.max.x
            && self.min.y <= p.y
            && p.y <= self.max.y
            && self.min.z <= p.z
            && p.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_orthogonal() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-2.0, 0.5, 4.0);
        let c = a.cross(b);
        assert!(c.dot(a).abs() < 1e-12);
        assert!(c.dot(b).abs() < 1e-12);
    }

    #[test]
    fn normalized_zero_is_none() {
        assert!(Point3::ZERO.normalized().is_none());
        let n = Point3::new(0.0, 0.0, 2.0).normalized().unwrap();
        assert_eq!(n, Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(3.0, 5.0, -1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), a.mid(b));
    }

    #[test]
    fn boundbox_overlap() {
        let a = BoundBox::spanning(Point3::ZERO, Point3::new(1.0, 1.0, 1.0));
        let b = BoundBox::spanning(Point3::new(0.9, 0.9, 0.9), Point3::new(2.0, 2.0, 2.0));
        let c = BoundBox::spanning(Point3::new(1.5, 1.5, 1.5), Point3::new(2.0, 2.0, 2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.inflated(0.6).overlaps(&c));
    }
}
