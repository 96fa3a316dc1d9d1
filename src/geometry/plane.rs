//! Cutting planes.

use super::line::Line;
use super::vector::Point3;

/// An infinite plane described by a unit normal and a reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: Point3,
    ref_point: Point3,
}

impl Plane {
    /// Plane through three points. `None` when the points are (nearly)
    /// collinear and no unique plane exists.
    pub fn through_points(a: Point3, b: Point3, c: Point3) -> Option<Self> {
        let normal = (b - a).cross(c - a).normalized()?;
        Some(Self {
            normal,
            ref_point: a,
        })
    }

    /// Unit normal.
    #[inline]
    pub fn normal(&self) -> Point3 {
        self.normal
    }

    /// Signed distance from `p` to the plane.
    #[inline]
    pub fn signed_distance(&self, p: Point3) -> f64 {
        (p - self.ref_point).dot(self.normal)
    }

    /// Normalised cut fraction at which `line` crosses the plane.
    ///
    /// `None` when the line is (nearly) parallel to the plane. The
    /// fraction is unclamped; range checks are the caller's concern.
    pub fn cut_fraction(&self, line: &Line) -> Option<f64> {
        let den = line.vec().dot(self.normal);
        if den.abs() > f64::MIN_POSITIVE {
            Some((self.ref_point - line.start).dot(self.normal) / den)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn through_collinear_is_none() {
        let a = Point3::ZERO;
        let b = Point3::new(1.0, 1.0, 0.0);
        let c = Point3::new(2.0, 2.0, 0.0);
        assert!(Plane::through_points(a, b, c).is_none());
    }

    #[test]
    fn cut_fraction_midplane() {
        // z = 1 plane, segment from z=0 to z=2: cut at t = 0.5
        let plane = Plane::through_points(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        let line = Line::new(Point3::ZERO, Point3::new(0.0, 0.0, 2.0));
        let t = plane.cut_fraction(&line).unwrap();
        assert!((t - 0.5).abs() < 1e-15);
    }

    #[test]
    fn parallel_line_is_none() {
        let plane = Plane::through_points(
            Point3::ZERO,
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let line = Line::new(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0));
        assert!(plane.cut_fraction(&line).is_none());
    }
}
