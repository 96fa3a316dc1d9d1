//! Line segments and nearest-point queries.

use super::vector::Point3;

/// Result of a nearest-point query against a segment.
///
/// `within` reports whether the foot of the perpendicular falls inside the
/// segment; when it does not, `point` is the nearest segment endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointHit {
    pub point: Point3,
    pub distance: f64,
    within: bool,
}

impl PointHit {
    /// True when the query point projects onto the segment interior.
    #[inline]
    pub fn hit(&self) -> bool {
        self.within
    }
}

/// A directed line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    #[inline]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Direction vector (not normalised).
    #[inline]
    pub fn vec(&self) -> Point3 {
        self.end - self.start
    }

    /// Segment length.
    #[inline]
    pub fn mag(&self) -> f64 {
        self.vec().mag()
    }

    /// Point at normalised parameter `t` (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.start + self.vec() * t
    }

    /// Normalised parameter of the foot of the perpendicular from `p`.
    ///
    /// Unclamped: values outside [0,1] mean the foot lies beyond the
    /// segment ends. Degenerate segments yield 0.
    #[inline]
    pub fn param_of(&self, p: Point3) -> f64 {
        let v = self.vec();
        let den = v.mag_sqr();
        if den > f64::MIN_POSITIVE {
            (p - self.start).dot(v) / den
        } else {
            0.0
        }
    }

    /// Nearest point on the segment to `p`.
    pub fn nearest_dist(&self, p: Point3) -> PointHit {
        let t = self.param_of(p);
        if (0.0..=1.0).contains(&t) {
            let foot = self.point_at(t);
            PointHit {
                point: foot,
                distance: foot.dist(p),
                within: true,
            }
        } else {
            let nearest = if t < 0.0 { self.start } else { self.end };
            PointHit {
                point: nearest,
                distance: nearest.dist(p),
                within: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_inside_and_outside() {
        let l = Line::new(Point3::ZERO, Point3::new(2.0, 0.0, 0.0));
        let hit = l.nearest_dist(Point3::new(1.0, 1.0, 0.0));
        assert!(hit.hit());
        assert_eq!(hit.point, Point3::new(1.0, 0.0, 0.0));
        assert!((hit.distance - 1.0).abs() < 1e-15);

        let miss = l.nearest_dist(Point3::new(3.0, 0.0, 0.0));
        assert!(!miss.hit());
        assert_eq!(miss.point, Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn param_of_endpoints() {
        let l = Line::new(Point3::ZERO, Point3::new(0.0, 4.0, 0.0));
        assert_eq!(l.param_of(Point3::ZERO), 0.0);
        assert_eq!(l.param_of(Point3::new(0.0, 4.0, 0.0)), 1.0);
        assert_eq!(l.param_of(Point3::new(0.0, 1.0, 0.0)), 0.25);
    }
}
