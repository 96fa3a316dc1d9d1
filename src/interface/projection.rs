//! Point projection engine.
//!
//! Projects every slave-zone point onto the master surface with the
//! configured algorithm, producing one [`ProjectedPoint`] per slave-zone
//! local point index. A projection can miss (a normal ray that leaves the
//! master patch, a point no master face is oriented towards); the result
//! then falls back to the nearest master point and records the miss so
//! the match-type policy can decide whether the point is unmatched.
//!
//! The scan over candidate master faces is in ascending face order with
//! strict comparisons, so re-running over unchanged geometry returns
//! bit-identical results; there is no hidden tie-breaking.

use crate::geometry::Point3;
use crate::interface::config::ProjectionAlgorithm;
use crate::topology::patch::PrimitivePatch;

/// Result of projecting one slave point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    /// Position on the master surface.
    pub point: Point3,
    /// False when the algorithm missed and fell back to the nearest
    /// master point.
    pub hit: bool,
    /// How far the fallback lies from where the algorithm aimed; zero on
    /// a hit.
    pub miss_distance: f64,
}

impl ProjectedPoint {
    fn hit(point: Point3) -> Self {
        Self {
            point,
            hit: true,
            miss_distance: 0.0,
        }
    }

    fn miss(point: Point3, miss_distance: f64) -> Self {
        Self {
            point,
            hit: false,
            miss_distance,
        }
    }
}

/// Projects all slave patch points onto the master patch.
pub fn project_slave_points(
    master: &PrimitivePatch,
    slave: &PrimitivePatch,
    algorithm: ProjectionAlgorithm,
) -> Vec<ProjectedPoint> {
    let mut projected = Vec::with_capacity(slave.n_points());
    for pointi in 0..slave.n_points() {
        let p = slave.local_points()[pointi];
        let n = slave.point_normals()[pointi];
        let hit = match algorithm {
            ProjectionAlgorithm::Nearest => ProjectedPoint::hit(nearest(master, p)),
            ProjectionAlgorithm::Visible => visible(master, p),
            ProjectionAlgorithm::Direct => direct(master, p, n),
        };
        projected.push(hit);
    }
    projected
}

/// Nearest point on the master surface; ties resolved by lowest face index.
fn nearest(master: &PrimitivePatch, p: Point3) -> Point3 {
    let mut best: Option<(Point3, f64)> = None;
    for facei in 0..master.n_faces() {
        let (foot, dist) = master.nearest_on_face(facei, p);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((foot, dist));
        }
    }
    best.map(|(foot, _)| foot).unwrap_or(p)
}

/// Nearest point restricted to master faces whose normal faces `p`.
fn visible(master: &PrimitivePatch, p: Point3) -> ProjectedPoint {
    let mut best: Option<(Point3, f64)> = None;
    for facei in 0..master.n_faces() {
        let facing = (p - master.face_centres()[facei]).dot(master.face_areas()[facei]) > 0.0;
        if !facing {
            continue;
        }
        let (foot, dist) = master.nearest_on_face(facei, p);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((foot, dist));
        }
    }
    match best {
        Some((foot, _)) => ProjectedPoint::hit(foot),
        None => {
            let foot = nearest(master, p);
            log::trace!("projection: no master face visible from {p:?}");
            ProjectedPoint::miss(foot, foot.dist(p))
        }
    }
}

/// Projection of `p` along its point normal onto the master surface.
///
/// Among the faces whose plane is pierced inside the face, the one with
/// the smallest travel along the normal wins. A ray that pierces no face
/// is a miss; the recorded distance is how far the fallback point sits
/// off the ray line.
fn direct(master: &PrimitivePatch, p: Point3, normal: Point3) -> ProjectedPoint {
    let mut best: Option<(Point3, f64)> = None;
    for facei in 0..master.n_faces() {
        let area = master.face_areas()[facei];
        let face_normal = match area.normalized() {
            Some(n) => n,
            None => continue,
        };
        let den = normal.dot(face_normal);
        if den.abs() <= f64::MIN_POSITIVE {
            continue;
        }
        let t = (master.face_centres()[facei] - p).dot(face_normal) / den;
        let foot = p + normal * t;
        let scale = area.mag().sqrt();
        if master.point_in_face(facei, foot, 1e-12 * scale.max(1.0))
            && best.is_none_or(|(_, d)| t.abs() < d)
        {
            best = Some((foot, t.abs()));
        }
    }
    match best {
        Some((foot, _)) => ProjectedPoint::hit(foot),
        None => {
            let foot = nearest(master, p);
            let lateral = match normal.normalized() {
                Some(n) => {
                    let v = foot - p;
                    (v - n * v.dot(n)).mag()
                }
                None => foot.dist(p),
            };
            log::trace!("projection: normal ray from {p:?} misses the master");
            ProjectedPoint::miss(foot, lateral)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::point::PointId;

    fn pid(i: u32) -> PointId {
        PointId::new(i)
    }

    /// Flat master: unit square at z=0; slave points hover above it.
    fn flat_master() -> PrimitivePatch {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![pid(0), pid(1), pid(2), pid(3)]];
        PrimitivePatch::new(&faces, &points)
    }

    /// Slave quad above the master interior, wound so its normal is -z
    /// (facing the master, as a coupling surface is).
    fn raised_slave() -> PrimitivePatch {
        let points = vec![
            Point3::new(0.2, 0.2, 0.5),
            Point3::new(0.8, 0.2, 0.5),
            Point3::new(0.8, 0.8, 0.5),
            Point3::new(0.2, 0.8, 0.5),
        ];
        let faces = vec![vec![pid(0), pid(3), pid(2), pid(1)]];
        PrimitivePatch::new(&faces, &points)
    }

    #[test]
    fn nearest_drops_onto_master() {
        let master = flat_master();
        let slave = raised_slave();
        let projected = project_slave_points(&master, &slave, ProjectionAlgorithm::Nearest);
        assert_eq!(projected.len(), 4);
        for (pointi, q) in projected.iter().enumerate() {
            let p = slave.local_points()[pointi];
            assert!(q.hit);
            assert!(q.point.z.abs() < 1e-12);
            assert!((q.point.x - p.x).abs() < 1e-12);
            assert!((q.point.y - p.y).abs() < 1e-12);
        }
    }

    #[test]
    fn projection_is_idempotent() {
        let master = flat_master();
        let slave = raised_slave();
        for algo in [
            ProjectionAlgorithm::Nearest,
            ProjectionAlgorithm::Visible,
            ProjectionAlgorithm::Direct,
        ] {
            let a = project_slave_points(&master, &slave, algo);
            let b = project_slave_points(&master, &slave, algo);
            assert_eq!(a, b, "{algo:?} projection must be bitwise reproducible");
        }
    }

    #[test]
    fn direct_follows_point_normal() {
        let master = flat_master();
        let slave = raised_slave();
        let projected = project_slave_points(&master, &slave, ProjectionAlgorithm::Direct);
        for (pointi, q) in projected.iter().enumerate() {
            let p = slave.local_points()[pointi];
            assert!(q.hit, "downward normal ray must hit the master");
            assert!((q.point.x - p.x).abs() < 1e-12);
            assert!((q.point.y - p.y).abs() < 1e-12);
            assert!(q.point.z.abs() < 1e-12);
        }
    }

    #[test]
    fn direct_miss_reports_lateral_distance() {
        let master = flat_master();
        // A slave hanging off the master: rays at x in (2, 3) miss.
        let points = vec![
            Point3::new(2.0, 0.2, 0.5),
            Point3::new(2.0, 0.8, 0.5),
            Point3::new(3.0, 0.8, 0.5),
            Point3::new(3.0, 0.2, 0.5),
        ];
        let faces = vec![vec![pid(0), pid(1), pid(2), pid(3)]];
        let slave = PrimitivePatch::new(&faces, &points);
        let projected = project_slave_points(&master, &slave, ProjectionAlgorithm::Direct);
        for q in &projected {
            assert!(!q.hit);
        }
        // The x=2 points clamp to the master edge x=1: lateral miss 1.
        let q = projected[slave.which_point(pid(0)).unwrap()];
        assert!((q.point.x - 1.0).abs() < 1e-12);
        assert!((q.miss_distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn off_patch_point_clamps_to_boundary() {
        let master = flat_master();
        let points = vec![
            Point3::new(2.0, 0.5, 0.3),
            Point3::new(3.0, 0.5, 0.3),
            Point3::new(3.0, 1.5, 0.3),
            Point3::new(2.0, 1.5, 0.3),
        ];
        let faces = vec![vec![pid(0), pid(1), pid(2), pid(3)]];
        let slave = PrimitivePatch::new(&faces, &points);
        let projected = project_slave_points(&master, &slave, ProjectionAlgorithm::Nearest);
        // Nearest point of (2, 0.5, .) is the master edge point (1, 0.5, 0).
        let q = projected[slave.which_point(pid(0)).unwrap()];
        assert!(q.hit);
        assert!((q.point.x - 1.0).abs() < 1e-12);
        assert!((q.point.y - 0.5).abs() < 1e-12);
    }
}
