//! Edge-pair intersection predicate: tolerance boundaries and end-cutoff
//! exclusion. Boundary values are chosen as exact binary fractions so
//! the at-tolerance comparisons are not blurred by rounding.

use crate::geometry::{Line, Point3};
use crate::interface::config::Tolerances;
use crate::interface::couple::intersect_edge_pair;
use crate::mesh_error::MeshSlideError;

fn tolerances() -> Tolerances {
    Tolerances {
        edge_co_planar: 0.125,
        edge_end_cutoff: 0.125,
        ..Default::default()
    }
}

/// Master edge along x; slave edge along y crossing it at x = 1.
fn master_line() -> Line {
    Line::new(Point3::ZERO, Point3::new(2.0, 0.0, 0.0))
}

fn slave_line_at(x: f64, z: f64) -> Line {
    Line::new(Point3::new(x, -1.0, z), Point3::new(x, 1.0, z))
}

/// Third plane point: the slave edge midpoint lifted off the plane.
fn plane_third(x: f64) -> Point3 {
    Point3::new(x, 0.0, 1.0)
}

#[test]
fn clean_crossing_is_cut() {
    let cut = intersect_edge_pair(
        &master_line(),
        &slave_line_at(1.0, 0.0),
        plane_third(1.0),
        &tolerances(),
    )
    .unwrap();
    assert_eq!(cut.point, Point3::new(1.0, 0.0, 0.0));
    assert_eq!(cut.master_fraction, 0.5);
    assert_eq!(cut.slave_fraction, 0.5);
}

#[test]
fn coplanar_tolerance_boundary_accepted() {
    // Slave edge lifted by exactly edge_co_planar * |slave| = 0.125 * 2:
    // the cut point's distance to the slave line sits exactly at the
    // merge tolerance, which is accepted.
    let cut = intersect_edge_pair(
        &master_line(),
        &slave_line_at(1.0, 0.25),
        plane_third(1.0),
        &tolerances(),
    )
    .unwrap();
    assert_eq!(cut.point, Point3::new(1.0, 0.0, 0.0));
}

#[test]
fn coplanar_marginally_above_rejected() {
    let err = intersect_edge_pair(
        &master_line(),
        &slave_line_at(1.0, 0.25 + 1e-9),
        plane_third(1.0),
        &tolerances(),
    )
    .unwrap_err();
    assert!(matches!(err, MeshSlideError::MissedSlaveEdge { .. }));
}

#[test]
fn master_end_cutoff_is_exclusive() {
    let tol = tolerances();
    // Crossing at exactly the cutoff fraction (x = 2 * 0.125) and at
    // exactly 1 - cutoff: both out of range.
    for x in [0.25, 1.75] {
        let err = intersect_edge_pair(&master_line(), &slave_line_at(x, 0.0), plane_third(x), &tol)
            .unwrap_err();
        match err {
            MeshSlideError::MissedMasterEdge { weight, .. } => {
                assert_eq!(weight, x / 2.0);
            }
            other => panic!("expected MissedMasterEdge, got {other:?}"),
        }
    }
    // Strictly inside the open interval: accepted.
    for x in [0.25 + 1e-6, 1.75 - 1e-6] {
        intersect_edge_pair(&master_line(), &slave_line_at(x, 0.0), plane_third(x), &tol).unwrap();
    }
}

#[test]
fn slave_end_cutoff_is_exclusive() {
    let tol = tolerances();
    // Cut lands on the slave edge exactly at fraction 0.125 from the
    // start: rejected, the interval is open.
    let slave = Line::new(Point3::new(1.0, -0.25, 0.0), Point3::new(1.0, 1.75, 0.0));
    let err = intersect_edge_pair(&master_line(), &slave, plane_third(1.0), &tol).unwrap_err();
    match err {
        MeshSlideError::MissedSlaveEdge { weight, .. } => assert_eq!(weight, 0.125),
        other => panic!("expected MissedSlaveEdge, got {other:?}"),
    }

    // Nudged inside: accepted.
    let slave = Line::new(Point3::new(1.0, -0.26, 0.0), Point3::new(1.0, 1.74, 0.0));
    intersect_edge_pair(&master_line(), &slave, plane_third(1.0), &tol).unwrap();
}

#[test]
fn parallel_master_edge_misses() {
    // Master edge parallel to the cutting plane.
    let master = Line::new(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
    let err = intersect_edge_pair(
        &master,
        &slave_line_at(1.0, 0.0),
        plane_third(1.0),
        &tolerances(),
    )
    .unwrap_err();
    assert!(matches!(err, MeshSlideError::MissedMasterEdge { .. }));
}

#[test]
fn collinear_plane_points_are_degenerate() {
    // Third point on the slave line: no unique cutting plane.
    let err = intersect_edge_pair(
        &master_line(),
        &slave_line_at(1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        &tolerances(),
    )
    .unwrap_err();
    assert!(matches!(err, MeshSlideError::DegeneratePlane { .. }));
}
