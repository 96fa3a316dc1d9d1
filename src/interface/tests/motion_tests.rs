//! Motion-point recovery: retired points follow their projected slave
//! points, edge intersections are recomputed from provenance, and
//! anything else is a fatal data-mapping error.

use crate::geometry::Point3;
use crate::interface::config::MatchType;
use crate::interface::persist::InterfaceDict;
use crate::interface::sliding_interface::SlidingInterface;
use crate::interface::tests::fixtures::{
    fixture_config, identity_xy, rotation_about_origin, two_layer_mesh,
    two_layer_mesh_with_cut_zone,
};
use crate::mesh_error::MeshSlideError;
use crate::mesh::modifier::{TopoChanger, TopologyModifier};
use crate::topology::edge::{Edge, EdgePair};
use crate::topology::point::{CellId, PointId};

const THETA: f64 = 5.0 * std::f64::consts::PI / 180.0;
const GAP: f64 = 0.1;

fn pid(i: u32) -> PointId {
    PointId::new(i)
}

/// An attached dictionary over the aligned fixture with caller-supplied
/// retired/provenance maps for one pre-seeded cut point.
fn attached_dict(
    retired: Vec<(PointId, PointId)>,
    provenance: Vec<(PointId, EdgePair)>,
) -> InterfaceDict {
    InterfaceDict {
        config: fixture_config(false, MatchType::Partial),
        attached: true,
        active: true,
        master_face_cells: Some((0..4).map(CellId::from_index).collect()),
        slave_face_cells: Some((4..8).map(CellId::from_index).collect()),
        master_stick_out_faces: Some(vec![]),
        slave_stick_out_faces: Some(vec![]),
        retired_point_map: Some(retired),
        cut_point_edge_pair_map: Some(provenance),
    }
}

#[test]
fn motion_reproduces_couple_positions() {
    let mut mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let config = fixture_config(false, MatchType::Partial);
    let slider = SlidingInterface::from_components(config, &mesh, false).unwrap();
    let mut changer = TopoChanger::new(vec![TopologyModifier::SlidingInterface(Box::new(slider))]);
    changer.update(&mut mesh).unwrap().unwrap();

    // Unchanged geometry: the recovery must reproduce the couple-time
    // cut positions bit for bit.
    let mut positions = mesh.points().to_vec();
    changer.modify_motion_points(&mesh, &mut positions).unwrap();
    let cut_zone = mesh
        .point_zones()
        .iter()
        .find(|z| z.name == "cutPoints")
        .unwrap();
    assert_eq!(cut_zone.points.len(), 9);
    for &cut_point in &cut_zone.points {
        assert_eq!(
            positions[cut_point.index()],
            mesh.points()[cut_point.index()],
            "cut point {cut_point} drifted without motion"
        );
    }
}

#[test]
fn retired_beats_spurious_provenance() {
    // Cut point 0 is both in the retired map (slave point 22, grid point
    // (1,1)) and, spuriously, in the provenance map. The retired entry
    // must win: the point follows the projected slave position.
    let cut_point = pid(0);
    let mesh = two_layer_mesh_with_cut_zone(
        (2, 2),
        (2, 2),
        GAP,
        &identity_xy(),
        vec![cut_point],
    );
    let spurious = EdgePair {
        master: Edge::new(pid(9), pid(10)),
        slave: Edge::new(pid(18), pid(19)),
    };
    let dict = attached_dict(vec![(cut_point, pid(22))], vec![(cut_point, spurious)]);
    let slider = SlidingInterface::from_dict(dict, &mesh).unwrap();

    // Populate the projection cache, then recover.
    slider.point_projection(&mesh).unwrap();
    let mut positions = mesh.points().to_vec();
    slider.modify_motion_points(&mesh, &mut positions).unwrap();
    // Slave grid point (1,1) sits at (1,1,gap) and projects to (1,1,0).
    assert_eq!(positions[cut_point.index()], Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn unclassifiable_cut_point_is_fatal() {
    let cut_point = pid(0);
    let mesh =
        two_layer_mesh_with_cut_zone((2, 2), (2, 2), GAP, &identity_xy(), vec![cut_point]);
    let dict = attached_dict(vec![], vec![]);
    let slider = SlidingInterface::from_dict(dict, &mesh).unwrap();

    slider.point_projection(&mesh).unwrap();
    let mut positions = mesh.points().to_vec();
    let err = slider
        .modify_motion_points(&mesh, &mut positions)
        .unwrap_err();
    assert_eq!(
        err,
        MeshSlideError::UnclassifiablePoint { point: cut_point }
    );
}

#[test]
fn missed_edge_during_recovery_is_fatal() {
    // Provenance pairing a master edge that lies inside the cutting
    // plane: the recomputed intersection cannot hit it.
    let cut_point = pid(0);
    let mesh =
        two_layer_mesh_with_cut_zone((2, 2), (2, 2), GAP, &identity_xy(), vec![cut_point]);
    let degenerate = EdgePair {
        master: Edge::new(pid(9), pid(10)),
        slave: Edge::new(pid(18), pid(19)),
    };
    let dict = attached_dict(vec![], vec![(cut_point, degenerate)]);
    let slider = SlidingInterface::from_dict(dict, &mesh).unwrap();

    slider.point_projection(&mesh).unwrap();
    let mut positions = mesh.points().to_vec();
    let err = slider
        .modify_motion_points(&mesh, &mut positions)
        .unwrap_err();
    assert!(matches!(err, MeshSlideError::MissedMasterEdge { .. }));
}

#[test]
fn stale_provenance_is_fatal() {
    // Provenance naming a master diagonal that is not a patch edge.
    let cut_point = pid(0);
    let mesh =
        two_layer_mesh_with_cut_zone((2, 2), (2, 2), GAP, &identity_xy(), vec![cut_point]);
    let diagonal = EdgePair {
        master: Edge::new(pid(9), pid(13)),
        slave: Edge::new(pid(18), pid(19)),
    };
    let dict = attached_dict(vec![], vec![(cut_point, diagonal)]);
    let err = SlidingInterface::from_dict(dict, &mesh).unwrap_err();
    assert!(matches!(
        err,
        MeshSlideError::StaleProvenance { side: "master", .. }
    ));
}
