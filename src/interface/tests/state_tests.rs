//! Construction, definition checking and persisted-state round trips.

use crate::interface::config::MatchType;
use crate::interface::sliding_interface::SlidingInterface;
use crate::interface::tests::fixtures::{fixture_config, rotation_about_origin, two_layer_mesh};
use crate::mesh_error::MeshSlideError;
use crate::mesh::modifier::{TopoChanger, TopologyModifier};

const THETA: f64 = 5.0 * std::f64::consts::PI / 180.0;
const GAP: f64 = 0.1;

#[test]
fn attached_from_components_rejected() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let config = fixture_config(false, MatchType::Partial);
    let err = SlidingInterface::from_components(config, &mesh, true).unwrap_err();
    assert_eq!(err, MeshSlideError::AttachedFromComponents);
}

#[test]
fn unbound_zone_is_fatal() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let mut config = fixture_config(false, MatchType::Partial);
    config.master_face_zone_name = "noSuchZone".into();
    let err = SlidingInterface::from_components(config, &mesh, false).unwrap_err();
    match err {
        MeshSlideError::UnboundZone { name, role } => {
            assert_eq!(name, "noSuchZone");
            assert_eq!(role, "master face zone");
        }
        other => panic!("expected UnboundZone, got {other:?}"),
    }
}

#[test]
fn empty_zone_is_fatal() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    // The cut face zone exists but is empty; using it as the master face
    // zone fails the definition check.
    let mut config = fixture_config(false, MatchType::Partial);
    config.master_face_zone_name = "cutFaces".into();
    let err = SlidingInterface::from_components(config, &mesh, false).unwrap_err();
    assert_eq!(
        err,
        MeshSlideError::EmptyZone {
            name: "cutFaces".into()
        }
    );
}

#[test]
fn attached_dict_requires_all_maps() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let mut dict = crate::interface::InterfaceDict {
        config: fixture_config(false, MatchType::Partial),
        attached: true,
        active: true,
        master_face_cells: None,
        slave_face_cells: None,
        master_stick_out_faces: None,
        slave_stick_out_faces: None,
        retired_point_map: None,
        cut_point_edge_pair_map: None,
    };
    let err = SlidingInterface::from_dict(dict.clone(), &mesh).unwrap_err();
    assert_eq!(
        err,
        MeshSlideError::MissingAttachedEntry {
            entry: "masterFaceCells"
        }
    );

    dict.master_face_cells = Some(vec![]);
    let err = SlidingInterface::from_dict(dict, &mesh).unwrap_err();
    assert_eq!(
        err,
        MeshSlideError::MissingAttachedEntry {
            entry: "slaveFaceCells"
        }
    );
}

#[test]
fn attached_state_round_trips_through_dict() {
    let mut mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let config = fixture_config(false, MatchType::Partial);
    let slider = SlidingInterface::from_components(config, &mesh, false).unwrap();
    let mut changer = TopoChanger::new(vec![TopologyModifier::SlidingInterface(Box::new(slider))]);
    changer.update(&mut mesh).unwrap().unwrap();

    let dict = match &changer.modifiers()[0] {
        TopologyModifier::SlidingInterface(s) => s.to_dict(),
    };
    assert!(dict.attached);

    // Through the serialized form and back onto the coupled mesh.
    let json = serde_json::to_string(&dict).unwrap();
    let read: crate::interface::InterfaceDict = serde_json::from_str(&json).unwrap();
    assert_eq!(read, dict);

    let restored = SlidingInterface::from_dict(read, &mesh).unwrap();
    assert!(restored.attached());
    assert_eq!(restored.to_dict(), dict);
}

#[test]
fn detached_interface_reports_summary() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let config = fixture_config(false, MatchType::Partial);
    let slider = SlidingInterface::from_components(config, &mesh, false).unwrap();
    let summary = slider.to_string();
    assert!(summary.contains("slidingInterface slider"));
    assert!(summary.contains("master face zone: masterZone"));
    assert!(summary.contains("attached: false"));
}

#[test]
fn tolerance_overrides_are_applied() {
    let mesh = two_layer_mesh((2, 2), (2, 2), GAP, &rotation_about_origin(THETA));
    let config = fixture_config(false, MatchType::Partial);
    let mut slider = SlidingInterface::from_components(config, &mesh, false).unwrap();

    let tolerances = crate::interface::Tolerances {
        edge_co_planar: 0.25,
        edge_face_escape_limit: 20,
        ..Default::default()
    };
    slider.set_tolerances(tolerances, false);
    assert_eq!(slider.config().tolerances.edge_co_planar, 0.25);
    assert_eq!(slider.config().tolerances.edge_face_escape_limit, 20);
    // Untouched knobs keep their values.
    assert_eq!(
        slider.config().tolerances.edge_end_cutoff,
        crate::interface::config::EDGE_END_CUTOFF_TOL_DEFAULT
    );
}
