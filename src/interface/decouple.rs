//! Decoupling: the exact inverse of the couple.
//!
//! The zone faces were never destroyed by the couple, only detached from
//! their cells, so restoring the two independent boundary patches is a
//! respecification from the stored face-cell addressing. All cut faces
//! and cut points are removed, and the retired-point/provenance maps are
//! discarded by the caller. Re-coupling immediately afterwards with
//! unchanged geometry reproduces the same cut topology bit for bit,
//! because the couple derives everything from current projected geometry
//! and zone membership, never from history.

use crate::interface::addressing::FaceCellAddressing;
use crate::mesh_error::MeshSlideError;
use crate::mesh::edit::{FaceModification, TopoChange};
use crate::mesh::poly_mesh::PolyMesh;

/// Removes the cut topology only: cut faces and cut points.
///
/// Used as the lightweight teardown before a triggered re-couple; the
/// zone faces stay detached from their cells.
pub(crate) fn clear_couple(
    mesh: &PolyMesh,
    cut_point_zone: usize,
    cut_face_zone: usize,
    edits: &mut TopoChange,
) {
    let cut_faces = &mesh.face_zones()[cut_face_zone].faces;
    for &face in cut_faces {
        edits.remove_face(face);
    }
    let cut_points = &mesh.point_zones()[cut_point_zone].points;
    for &point in cut_points {
        edits.remove_point(point);
    }
    log::debug!(
        "clear couple: removing {} cut faces, {} cut points",
        cut_faces.len(),
        cut_points.len(),
    );
}

/// Emits the full decouple: clears the cut and restores both original
/// boundary patches from the attached addressing.
pub(crate) fn decouple_interface(
    mesh: &PolyMesh,
    master_zone: usize,
    slave_zone: usize,
    cut_point_zone: usize,
    cut_face_zone: usize,
    master_patch_index: usize,
    slave_patch_index: usize,
    addressing: &FaceCellAddressing,
    edits: &mut TopoChange,
) -> Result<(), MeshSlideError> {
    let master_faces = &mesh.face_zones()[master_zone].faces;
    if master_faces.len() != addressing.master_face_cells.len() {
        return Err(MeshSlideError::InconsistentAddressing(format!(
            "master zone has {} faces but addressing holds {} cells",
            master_faces.len(),
            addressing.master_face_cells.len()
        )));
    }
    let slave_faces = &mesh.face_zones()[slave_zone].faces;
    if slave_faces.len() != addressing.slave_face_cells.len() {
        return Err(MeshSlideError::InconsistentAddressing(format!(
            "slave zone has {} faces but addressing holds {} cells",
            slave_faces.len(),
            addressing.slave_face_cells.len()
        )));
    }

    for (facei, &face) in master_faces.iter().enumerate() {
        edits.modify_face(
            face,
            FaceModification {
                points: None,
                owner: Some(addressing.master_face_cells[facei]),
                neighbour: None,
                patch: Some(master_patch_index),
                zone: Some(master_zone),
                zone_flip: mesh.face_zones()[master_zone].flip[facei],
            },
        );
    }
    for (facei, &face) in slave_faces.iter().enumerate() {
        edits.modify_face(
            face,
            FaceModification {
                points: None,
                owner: Some(addressing.slave_face_cells[facei]),
                neighbour: None,
                patch: Some(slave_patch_index),
                zone: Some(slave_zone),
                zone_flip: mesh.face_zones()[slave_zone].flip[facei],
            },
        );
    }

    clear_couple(mesh, cut_point_zone, cut_face_zone, edits);
    Ok(())
}
