//! Attached-addressing cache for a sliding interface.
//!
//! While detached, the adjacency needed for a subsequent couple is
//! recomputed from the mesh on demand. Once attached, the four maps
//! (face-cells on both sides, stick-out faces on both sides, the retired
//! point map and the cut-point provenance map) are authoritative: they
//! are persisted with the interface and survive until decoupling.

use crate::mesh_error::MeshSlideError;
use crate::mesh::poly_mesh::PolyMesh;
use crate::topology::edge::EdgePair;
use crate::topology::patch::{LocalEdge, PrimitivePatch};
use crate::topology::point::{CellId, FaceId, PointId};
use hashbrown::HashSet;
use std::collections::BTreeMap;

/// Face-cell and stick-out adjacency captured on both sides of the
/// interface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceCellAddressing {
    /// Owning cell of each master zone face, in zone-local order.
    pub master_face_cells: Vec<CellId>,
    /// Owning cell of each slave zone face, in zone-local order.
    pub slave_face_cells: Vec<CellId>,
    /// Faces using master zone points without being zone members.
    pub master_stick_out_faces: Vec<FaceId>,
    /// Faces using slave zone points without being zone members.
    pub slave_stick_out_faces: Vec<FaceId>,
}

/// Computes the detached-state adjacency for both zones.
///
/// Must be called while the zone faces still carry their owning cells,
/// i.e. before any couple detaches them.
pub fn calc_attached_addressing(
    mesh: &PolyMesh,
    master_zone: usize,
    slave_zone: usize,
) -> Result<FaceCellAddressing, MeshSlideError> {
    let master_face_cells = zone_face_cells(mesh, master_zone)?;
    let slave_face_cells = zone_face_cells(mesh, slave_zone)?;
    let master_stick_out_faces = stick_out_faces(mesh, master_zone);
    let slave_stick_out_faces = stick_out_faces(mesh, slave_zone);
    log::debug!(
        "attached addressing: {} master faces, {} slave faces, {}/{} stick-out",
        master_face_cells.len(),
        slave_face_cells.len(),
        master_stick_out_faces.len(),
        slave_stick_out_faces.len(),
    );
    Ok(FaceCellAddressing {
        master_face_cells,
        slave_face_cells,
        master_stick_out_faces,
        slave_stick_out_faces,
    })
}

fn zone_face_cells(mesh: &PolyMesh, zonei: usize) -> Result<Vec<CellId>, MeshSlideError> {
    let zone = &mesh.face_zones()[zonei];
    zone.faces
        .iter()
        .map(|&f| {
            mesh.owner()[f.index()].ok_or_else(|| {
                MeshSlideError::InconsistentAddressing(format!(
                    "face {} of zone `{}` has no owning cell",
                    f.index(),
                    zone.name
                ))
            })
        })
        .collect()
}

/// Faces adjacent to the zone through a shared point, in ascending order.
fn stick_out_faces(mesh: &PolyMesh, zonei: usize) -> Vec<FaceId> {
    let zone = &mesh.face_zones()[zonei];
    let members: HashSet<FaceId> = zone.faces.iter().copied().collect();
    let zone_points: HashSet<PointId> = zone
        .faces
        .iter()
        .flat_map(|&f| mesh.faces()[f.index()].iter().copied())
        .collect();

    let mut out = Vec::new();
    for facei in 0..mesh.n_faces() {
        let face = FaceId::from_index(facei);
        if members.contains(&face) {
            continue;
        }
        if mesh.faces()[facei].iter().any(|p| zone_points.contains(p)) {
            out.push(face);
        }
    }
    out
}

/// Validates the mutual consistency required of the attached state:
/// every retired point appears exactly once, and every provenance edge
/// pair refers to edges currently present on the respective patches.
///
/// A cut point may carry both a retired entry and a provenance entry;
/// classification gives the retired entry precedence, so the overlap is
/// tolerated here.
pub fn check_attached_consistency(
    retired_point_map: &BTreeMap<PointId, PointId>,
    cut_point_edge_pair_map: &BTreeMap<PointId, EdgePair>,
    master_patch: &PrimitivePatch,
    slave_patch: &PrimitivePatch,
) -> Result<(), MeshSlideError> {
    let mut seen_slave: HashSet<PointId> = HashSet::with_capacity(retired_point_map.len());
    for &slave_point in retired_point_map.values() {
        if !seen_slave.insert(slave_point) {
            return Err(MeshSlideError::InconsistentAddressing(format!(
                "slave point {slave_point} retired more than once"
            )));
        }
        if slave_patch.which_point(slave_point).is_none() {
            return Err(MeshSlideError::InconsistentAddressing(format!(
                "retired map refers to point {slave_point} not on the slave patch"
            )));
        }
    }

    for (&cut_point, pair) in cut_point_edge_pair_map {
        let on_master = patch_has_edge(master_patch, pair.master.start, pair.master.end);
        if !on_master {
            return Err(MeshSlideError::StaleProvenance {
                point: cut_point,
                side: "master",
            });
        }
        let on_slave = patch_has_edge(slave_patch, pair.slave.start, pair.slave.end);
        if !on_slave {
            return Err(MeshSlideError::StaleProvenance {
                point: cut_point,
                side: "slave",
            });
        }
    }
    Ok(())
}

fn patch_has_edge(patch: &PrimitivePatch, start: PointId, end: PointId) -> bool {
    match (patch.which_point(start), patch.which_point(end)) {
        (Some(s), Some(e)) => patch.which_edge(LocalEdge::new(s, e)).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::mesh::poly_mesh::{BoundaryPatch, FaceZone, PointZone};
    use crate::topology::edge::Edge;

    fn pid(i: u32) -> PointId {
        PointId::new(i)
    }

    /// One hex cell; its top face is the zone face.
    fn one_cell_mesh() -> PolyMesh {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            vec![pid(0), pid(3), pid(2), pid(1)], // bottom
            vec![pid(4), pid(5), pid(6), pid(7)], // top (zone)
            vec![pid(0), pid(1), pid(5), pid(4)],
            vec![pid(1), pid(2), pid(6), pid(5)],
            vec![pid(2), pid(3), pid(7), pid(6)],
            vec![pid(3), pid(0), pid(4), pid(7)],
        ];
        let owner = vec![Some(CellId::new(0)); 6];
        let neighbour = vec![None; 6];
        let all = (0..6).map(FaceId::from_index).collect::<Vec<_>>();
        PolyMesh::new(
            points,
            faces,
            owner,
            neighbour,
            1,
            vec![BoundaryPatch::new("walls", all)],
            vec![FaceZone::new("top", vec![FaceId::new(1)])],
            vec![PointZone::new("cutPoints", vec![])],
        )
    }

    #[test]
    fn face_cells_and_stick_out() {
        let mesh = one_cell_mesh();
        let addressing = calc_attached_addressing(&mesh, 0, 0).unwrap();
        assert_eq!(addressing.master_face_cells, vec![CellId::new(0)]);
        // All four side faces share a point with the top face.
        assert_eq!(
            addressing.master_stick_out_faces,
            vec![FaceId::new(2), FaceId::new(3), FaceId::new(4), FaceId::new(5)]
        );
    }

    #[test]
    fn consistency_rejects_double_retirement() {
        let mesh = one_cell_mesh();
        let patch = PrimitivePatch::new(&mesh.zone_faces(0), mesh.points());
        let mut rpm = BTreeMap::new();
        rpm.insert(pid(100), pid(4));
        rpm.insert(pid(101), pid(4)); // same slave point twice
        let cpepm = BTreeMap::new();
        let err = check_attached_consistency(&rpm, &cpepm, &patch, &patch).unwrap_err();
        assert!(matches!(err, MeshSlideError::InconsistentAddressing(_)));
    }

    #[test]
    fn consistency_rejects_stale_provenance() {
        let mesh = one_cell_mesh();
        let patch = PrimitivePatch::new(&mesh.zone_faces(0), mesh.points());
        let rpm = BTreeMap::new();
        let mut cpepm = BTreeMap::new();
        cpepm.insert(
            pid(100),
            EdgePair {
                master: Edge::new(pid(4), pid(6)), // diagonal: not a patch edge
                slave: Edge::new(pid(4), pid(5)),
            },
        );
        let err = check_attached_consistency(&rpm, &cpepm, &patch, &patch).unwrap_err();
        assert!(matches!(
            err,
            MeshSlideError::StaleProvenance { side: "master", .. }
        ));
    }

    #[test]
    fn consistency_accepts_valid_maps() {
        let mesh = one_cell_mesh();
        let patch = PrimitivePatch::new(&mesh.zone_faces(0), mesh.points());
        let mut rpm = BTreeMap::new();
        rpm.insert(pid(100), pid(4));
        let mut cpepm = BTreeMap::new();
        cpepm.insert(
            pid(101),
            EdgePair {
                master: Edge::new(pid(4), pid(5)),
                slave: Edge::new(pid(6), pid(7)),
            },
        );
        check_attached_consistency(&rpm, &cpepm, &patch, &patch).unwrap();
    }
}
