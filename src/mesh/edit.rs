//! The shared topology edit list and its renumbering map.
//!
//! Modifiers emit point/face/cell insertions, removals and modifications
//! into a [`TopoChange`]; the framework applies the whole batch to the
//! mesh atomically. Application is two-phase: every edit is validated
//! against the mesh before anything is mutated, so a failed apply leaves
//! the mesh untouched. The resulting [`TopoMap`] records the old->new
//! renumbering that zone bindings and cached addressing must be updated
//! with.
//!
//! Provisional ids: an edit list is opened against a specific mesh state
//! and hands out ids continuing that mesh's numbering, so emitted edits
//! can reference entities added earlier in the same batch.

use crate::geometry::Point3;
use crate::mesh_error::MeshSlideError;
use crate::mesh::poly_mesh::PolyMesh;
use crate::topology::point::{CellId, FaceId, PointId};
use hashbrown::HashSet;

/// Full respecification of a face.
#[derive(Clone, Debug)]
pub struct FaceModification {
    /// Replacement point loop; `None` keeps the current loop.
    pub points: Option<Vec<PointId>>,
    /// Resulting owner cell (`None` detaches the face from cells).
    pub owner: Option<CellId>,
    /// Resulting neighbour cell (`Some` makes the face internal).
    pub neighbour: Option<CellId>,
    /// Resulting boundary patch membership.
    pub patch: Option<usize>,
    /// Resulting face zone membership.
    pub zone: Option<usize>,
    /// Orientation flip in the zone.
    pub zone_flip: bool,
}

#[derive(Clone, Debug)]
struct AddedFace {
    points: Vec<PointId>,
    owner: Option<CellId>,
    neighbour: Option<CellId>,
    patch: Option<usize>,
    zone: Option<usize>,
    zone_flip: bool,
}

/// A batch of topology edits, applied atomically.
#[derive(Clone, Debug)]
pub struct TopoChange {
    n_points0: usize,
    n_faces0: usize,
    n_cells0: usize,
    added_points: Vec<(Point3, Option<usize>)>,
    modified_points: Vec<(PointId, Point3)>,
    removed_points: Vec<PointId>,
    added_faces: Vec<AddedFace>,
    modified_faces: Vec<(FaceId, FaceModification)>,
    removed_faces: Vec<FaceId>,
    added_cells: usize,
    removed_cells: Vec<CellId>,
}

impl TopoChange {
    /// Opens an edit list against the current state of `mesh`.
    pub fn new(mesh: &PolyMesh) -> Self {
        Self {
            n_points0: mesh.n_points(),
            n_faces0: mesh.n_faces(),
            n_cells0: mesh.n_cells(),
            added_points: Vec::new(),
            modified_points: Vec::new(),
            removed_points: Vec::new(),
            added_faces: Vec::new(),
            modified_faces: Vec::new(),
            removed_faces: Vec::new(),
            added_cells: 0,
            removed_cells: Vec::new(),
        }
    }

    /// True when no edits have been recorded.
    pub fn is_empty(&self) -> bool {
        self.added_points.is_empty()
            && self.modified_points.is_empty()
            && self.removed_points.is_empty()
            && self.added_faces.is_empty()
            && self.modified_faces.is_empty()
            && self.removed_faces.is_empty()
            && self.added_cells == 0
            && self.removed_cells.is_empty()
    }

    /// Adds a point, optionally into a point zone. Returns its id.
    pub fn add_point(&mut self, position: Point3, zone: Option<usize>) -> PointId {
        let id = PointId::from_index(self.n_points0 + self.added_points.len());
        self.added_points.push((position, zone));
        id
    }

    /// Moves an existing point.
    pub fn modify_point(&mut self, point: PointId, position: Point3) {
        self.modified_points.push((point, position));
    }

    /// Removes a point. The point must be unreferenced once face edits in
    /// this batch have been applied.
    pub fn remove_point(&mut self, point: PointId) {
        self.removed_points.push(point);
    }

    /// Adds a face. Returns its id.
    pub fn add_face(
        &mut self,
        points: Vec<PointId>,
        owner: Option<CellId>,
        neighbour: Option<CellId>,
        patch: Option<usize>,
        zone: Option<usize>,
        zone_flip: bool,
    ) -> FaceId {
        let id = FaceId::from_index(self.n_faces0 + self.added_faces.len());
        self.added_faces.push(AddedFace {
            points,
            owner,
            neighbour,
            patch,
            zone,
            zone_flip,
        });
        id
    }

    /// Respecifies a face (connectivity, patch and zone membership).
    pub fn modify_face(&mut self, face: FaceId, modification: FaceModification) {
        self.modified_faces.push((face, modification));
    }

    /// Removes a face.
    pub fn remove_face(&mut self, face: FaceId) {
        self.removed_faces.push(face);
    }

    /// Adds a cell. Returns its id.
    pub fn add_cell(&mut self) -> CellId {
        let id = CellId::from_index(self.n_cells0 + self.added_cells);
        self.added_cells += 1;
        id
    }

    /// Removes a cell. No surviving face may reference it.
    pub fn remove_cell(&mut self, cell: CellId) {
        self.removed_cells.push(cell);
    }

    fn validate(&self, mesh: &PolyMesh) -> Result<(), MeshSlideError> {
        if self.n_points0 != mesh.n_points()
            || self.n_faces0 != mesh.n_faces()
            || self.n_cells0 != mesh.n_cells()
        {
            return Err(MeshSlideError::InconsistentAddressing(
                "edit list was opened against a different mesh state".into(),
            ));
        }

        let n_points = self.n_points0 + self.added_points.len();
        let n_faces = self.n_faces0 + self.added_faces.len();
        let n_cells = self.n_cells0 + self.added_cells;
        let n_patches = mesh.patches().len();
        let n_face_zones = mesh.face_zones().len();
        let n_point_zones = mesh.point_zones().len();

        let check_point = |p: PointId| -> Result<(), MeshSlideError> {
            if p.index() >= n_points {
                return Err(MeshSlideError::EditOutOfRange {
                    kind: "point",
                    index: p.index(),
                    size: n_points,
                });
            }
            Ok(())
        };
        let check_cell = |c: Option<CellId>| -> Result<(), MeshSlideError> {
            if let Some(c) = c {
                if c.index() >= n_cells {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "cell",
                        index: c.index(),
                        size: n_cells,
                    });
                }
            }
            Ok(())
        };

        for &(_, zone) in &self.added_points {
            if let Some(z) = zone {
                if z >= n_point_zones {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "point zone",
                        index: z,
                        size: n_point_zones,
                    });
                }
            }
        }
        for &(p, _) in &self.modified_points {
            check_point(p)?;
        }
        for &p in &self.removed_points {
            check_point(p)?;
        }

        let check_face_spec = |points: &[PointId],
                               owner: Option<CellId>,
                               neighbour: Option<CellId>,
                               patch: Option<usize>,
                               zone: Option<usize>|
         -> Result<(), MeshSlideError> {
            for &p in points {
                check_point(p)?;
            }
            check_cell(owner)?;
            check_cell(neighbour)?;
            if neighbour.is_some() && owner.is_none() {
                return Err(MeshSlideError::InconsistentAddressing(
                    "face with a neighbour but no owner".into(),
                ));
            }
            if neighbour.is_some() && patch.is_some() {
                return Err(MeshSlideError::InconsistentAddressing(
                    "internal face cannot lie on a boundary patch".into(),
                ));
            }
            if let Some(pa) = patch {
                if pa >= n_patches {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "patch",
                        index: pa,
                        size: n_patches,
                    });
                }
            }
            if let Some(z) = zone {
                if z >= n_face_zones {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "face zone",
                        index: z,
                        size: n_face_zones,
                    });
                }
            }
            Ok(())
        };

        for f in &self.added_faces {
            check_face_spec(&f.points, f.owner, f.neighbour, f.patch, f.zone)?;
        }
        for (face, m) in &self.modified_faces {
            if face.index() >= n_faces {
                return Err(MeshSlideError::EditOutOfRange {
                    kind: "face",
                    index: face.index(),
                    size: n_faces,
                });
            }
            let points: &[PointId] = match &m.points {
                Some(pts) => pts,
                None if face.index() < self.n_faces0 => &mesh.faces()[face.index()],
                None => &self.added_faces[face.index() - self.n_faces0].points,
            };
            check_face_spec(points, m.owner, m.neighbour, m.patch, m.zone)?;
        }
        for &f in &self.removed_faces {
            if f.index() >= n_faces {
                return Err(MeshSlideError::EditOutOfRange {
                    kind: "face",
                    index: f.index(),
                    size: n_faces,
                });
            }
        }
        for &c in &self.removed_cells {
            check_cell(Some(c))?;
        }
        Ok(())
    }

    /// Applies the batch to `mesh` atomically.
    ///
    /// Validation runs first; on a validation error the mesh is
    /// untouched. A removal that leaves dangling references (a removed
    /// point still used by a surviving face, a removed cell still
    /// attached) is a fatal inconsistency detected during application.
    pub fn apply(self, mesh: &mut PolyMesh) -> Result<TopoMap, MeshSlideError> {
        use crate::debug_invariants::DebugInvariants;

        self.validate(mesh)?;

        let n_points_before = self.n_points0 + self.added_points.len();
        let n_faces_before = self.n_faces0 + self.added_faces.len();
        let n_cells_before = self.n_cells0 + self.added_cells;

        let removed_points: HashSet<usize> =
            self.removed_points.iter().map(|p| p.index()).collect();
        let removed_faces: HashSet<usize> = self.removed_faces.iter().map(|f| f.index()).collect();
        let removed_cells: HashSet<usize> = self.removed_cells.iter().map(|c| c.index()).collect();

        let (points, faces, owner, neighbour, n_cells, patches, face_zones, point_zones) =
            mesh.parts_mut();

        // Additions.
        for &(position, zone) in &self.added_points {
            let id = PointId::from_index(points.len());
            points.push(position);
            if let Some(z) = zone {
                point_zones[z].points.push(id);
            }
        }
        for f in &self.added_faces {
            let id = FaceId::from_index(faces.len());
            faces.push(f.points.clone());
            owner.push(f.owner);
            neighbour.push(f.neighbour);
            if let Some(pa) = f.patch {
                patches[pa].faces.push(id);
            }
            if let Some(z) = f.zone {
                face_zones[z].faces.push(id);
                face_zones[z].flip.push(f.zone_flip);
            }
        }
        *n_cells += self.added_cells;

        // Modifications.
        for &(p, position) in &self.modified_points {
            points[p.index()] = position;
        }
        for (face, m) in &self.modified_faces {
            let fi = face.index();
            if let Some(pts) = &m.points {
                faces[fi] = pts.clone();
            }
            owner[fi] = m.owner;
            neighbour[fi] = m.neighbour;
            for patch in patches.iter_mut() {
                patch.faces.retain(|&f| f != *face);
            }
            if let Some(pa) = m.patch {
                patches[pa].faces.push(*face);
            }
            for zone in face_zones.iter_mut() {
                if let Some(zi) = zone.which_face(*face) {
                    zone.faces.remove(zi);
                    zone.flip.remove(zi);
                }
            }
            if let Some(z) = m.zone {
                face_zones[z].faces.push(*face);
                face_zones[z].flip.push(m.zone_flip);
            }
        }

        // Face removal and compaction.
        let mut face_map: Vec<Option<FaceId>> = Vec::with_capacity(n_faces_before);
        {
            let mut next = 0usize;
            for old in 0..n_faces_before {
                if removed_faces.contains(&old) {
                    face_map.push(None);
                } else {
                    face_map.push(Some(FaceId::from_index(next)));
                    next += 1;
                }
            }
            let mut keep = 0usize;
            for old in 0..n_faces_before {
                if face_map[old].is_some() {
                    faces.swap(keep, old);
                    owner.swap(keep, old);
                    neighbour.swap(keep, old);
                    keep += 1;
                }
            }
            faces.truncate(keep);
            owner.truncate(keep);
            neighbour.truncate(keep);
        }
        for patch in patches.iter_mut() {
            patch.faces = patch
                .faces
                .iter()
                .filter_map(|f| face_map[f.index()])
                .collect();
        }
        for zone in face_zones.iter_mut() {
            let mut new_faces = Vec::with_capacity(zone.faces.len());
            let mut new_flip = Vec::with_capacity(zone.faces.len());
            for (i, f) in zone.faces.iter().enumerate() {
                if let Some(new) = face_map[f.index()] {
                    new_faces.push(new);
                    new_flip.push(zone.flip[i]);
                }
            }
            zone.faces = new_faces;
            zone.flip = new_flip;
        }

        // Point removal and compaction.
        let mut point_map: Vec<Option<PointId>> = Vec::with_capacity(n_points_before);
        {
            let mut next = 0usize;
            for old in 0..n_points_before {
                if removed_points.contains(&old) {
                    point_map.push(None);
                } else {
                    point_map.push(Some(PointId::from_index(next)));
                    next += 1;
                }
            }
            let mut keep = 0usize;
            for old in 0..n_points_before {
                if point_map[old].is_some() {
                    points.swap(keep, old);
                    keep += 1;
                }
            }
            points.truncate(keep);
        }
        for face in faces.iter_mut() {
            for p in face.iter_mut() {
                match point_map[p.index()] {
                    Some(new) => *p = new,
                    None => {
                        return Err(MeshSlideError::InconsistentAddressing(format!(
                            "removed point {} still referenced by a face",
                            p.index()
                        )));
                    }
                }
            }
        }
        for zone in point_zones.iter_mut() {
            zone.points = zone
                .points
                .iter()
                .filter_map(|p| point_map[p.index()])
                .collect();
        }

        // Cell removal.
        let mut cell_map: Vec<Option<CellId>> = Vec::with_capacity(n_cells_before);
        {
            let mut next = 0usize;
            for old in 0..n_cells_before {
                if removed_cells.contains(&old) {
                    cell_map.push(None);
                } else {
                    cell_map.push(Some(CellId::from_index(next)));
                    next += 1;
                }
            }
            *n_cells = next;
        }
        for c in owner.iter_mut().chain(neighbour.iter_mut()) {
            if let Some(cell) = *c {
                match cell_map[cell.index()] {
                    Some(new) => *c = Some(new),
                    None => {
                        return Err(MeshSlideError::InconsistentAddressing(format!(
                            "removed cell {} still referenced by a face",
                            cell.index()
                        )));
                    }
                }
            }
        }

        mesh.debug_assert_invariants();

        Ok(TopoMap {
            point_map,
            face_map,
            cell_map,
        })
    }
}

/// Old->new renumbering produced by an applied [`TopoChange`].
///
/// Indexed by pre-apply ids (including ids handed out for additions);
/// `None` marks a removed entity.
#[derive(Clone, Debug)]
pub struct TopoMap {
    point_map: Vec<Option<PointId>>,
    face_map: Vec<Option<FaceId>>,
    cell_map: Vec<Option<CellId>>,
}

impl TopoMap {
    /// New id of a pre-apply point.
    #[inline]
    pub fn point(&self, old: PointId) -> Option<PointId> {
        self.point_map.get(old.index()).copied().flatten()
    }

    /// New id of a pre-apply face.
    #[inline]
    pub fn face(&self, old: FaceId) -> Option<FaceId> {
        self.face_map.get(old.index()).copied().flatten()
    }

    /// New id of a pre-apply cell.
    #[inline]
    pub fn cell(&self, old: CellId) -> Option<CellId> {
        self.cell_map.get(old.index()).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::poly_mesh::{BoundaryPatch, FaceZone, PointZone};

    fn pid(i: u32) -> PointId {
        PointId::new(i)
    }

    /// One hex cell with all faces on a single boundary patch.
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
            vec![pid(0), pid(3), pid(2), pid(1)],
            vec![pid(4), pid(5), pid(6), pid(7)],
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
            vec![FaceZone::new("zone", vec![FaceId::new(1)])],
            vec![PointZone::new("cut", vec![])],
        )
    }

    #[test]
    fn add_point_and_face() {
        let mut mesh = one_cell_mesh();
        let mut edits = TopoChange::new(&mesh);
        assert!(edits.is_empty());

        let p = edits.add_point(Point3::new(0.5, 0.5, 1.5), Some(0));
        assert_eq!(p, pid(8));
        let f = edits.add_face(
            vec![pid(4), pid(5), p],
            Some(CellId::new(0)),
            None,
            Some(0),
            Some(0),
            false,
        );
        assert_eq!(f, FaceId::new(6));
        assert!(!edits.is_empty());

        let map = edits.apply(&mut mesh).unwrap();
        assert_eq!(mesh.n_points(), 9);
        assert_eq!(mesh.n_faces(), 7);
        assert_eq!(map.point(p), Some(p));
        assert_eq!(map.face(f), Some(f));
        assert_eq!(mesh.point_zones()[0].points, vec![pid(8)]);
        assert_eq!(mesh.face_zones()[0].faces, vec![FaceId::new(1), f]);
        assert!(mesh.patches()[0].faces.contains(&f));
    }

    #[test]
    fn removal_compacts_and_renumbers() {
        let mut mesh = one_cell_mesh();
        let mut edits = TopoChange::new(&mesh);
        // Add a tail point and face, then remove them with a mid-list
        // face: survivors shift down.
        let p = edits.add_point(Point3::new(2.0, 0.0, 0.0), None);
        edits.remove_point(p);
        edits.remove_face(FaceId::new(1));
        let map = edits.apply(&mut mesh).unwrap();

        assert_eq!(mesh.n_points(), 8);
        assert_eq!(mesh.n_faces(), 5);
        assert_eq!(map.face(FaceId::new(1)), None);
        assert_eq!(map.face(FaceId::new(2)), Some(FaceId::new(1)));
        assert_eq!(map.point(p), None);
        // The zone lost its only member.
        assert!(mesh.face_zones()[0].faces.is_empty());
    }

    #[test]
    fn modify_face_moves_between_patch_and_zone() {
        let mut mesh = one_cell_mesh();
        let mut edits = TopoChange::new(&mesh);
        // Detach face 1 from its cell: zone-only face.
        edits.modify_face(
            FaceId::new(1),
            FaceModification {
                points: None,
                owner: None,
                neighbour: None,
                patch: None,
                zone: Some(0),
                zone_flip: false,
            },
        );
        edits.apply(&mut mesh).unwrap();
        assert_eq!(mesh.owner()[1], None);
        assert!(!mesh.patches()[0].faces.contains(&FaceId::new(1)));
        assert_eq!(mesh.face_zones()[0].faces, vec![FaceId::new(1)]);
    }

    #[test]
    fn stale_edit_list_is_rejected() {
        let mut mesh = one_cell_mesh();
        let edits = TopoChange::new(&mesh);
        let mut other = TopoChange::new(&mesh);
        other.add_point(Point3::ZERO, None);
        other.apply(&mut mesh).unwrap();
        // The first list was opened against the smaller mesh.
        let err = edits.apply(&mut mesh).unwrap_err();
        assert!(matches!(err, MeshSlideError::InconsistentAddressing(_)));
    }

    #[test]
    fn out_of_range_edits_leave_mesh_untouched() {
        let mut mesh = one_cell_mesh();
        let before_points = mesh.n_points();
        let mut edits = TopoChange::new(&mesh);
        edits.remove_face(FaceId::new(99));
        let err = edits.apply(&mut mesh).unwrap_err();
        assert!(matches!(err, MeshSlideError::EditOutOfRange { .. }));
        assert_eq!(mesh.n_points(), before_points);
        assert_eq!(mesh.n_faces(), 6);
    }

    #[test]
    fn removed_point_still_referenced_is_rejected() {
        let mut mesh = one_cell_mesh();
        let mut edits = TopoChange::new(&mesh);
        edits.remove_point(pid(0));
        // Point 0 is used by three faces that were not removed.
        assert!(edits.apply(&mut mesh).is_err());
    }
}
