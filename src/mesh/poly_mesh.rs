//! Slim polyhedral mesh: the collaborator surface consumed by the
//! sliding interface.
//!
//! Only what the topology-change engine needs is modelled: the point
//! field, faces with owner/neighbour cells, boundary patches, face and
//! point zones, and the "mesh is currently moving/morphing" flag. Faces
//! may be detached from cells entirely (owner `None`): such zone-only
//! faces carry a zone surface through an attached interface without
//! participating in cell connectivity.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::Point3;
use crate::mesh_error::MeshSlideError;
use crate::topology::point::{CellId, FaceId, PointId};
use crate::topology::zone::Named;
use serde::{Deserialize, Serialize};

/// A named, ordered subset of mesh faces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceZone {
    pub name: String,
    /// Zone members; the position in this list is the zone-local index.
    pub faces: Vec<FaceId>,
    /// Per-member orientation flip relative to the zone surface.
    pub flip: Vec<bool>,
}

impl FaceZone {
    pub fn new(name: impl Into<String>, faces: Vec<FaceId>) -> Self {
        let flip = vec![false; faces.len()];
        Self {
            name: name.into(),
            faces,
            flip,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Zone-local index of a face, if a member.
    pub fn which_face(&self, face: FaceId) -> Option<usize> {
        self.faces.iter().position(|&f| f == face)
    }
}

impl Named for FaceZone {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named, ordered subset of mesh points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointZone {
    pub name: String,
    pub points: Vec<PointId>,
}

impl PointZone {
    pub fn new(name: impl Into<String>, points: Vec<PointId>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

impl Named for PointZone {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named boundary patch holding an explicit face list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPatch {
    pub name: String,
    pub faces: Vec<FaceId>,
}

impl BoundaryPatch {
    pub fn new(name: impl Into<String>, faces: Vec<FaceId>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }
}

impl Named for BoundaryPatch {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The polyhedral mesh.
#[derive(Clone, Debug)]
pub struct PolyMesh {
    points: Vec<Point3>,
    /// Per-face point loop.
    faces: Vec<Vec<PointId>>,
    /// Owning cell per face; `None` for zone-only faces.
    owner: Vec<Option<CellId>>,
    /// Neighbour cell per face; `Some` only on internal faces.
    neighbour: Vec<Option<CellId>>,
    n_cells: usize,
    patches: Vec<BoundaryPatch>,
    face_zones: Vec<FaceZone>,
    point_zones: Vec<PointZone>,
    /// True while the mesh is moving or morphing this cycle.
    changing: bool,
}

impl PolyMesh {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        points: Vec<Point3>,
        faces: Vec<Vec<PointId>>,
        owner: Vec<Option<CellId>>,
        neighbour: Vec<Option<CellId>>,
        n_cells: usize,
        patches: Vec<BoundaryPatch>,
        face_zones: Vec<FaceZone>,
        point_zones: Vec<PointZone>,
    ) -> Self {
        let mesh = Self {
            points,
            faces,
            owner,
            neighbour,
            n_cells,
            patches,
            face_zones,
            point_zones,
            changing: false,
        };
        mesh.debug_assert_invariants();
        mesh
    }

    #[inline]
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    #[inline]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[inline]
    pub fn faces(&self) -> &[Vec<PointId>] {
        &self.faces
    }

    #[inline]
    pub fn owner(&self) -> &[Option<CellId>] {
        &self.owner
    }

    #[inline]
    pub fn neighbour(&self) -> &[Option<CellId>] {
        &self.neighbour
    }

    #[inline]
    pub fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }

    #[inline]
    pub fn face_zones(&self) -> &[FaceZone] {
        &self.face_zones
    }

    #[inline]
    pub fn point_zones(&self) -> &[PointZone] {
        &self.point_zones
    }

    /// True while the mesh is moving or morphing this cycle.
    #[inline]
    pub fn is_changing(&self) -> bool {
        self.changing
    }

    pub fn set_changing(&mut self, changing: bool) {
        self.changing = changing;
    }

    /// Replace the point field (mesh motion). Topology is untouched.
    pub fn move_points(&mut self, points: Vec<Point3>) -> Result<(), MeshSlideError> {
        if points.len() != self.points.len() {
            return Err(MeshSlideError::EditOutOfRange {
                kind: "point field",
                index: points.len(),
                size: self.points.len(),
            });
        }
        self.points = points;
        self.changing = true;
        Ok(())
    }

    /// The face definitions of a zone, in zone-local order.
    pub fn zone_faces(&self, zonei: usize) -> Vec<Vec<PointId>> {
        self.face_zones[zonei]
            .faces
            .iter()
            .map(|f| self.faces[f.index()].clone())
            .collect()
    }

    /// True when the face is internal (connects two cells).
    #[inline]
    pub fn is_internal_face(&self, face: FaceId) -> bool {
        self.neighbour[face.index()].is_some()
    }

    // Crate-internal mutable access for the edit application.
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut Vec<Point3>,
        &mut Vec<Vec<PointId>>,
        &mut Vec<Option<CellId>>,
        &mut Vec<Option<CellId>>,
        &mut usize,
        &mut Vec<BoundaryPatch>,
        &mut Vec<FaceZone>,
        &mut Vec<PointZone>,
    ) {
        (
            &mut self.points,
            &mut self.faces,
            &mut self.owner,
            &mut self.neighbour,
            &mut self.n_cells,
            &mut self.patches,
            &mut self.face_zones,
            &mut self.point_zones,
        )
    }
}

impl DebugInvariants for PolyMesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "PolyMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshSlideError> {
        let n_points = self.points.len();
        if self.owner.len() != self.faces.len() || self.neighbour.len() != self.faces.len() {
            return Err(MeshSlideError::InconsistentAddressing(format!(
                "owner/neighbour size {}/{} != face count {}",
                self.owner.len(),
                self.neighbour.len(),
                self.faces.len()
            )));
        }
        for (facei, face) in self.faces.iter().enumerate() {
            for p in face {
                if p.index() >= n_points {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "face point",
                        index: p.index(),
                        size: n_points,
                    });
                }
            }
            // A face with a neighbour must also have an owner.
            if self.neighbour[facei].is_some() && self.owner[facei].is_none() {
                return Err(MeshSlideError::InconsistentAddressing(format!(
                    "face {facei} has a neighbour but no owner"
                )));
            }
        }
        for patch in &self.patches {
            for f in &patch.faces {
                if f.index() >= self.faces.len() {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "patch face",
                        index: f.index(),
                        size: self.faces.len(),
                    });
                }
                if self.neighbour[f.index()].is_some() {
                    return Err(MeshSlideError::InconsistentAddressing(format!(
                        "patch `{}` contains internal face {}",
                        patch.name,
                        f.index()
                    )));
                }
            }
        }
        for zone in &self.face_zones {
            if zone.flip.len() != zone.faces.len() {
                return Err(MeshSlideError::InconsistentAddressing(format!(
                    "face zone `{}` flip map size mismatch",
                    zone.name
                )));
            }
            for f in &zone.faces {
                if f.index() >= self.faces.len() {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "zone face",
                        index: f.index(),
                        size: self.faces.len(),
                    });
                }
            }
        }
        for zone in &self.point_zones {
            for p in &zone.points {
                if p.index() >= n_points {
                    return Err(MeshSlideError::EditOutOfRange {
                        kind: "zone point",
                        index: p.index(),
                        size: n_points,
                    });
                }
            }
        }
        Ok(())
    }
}
