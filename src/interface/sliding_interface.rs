//! The sliding interface: state machine and dynamic-mesh-modifier
//! contract.
//!
//! The interface owns the projection engine, the attached addressing and
//! the coupler/decoupler, and decides once per mesh-change cycle whether
//! the topology must change. Lazily computed caches (projected points,
//! cut-face lists) live behind interior mutability restricted to the
//! cache fields: read-only accessors may populate them, repeated calls
//! are safe and idempotent, and invalidation is an explicit transition.
//! Everything else requires `&mut self`.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::{Line, Point3};
use crate::interface::addressing::{
    FaceCellAddressing, calc_attached_addressing, check_attached_consistency,
};
use crate::interface::config::{SlidingInterfaceConfig, Tolerances};
use crate::interface::couple::{CoupleContext, couple_interface, intersect_edge_pair};
use crate::interface::decouple::{clear_couple, decouple_interface};
use crate::interface::persist::InterfaceDict;
use crate::interface::projection::{ProjectedPoint, project_slave_points};
use crate::mesh_error::MeshSlideError;
use crate::mesh::edit::{TopoChange, TopoMap};
use crate::mesh::poly_mesh::PolyMesh;
use crate::topology::cache::InvalidateCache;
use crate::topology::edge::EdgePair;
use crate::topology::patch::{LocalEdge, PrimitivePatch};
use crate::topology::point::{FaceId, PointId};
use crate::topology::zone::ZoneBinding;
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

/// A sliding interface between two independently meshed zone surfaces.
#[derive(Debug)]
pub struct SlidingInterface {
    config: SlidingInterfaceConfig,
    active: bool,

    master_face_zone_id: ZoneBinding,
    slave_face_zone_id: ZoneBinding,
    cut_point_zone_id: ZoneBinding,
    cut_face_zone_id: ZoneBinding,
    master_patch_id: ZoneBinding,
    slave_patch_id: ZoneBinding,

    attached: bool,
    /// Forces a re-couple at the next edit emission.
    trigger: Cell<bool>,

    // Authoritative addressing while attached; recomputed on demand while
    // detached.
    face_cells: Option<FaceCellAddressing>,
    retired_point_map: Option<BTreeMap<PointId, PointId>>,
    cut_point_edge_pair_map: Option<BTreeMap<PointId, EdgePair>>,

    // Lazily computed, invalidatable caches. The projection is replaced
    // in place from read-only queries, so it sits in a RefCell; the
    // cut-face lists are set once per couple and dropped explicitly.
    projected_points: RefCell<Option<Vec<ProjectedPoint>>>,
    cut_face_master: OnceCell<Vec<Vec<FaceId>>>,
    cut_face_slave: OnceCell<Vec<Vec<FaceId>>>,
}

impl SlidingInterface {
    /// Creates a detached interface from its configuration.
    ///
    /// `attached` mirrors the persisted flag and must be `false` here:
    /// the attached addressing cannot be derived without the persisted
    /// provenance, so an attached interface can only be restored with
    /// [`SlidingInterface::from_dict`].
    pub fn from_components(
        config: SlidingInterfaceConfig,
        mesh: &PolyMesh,
        attached: bool,
    ) -> Result<Self, MeshSlideError> {
        if attached {
            return Err(MeshSlideError::AttachedFromComponents);
        }
        let mut interface = Self::unbound(config, true);
        interface.rebind(mesh);
        interface.check_definition(mesh)?;
        interface.face_cells = Some(calc_attached_addressing(
            mesh,
            interface.master_zone_index()?,
            interface.slave_zone_index()?,
        )?);
        Ok(interface)
    }

    /// Restores an interface from its persisted dictionary.
    pub fn from_dict(dict: InterfaceDict, mesh: &PolyMesh) -> Result<Self, MeshSlideError> {
        let InterfaceDict {
            config,
            attached,
            active,
            master_face_cells,
            slave_face_cells,
            master_stick_out_faces,
            slave_stick_out_faces,
            retired_point_map,
            cut_point_edge_pair_map,
        } = dict;

        let mut interface = Self::unbound(config, active);
        interface.rebind(mesh);
        interface.check_definition(mesh)?;

        if attached {
            log::debug!(
                "sliding interface `{}`: attached; reading master and slave face zone \
                 addressing and retired point lookup",
                interface.config.name
            );
            fn require<T>(
                value: Option<T>,
                entry: &'static str,
            ) -> Result<T, MeshSlideError> {
                value.ok_or(MeshSlideError::MissingAttachedEntry { entry })
            }
            interface.face_cells = Some(FaceCellAddressing {
                master_face_cells: require(master_face_cells, "masterFaceCells")?,
                slave_face_cells: require(slave_face_cells, "slaveFaceCells")?,
                master_stick_out_faces: require(master_stick_out_faces, "masterStickOutFaces")?,
                slave_stick_out_faces: require(slave_stick_out_faces, "slaveStickOutFaces")?,
            });
            interface.retired_point_map =
                Some(require(retired_point_map, "retiredPointMap")?.into_iter().collect());
            interface.cut_point_edge_pair_map = Some(
                require(cut_point_edge_pair_map, "cutPointEdgePairMap")?
                    .into_iter()
                    .collect(),
            );
            interface.attached = true;

            let master = interface.master_patch(mesh)?;
            let slave = interface.slave_patch(mesh)?;
            if let (Some(rpm), Some(cpepm)) = (
                &interface.retired_point_map,
                &interface.cut_point_edge_pair_map,
            ) {
                check_attached_consistency(rpm, cpepm, &master, &slave)?;
            }
        } else {
            interface.face_cells = Some(calc_attached_addressing(
                mesh,
                interface.master_zone_index()?,
                interface.slave_zone_index()?,
            )?);
        }

        Ok(interface)
    }

    fn unbound(config: SlidingInterfaceConfig, active: bool) -> Self {
        let master_face_zone_id = ZoneBinding::new(config.master_face_zone_name.clone());
        let slave_face_zone_id = ZoneBinding::new(config.slave_face_zone_name.clone());
        let cut_point_zone_id = ZoneBinding::new(config.cut_point_zone_name.clone());
        let cut_face_zone_id = ZoneBinding::new(config.cut_face_zone_name.clone());
        let master_patch_id = ZoneBinding::new(config.master_patch_name.clone());
        let slave_patch_id = ZoneBinding::new(config.slave_patch_name.clone());
        Self {
            config,
            active,
            master_face_zone_id,
            slave_face_zone_id,
            cut_point_zone_id,
            cut_face_zone_id,
            master_patch_id,
            slave_patch_id,
            attached: false,
            trigger: Cell::new(false),
            face_cells: None,
            retired_point_map: None,
            cut_point_edge_pair_map: None,
            projected_points: RefCell::new(None),
            cut_face_master: OnceCell::new(),
            cut_face_slave: OnceCell::new(),
        }
    }

    fn rebind(&mut self, mesh: &PolyMesh) {
        self.master_face_zone_id.rebind(mesh.face_zones());
        self.slave_face_zone_id.rebind(mesh.face_zones());
        self.cut_point_zone_id.rebind(mesh.point_zones());
        self.cut_face_zone_id.rebind(mesh.face_zones());
        self.master_patch_id.rebind(mesh.patches());
        self.slave_patch_id.rebind(mesh.patches());
    }

    /// Checks that all six identifiers are bound and the coupling zones
    /// are not empty. Any failure is a fatal configuration error.
    pub fn check_definition(&self, mesh: &PolyMesh) -> Result<(), MeshSlideError> {
        let required: [(&ZoneBinding, &'static str); 6] = [
            (&self.master_face_zone_id, "master face zone"),
            (&self.slave_face_zone_id, "slave face zone"),
            (&self.cut_point_zone_id, "cut point zone"),
            (&self.cut_face_zone_id, "cut face zone"),
            (&self.master_patch_id, "master patch"),
            (&self.slave_patch_id, "slave patch"),
        ];
        for (binding, role) in required {
            if !binding.active() {
                return Err(MeshSlideError::UnboundZone {
                    name: binding.name().to_string(),
                    role,
                });
            }
        }

        for binding in [&self.master_face_zone_id, &self.slave_face_zone_id] {
            let zonei = binding.index().ok_or_else(|| MeshSlideError::UnboundZone {
                name: binding.name().to_string(),
                role: "face zone",
            })?;
            if mesh.face_zones()[zonei].is_empty() {
                return Err(MeshSlideError::EmptyZone {
                    name: binding.name().to_string(),
                });
            }
        }

        log::debug!(
            "sliding interface `{}`: master face zone {:?}, slave face zone {:?}",
            self.config.name,
            self.master_face_zone_id.index(),
            self.slave_face_zone_id.index(),
        );
        Ok(())
    }

    /// Instance name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// True when the modifier takes part in topology changes.
    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }

    /// True while the interface is coupled.
    #[inline]
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// The interface configuration.
    #[inline]
    pub fn config(&self) -> &SlidingInterfaceConfig {
        &self.config
    }

    /// Master face zone identifier.
    #[inline]
    pub fn master_face_zone_id(&self) -> &ZoneBinding {
        &self.master_face_zone_id
    }

    /// Slave face zone identifier.
    #[inline]
    pub fn slave_face_zone_id(&self) -> &ZoneBinding {
        &self.slave_face_zone_id
    }

    /// Overrides the tolerances, optionally logging the resulting set.
    pub fn set_tolerances(&mut self, tolerances: Tolerances, report: bool) {
        self.config.tolerances = tolerances;
        if report {
            self.config.tolerances.report();
        }
    }

    fn zone_index(binding: &ZoneBinding, role: &'static str) -> Result<usize, MeshSlideError> {
        binding.index().ok_or_else(|| MeshSlideError::UnboundZone {
            name: binding.name().to_string(),
            role,
        })
    }

    fn master_zone_index(&self) -> Result<usize, MeshSlideError> {
        Self::zone_index(&self.master_face_zone_id, "master face zone")
    }

    fn slave_zone_index(&self) -> Result<usize, MeshSlideError> {
        Self::zone_index(&self.slave_face_zone_id, "slave face zone")
    }

    fn cut_point_zone_index(&self) -> Result<usize, MeshSlideError> {
        Self::zone_index(&self.cut_point_zone_id, "cut point zone")
    }

    fn cut_face_zone_index(&self) -> Result<usize, MeshSlideError> {
        Self::zone_index(&self.cut_face_zone_id, "cut face zone")
    }

    fn master_patch(&self, mesh: &PolyMesh) -> Result<PrimitivePatch, MeshSlideError> {
        Ok(PrimitivePatch::new(
            &mesh.zone_faces(self.master_zone_index()?),
            mesh.points(),
        ))
    }

    fn slave_patch(&self, mesh: &PolyMesh) -> Result<PrimitivePatch, MeshSlideError> {
        Ok(PrimitivePatch::new(
            &mesh.zone_faces(self.slave_zone_index()?),
            mesh.points(),
        ))
    }

    /// Recomputes the slave point projection.
    ///
    /// Returns true when the projection differs enough from the previous
    /// one to require re-cutting: any point moved by more than
    /// `point_merge` of its local edge length, or no previous projection
    /// exists.
    pub fn project_points(&self, mesh: &PolyMesh) -> Result<bool, MeshSlideError> {
        let master = self.master_patch(mesh)?;
        let slave = self.slave_patch(mesh)?;
        let new = project_slave_points(&master, &slave, self.config.projection);

        let changed = {
            let prev = self.projected_points.borrow();
            match prev.as_ref() {
                None => true,
                Some(prev) if prev.len() != new.len() => true,
                Some(prev) => prev.iter().zip(&new).enumerate().any(|(pointi, (p, q))| {
                    p.point.dist(q.point)
                        > self.config.tolerances.point_merge * slave.min_edge_length_at(pointi)
                }),
            }
        };
        *self.projected_points.borrow_mut() = Some(new);
        Ok(changed)
    }

    /// The projected slave points, computing them if needed.
    ///
    /// Safe to call repeatedly; over unchanged geometry the result is
    /// bitwise identical.
    pub fn point_projection(&self, mesh: &PolyMesh) -> Result<Vec<Point3>, MeshSlideError> {
        if self.projected_points.borrow().is_none() {
            self.project_points(mesh)?;
        }
        Ok(self
            .projected_points
            .borrow()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|pp| pp.point)
            .collect())
    }

    /// Drops the projected points; the next use recomputes them.
    pub fn clear_point_projection(&self) {
        self.projected_points.borrow_mut().take();
    }

    /// Drops the cheap cut-face caches only. The four addressing maps
    /// are authoritative once attached and survive this call.
    pub fn clear_addressing(&mut self) {
        self.cut_face_master.take();
        self.cut_face_slave.take();
    }

    /// Cut faces per master zone-local face, while cached.
    pub fn cut_face_master(&self) -> Option<&[Vec<FaceId>]> {
        self.cut_face_master.get().map(Vec::as_slice)
    }

    /// Cut faces per slave zone-local face, while cached.
    pub fn cut_face_slave(&self) -> Option<&[Vec<FaceId>]> {
        self.cut_face_slave.get().map(Vec::as_slice)
    }

    /// Asks whether the topology must change this cycle.
    ///
    /// In couple-decouple mode this always reports true, re-projecting
    /// the points while detached so they are current for the next couple.
    /// Otherwise an attached interface over a quiescent mesh is stable,
    /// and anything else is projection-delta gated.
    pub fn change_topology(&self, mesh: &PolyMesh) -> Result<bool, MeshSlideError> {
        if self.config.couple_decouple {
            log::debug!(
                "sliding interface `{}`: couple-decouple mode",
                self.config.name
            );
            if !self.attached {
                self.project_points(mesh)?;
            }
            return Ok(true);
        }

        if self.attached && !mesh.is_changing() {
            // Stable: attached and the mesh is not moving or morphing.
            return Ok(false);
        }

        let changed = self.project_points(mesh)?;
        if changed {
            self.trigger.set(true);
        }
        Ok(changed)
    }

    /// Emits this cycle's topology edits into the shared list.
    pub fn set_refinement(
        &mut self,
        mesh: &PolyMesh,
        edits: &mut TopoChange,
    ) -> Result<(), MeshSlideError> {
        if self.config.couple_decouple {
            if self.attached {
                self.emit_decouple(mesh, edits)?;
            } else {
                self.emit_couple(mesh, edits, false)?;
            }
            return Ok(());
        }

        if self.trigger.get() {
            let recoupling = self.attached;
            if recoupling {
                // Undo the previous cut without restoring the original
                // patches; the fresh couple follows in the same batch.
                clear_couple(
                    mesh,
                    self.cut_point_zone_index()?,
                    self.cut_face_zone_index()?,
                    edits,
                );
                self.retired_point_map = None;
                self.cut_point_edge_pair_map = None;
                self.clear_addressing();
                self.attached = false;
            }
            self.emit_couple(mesh, edits, recoupling)?;
            self.trigger.set(false);
        }
        Ok(())
    }

    fn emit_couple(
        &mut self,
        mesh: &PolyMesh,
        edits: &mut TopoChange,
        after_clear: bool,
    ) -> Result<(), MeshSlideError> {
        let cut_point_zone = self.cut_point_zone_index()?;
        let cut_face_zone = self.cut_face_zone_index()?;

        if !after_clear
            && (!mesh.point_zones()[cut_point_zone].points.is_empty()
                || !mesh.face_zones()[cut_face_zone].faces.is_empty())
        {
            return Err(MeshSlideError::InconsistentAddressing(
                "cut zones must be empty before coupling".into(),
            ));
        }

        if self.face_cells.is_none() {
            self.face_cells = Some(calc_attached_addressing(
                mesh,
                self.master_zone_index()?,
                self.slave_zone_index()?,
            )?);
        }
        if self.projected_points.borrow().is_none() {
            self.project_points(mesh)?;
        }

        let maps = {
            let addressing = self.face_cells.as_ref().ok_or_else(|| {
                MeshSlideError::InconsistentAddressing("face-cell addressing missing".into())
            })?;
            let guard = self.projected_points.borrow();
            let projected = guard.as_ref().ok_or_else(|| {
                MeshSlideError::InconsistentAddressing("point projection missing".into())
            })?;
            let ctx = CoupleContext {
                mesh,
                master_zone: self.master_zone_index()?,
                slave_zone: self.slave_zone_index()?,
                cut_point_zone,
                cut_face_zone,
                master_patch_index: Self::zone_index(&self.master_patch_id, "master patch")?,
                slave_patch_index: Self::zone_index(&self.slave_patch_id, "slave patch")?,
                addressing,
                tolerances: &self.config.tolerances,
                match_type: self.config.match_type,
            };
            couple_interface(&ctx, projected, edits)?
        };

        self.retired_point_map = Some(maps.retired_point_map);
        self.cut_point_edge_pair_map = Some(maps.cut_point_edge_pair_map);
        self.cut_face_master.take();
        let _ = self.cut_face_master.set(maps.cut_face_master);
        self.cut_face_slave.take();
        let _ = self.cut_face_slave.set(maps.cut_face_slave);
        self.attached = true;
        Ok(())
    }

    fn emit_decouple(
        &mut self,
        mesh: &PolyMesh,
        edits: &mut TopoChange,
    ) -> Result<(), MeshSlideError> {
        let addressing = self.face_cells.as_ref().ok_or_else(|| {
            MeshSlideError::InconsistentAddressing(
                "decoupling without attached addressing".into(),
            )
        })?;
        decouple_interface(
            mesh,
            self.master_zone_index()?,
            self.slave_zone_index()?,
            self.cut_point_zone_index()?,
            self.cut_face_zone_index()?,
            Self::zone_index(&self.master_patch_id, "master patch")?,
            Self::zone_index(&self.slave_patch_id, "slave patch")?,
            addressing,
            edits,
        )?;

        self.attached = false;
        self.face_cells = None;
        self.retired_point_map = None;
        self.cut_point_edge_pair_map = None;
        self.invalidate_cache();
        Ok(())
    }

    /// Recomputes the positions of cut points after an external motion
    /// solve, writing into the caller's point field.
    ///
    /// A retired cut point follows its projected slave point; an
    /// edge-intersection cut point is recomputed from its provenance
    /// exactly as in the couple. A cut point that is neither is a fatal
    /// data-mapping error.
    pub fn modify_motion_points(
        &self,
        mesh: &PolyMesh,
        positions: &mut [Point3],
    ) -> Result<(), MeshSlideError> {
        let cut_points = &mesh.point_zones()[self.cut_point_zone_index()?].points;
        if cut_points.is_empty() {
            return Ok(());
        }
        let guard = self.projected_points.borrow();
        let projected = match guard.as_ref() {
            Some(projected) => projected,
            // Nothing to adjust against without a projection.
            None => return Ok(()),
        };
        let rpm = self.retired_point_map.as_ref().ok_or_else(|| {
            MeshSlideError::InconsistentAddressing("retired point map missing".into())
        })?;
        let cpepm = self.cut_point_edge_pair_map.as_ref().ok_or_else(|| {
            MeshSlideError::InconsistentAddressing("cut point provenance missing".into())
        })?;

        let master = self.master_patch(mesh)?;
        let slave = self.slave_patch(mesh)?;
        let tol = &self.config.tolerances;

        for &cut_point in cut_points {
            if let Some(&slave_global) = rpm.get(&cut_point) {
                // Retired: follow the projected slave point.
                let local = slave.which_point(slave_global).ok_or(
                    MeshSlideError::StaleProvenance {
                        point: cut_point,
                        side: "slave",
                    },
                )?;
                positions[cut_point.index()] = projected[local].point;
                log::trace!("cut point {cut_point}: retired, following slave point {slave_global}");
            } else if let Some(pair) = cpepm.get(&cut_point) {
                // Edge intersection: recompute the cut from provenance.
                let resolve = |patch: &PrimitivePatch,
                               edge: crate::topology::edge::Edge,
                               side: &'static str|
                 -> Result<usize, MeshSlideError> {
                    let stale = MeshSlideError::StaleProvenance {
                        point: cut_point,
                        side,
                    };
                    let start = patch.which_point(edge.start).ok_or_else(|| stale.clone())?;
                    let end = patch.which_point(edge.end).ok_or_else(|| stale.clone())?;
                    patch
                        .which_edge(LocalEdge::new(start, end))
                        .ok_or(stale)
                };
                let master_edge = resolve(&master, pair.master, "master")?;
                let slave_edge = resolve(&slave, pair.slave, "slave")?;

                let stored = slave.edges()[slave_edge];
                let projected_line =
                    Line::new(projected[stored.start].point, projected[stored.end].point);
                let plane_third = ((slave.local_points()[stored.start]
                    + slave.point_normals()[stored.start])
                    + (slave.local_points()[stored.end] + slave.point_normals()[stored.end]))
                    * 0.5;

                let cut = intersect_edge_pair(
                    &master.edge_line(master_edge),
                    &projected_line,
                    plane_third,
                    tol,
                )?;
                positions[cut_point.index()] = cut.point;
                log::trace!("cut point {cut_point}: edge intersection recomputed");
            } else {
                return Err(MeshSlideError::UnclassifiablePoint { point: cut_point });
            }
        }
        Ok(())
    }

    /// Rebinds the six identifiers and renumbers the cached addressing
    /// after a topology change.
    pub fn update_mesh(&mut self, mesh: &PolyMesh, map: &TopoMap) {
        log::debug!("sliding interface `{}`: updating topology", self.config.name);
        self.rebind(mesh);

        if let Some(addressing) = &mut self.face_cells {
            for cell in addressing
                .master_face_cells
                .iter_mut()
                .chain(addressing.slave_face_cells.iter_mut())
            {
                if let Some(new) = map.cell(*cell) {
                    *cell = new;
                }
            }
            renumber_faces(&mut addressing.master_stick_out_faces, map);
            renumber_faces(&mut addressing.slave_stick_out_faces, map);
        }
        if let Some(rpm) = self.retired_point_map.take() {
            self.retired_point_map = Some(
                rpm.into_iter()
                    .filter_map(|(cut_point, slave_point)| {
                        Some((map.point(cut_point)?, map.point(slave_point)?))
                    })
                    .collect(),
            );
        }
        if let Some(cpepm) = self.cut_point_edge_pair_map.take() {
            self.cut_point_edge_pair_map = Some(
                cpepm
                    .into_iter()
                    .filter_map(|(cut_point, pair)| {
                        let remap = |e: crate::topology::edge::Edge| {
                            Some(crate::topology::edge::Edge::new(
                                map.point(e.start)?,
                                map.point(e.end)?,
                            ))
                        };
                        Some((
                            map.point(cut_point)?,
                            EdgePair {
                                master: remap(pair.master)?,
                                slave: remap(pair.slave)?,
                            },
                        ))
                    })
                    .collect(),
            );
        }
        self.clear_addressing();
    }

    /// The persisted form of this interface.
    pub fn to_dict(&self) -> InterfaceDict {
        let (master_face_cells, slave_face_cells, master_stick_out_faces, slave_stick_out_faces) =
            if self.attached {
                match &self.face_cells {
                    Some(a) => (
                        Some(a.master_face_cells.clone()),
                        Some(a.slave_face_cells.clone()),
                        Some(a.master_stick_out_faces.clone()),
                        Some(a.slave_stick_out_faces.clone()),
                    ),
                    None => (None, None, None, None),
                }
            } else {
                (None, None, None, None)
            };
        InterfaceDict {
            config: self.config.clone(),
            attached: self.attached,
            active: self.active,
            master_face_cells,
            slave_face_cells,
            master_stick_out_faces,
            slave_stick_out_faces,
            retired_point_map: self
                .attached
                .then(|| {
                    self.retired_point_map
                        .as_ref()
                        .map(|m| m.iter().map(|(&k, &v)| (k, v)).collect())
                })
                .flatten(),
            cut_point_edge_pair_map: self
                .attached
                .then(|| {
                    self.cut_point_edge_pair_map
                        .as_ref()
                        .map(|m| m.iter().map(|(&k, &v)| (k, v)).collect())
                })
                .flatten(),
        }
    }
}

impl InvalidateCache for SlidingInterface {
    fn invalidate_cache(&mut self) {
        self.clear_point_projection();
        self.clear_addressing();
    }
}

fn renumber_faces(faces: &mut Vec<FaceId>, map: &TopoMap) {
    let before = faces.len();
    *faces = faces.iter().filter_map(|&f| map.face(f)).collect();
    if faces.len() != before {
        log::warn!(
            "{} stick-out faces disappeared during renumbering",
            before - faces.len()
        );
    }
}

impl fmt::Display for SlidingInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slidingInterface {}", self.config.name)?;
        writeln!(f, "    master face zone: {}", self.master_face_zone_id.name())?;
        writeln!(f, "    slave face zone: {}", self.slave_face_zone_id.name())?;
        writeln!(f, "    cut point zone: {}", self.cut_point_zone_id.name())?;
        writeln!(f, "    cut face zone: {}", self.cut_face_zone_id.name())?;
        writeln!(f, "    master patch: {}", self.master_patch_id.name())?;
        writeln!(f, "    slave patch: {}", self.slave_patch_id.name())?;
        writeln!(f, "    couple-decouple: {}", self.config.couple_decouple)?;
        write!(f, "    attached: {}", self.attached)
    }
}

impl DebugInvariants for SlidingInterface {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "SlidingInterface");
    }

    /// Structural attached-state invariants: all four addressing maps
    /// populated, every retired slave point unique. Geometric consistency
    /// against the patches is verified where the mesh is available
    /// (restore and couple time).
    fn validate_invariants(&self) -> Result<(), MeshSlideError> {
        if !self.attached {
            return Ok(());
        }
        if self.face_cells.is_none() {
            return Err(MeshSlideError::InconsistentAddressing(
                "attached without face-cell addressing".into(),
            ));
        }
        let rpm = self.retired_point_map.as_ref().ok_or_else(|| {
            MeshSlideError::InconsistentAddressing("attached without retired point map".into())
        })?;
        if self.cut_point_edge_pair_map.is_none() {
            return Err(MeshSlideError::InconsistentAddressing(
                "attached without provenance map".into(),
            ));
        }

        let mut seen = std::collections::HashSet::with_capacity(rpm.len());
        for slave_point in rpm.values() {
            if !seen.insert(*slave_point) {
                return Err(MeshSlideError::InconsistentAddressing(format!(
                    "slave point {slave_point} retired more than once"
                )));
            }
        }
        Ok(())
    }
}
