//! Topology modifiers and the modifier list driving the edit cycle.
//!
//! The modifier set is closed in practice, so dispatch is a tagged enum
//! rather than an open runtime-registered factory. Each cycle the list is
//! queried once per modifier; if any modifier reports a pending topology
//! change, all active modifiers emit their edits into one shared
//! [`TopoChange`], the batch is applied atomically, and every modifier is
//! called back to update its cached addressing against the renumbering.

use crate::geometry::Point3;
use crate::interface::SlidingInterface;
use crate::mesh_error::MeshSlideError;
use crate::mesh::edit::{TopoChange, TopoMap};
use crate::mesh::poly_mesh::PolyMesh;

/// The closed set of dynamic-mesh modifier kinds.
#[derive(Debug)]
pub enum TopologyModifier {
    SlidingInterface(Box<SlidingInterface>),
}

impl TopologyModifier {
    /// The modifier's instance name.
    pub fn name(&self) -> &str {
        match self {
            Self::SlidingInterface(s) => s.name(),
        }
    }

    /// True when the modifier takes part in topology changes.
    pub fn active(&self) -> bool {
        match self {
            Self::SlidingInterface(s) => s.active(),
        }
    }

    /// Asks the modifier whether the topology must change this cycle.
    pub fn change_topology(&self, mesh: &PolyMesh) -> Result<bool, MeshSlideError> {
        match self {
            Self::SlidingInterface(s) => s.change_topology(mesh),
        }
    }

    /// Emits the modifier's topology edits into the shared list.
    pub fn set_refinement(
        &mut self,
        mesh: &PolyMesh,
        edits: &mut TopoChange,
    ) -> Result<(), MeshSlideError> {
        match self {
            Self::SlidingInterface(s) => s.set_refinement(mesh, edits),
        }
    }

    /// Adjusts motion-solved positions of points the modifier owns.
    pub fn modify_motion_points(
        &self,
        mesh: &PolyMesh,
        positions: &mut [Point3],
    ) -> Result<(), MeshSlideError> {
        match self {
            Self::SlidingInterface(s) => s.modify_motion_points(mesh, positions),
        }
    }

    /// Rebinds cached identifiers after a topology change.
    pub fn update_mesh(&mut self, mesh: &PolyMesh, map: &TopoMap) {
        match self {
            Self::SlidingInterface(s) => s.update_mesh(mesh, map),
        }
    }
}

/// An ordered list of topology modifiers attached to one mesh.
#[derive(Debug, Default)]
pub struct TopoChanger {
    modifiers: Vec<TopologyModifier>,
}

impl TopoChanger {
    pub fn new(modifiers: Vec<TopologyModifier>) -> Self {
        Self { modifiers }
    }

    #[inline]
    pub fn modifiers(&self) -> &[TopologyModifier] {
        &self.modifiers
    }

    #[inline]
    pub fn modifiers_mut(&mut self) -> &mut [TopologyModifier] {
        &mut self.modifiers
    }

    pub fn push(&mut self, modifier: TopologyModifier) {
        self.modifiers.push(modifier);
    }

    /// Runs one mesh-change cycle.
    ///
    /// Returns the renumbering map when a topology change was applied,
    /// `None` when the cycle was quiet. All edits from all modifiers are
    /// collected before the single atomic apply; afterwards every
    /// modifier rebinds its identifiers against the new numbering.
    pub fn update(&mut self, mesh: &mut PolyMesh) -> Result<Option<TopoMap>, MeshSlideError> {
        let mut changing = false;
        for modifier in self.modifiers.iter().filter(|m| m.active()) {
            if modifier.change_topology(mesh)? {
                changing = true;
            }
        }
        if !changing {
            return Ok(None);
        }

        let mut edits = TopoChange::new(mesh);
        for modifier in self.modifiers.iter_mut().filter(|m| m.active()) {
            modifier.set_refinement(mesh, &mut edits)?;
        }
        if edits.is_empty() {
            return Ok(None);
        }

        let map = edits.apply(mesh)?;
        for modifier in &mut self.modifiers {
            modifier.update_mesh(mesh, &map);
        }
        log::debug!("topology change applied across {} modifiers", self.modifiers.len());
        Ok(Some(map))
    }

    /// Lets every modifier adjust motion-solved point positions.
    pub fn modify_motion_points(
        &self,
        mesh: &PolyMesh,
        positions: &mut [Point3],
    ) -> Result<(), MeshSlideError> {
        for modifier in self.modifiers.iter().filter(|m| m.active()) {
            modifier.modify_motion_points(mesh, positions)?;
        }
        Ok(())
    }
}
