//! Mesh-side collaborator contracts: the polyhedral mesh, the atomic
//! topology edit list, and the modifier dispatch.

pub mod edit;
pub mod modifier;
pub mod poly_mesh;

pub use edit::{FaceModification, TopoChange, TopoMap};
pub use modifier::{TopoChanger, TopologyModifier};
pub use poly_mesh::{BoundaryPatch, FaceZone, PointZone, PolyMesh};
