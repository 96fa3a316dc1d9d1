//! # mesh-slide
//!
//! mesh-slide is a sliding-interface topology-change engine for
//! polyhedral meshes. It lets two independently meshed, non-conforming
//! surface patches be geometrically intersected, re-cut and dynamically
//! coupled or decoupled as the mesh deforms or rotates, emitting the
//! result as atomic batches of point/face/cell edits.
//!
//! ## Features
//! - Pure geometric primitives for clipping interface cells (triangle and
//!   tetrahedron cuts with composable reduction operators)
//! - Name-bound zone and patch identifiers that survive mesh renumbering
//! - A point projection engine with selectable algorithms (nearest,
//!   visible, direct)
//! - The coupler/decoupler with provenance-tracked cut points, so cut
//!   positions can be recomputed after mesh motion without re-searching
//! - Persisted interface state for restart in the attached configuration
//!
//! ## Determinism
//!
//! All geometric scans run in ascending index order with strict
//! comparisons, so repeated evaluation over unchanged geometry is bitwise
//! reproducible. There is no hidden random tie-breaking anywhere.
//!
//! ## Error handling
//!
//! Every failure is a hard stop ([`mesh_error::MeshSlideError`]): a
//! plausible-but-wrong mesh topology is worse than an abort, so there is
//! no retry or silent recovery in this crate.

pub mod debug_invariants;
pub mod geometry;
pub mod interface;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Line, Plane, Point3, Vector3};
    pub use crate::interface::{
        InterfaceDict, MatchType, ProjectionAlgorithm, SlidingInterface, SlidingInterfaceConfig,
        Tolerances,
    };
    pub use crate::mesh::{
        BoundaryPatch, FaceZone, PointZone, PolyMesh, TopoChange, TopoChanger, TopoMap,
        TopologyModifier,
    };
    pub use crate::mesh_error::MeshSlideError;
    pub use crate::topology::{
        CellId, Edge, EdgePair, FaceId, InvalidateCache, PointId, PrimitivePatch, ZoneBinding,
    };
}
