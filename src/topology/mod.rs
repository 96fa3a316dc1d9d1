//! Topological identifiers and zone-surface addressing.
//!
//! This module provides the strong entity handles ([`point::PointId`],
//! [`point::FaceId`], [`point::CellId`]), edges with provenance pairs,
//! name->index zone bindings, and the [`patch::PrimitivePatch`] addressing
//! used by the coupling algorithms.

pub mod cache;
pub mod edge;
pub mod patch;
pub mod point;
pub mod zone;

pub use cache::InvalidateCache;
pub use edge::{Edge, EdgePair};
pub use patch::{LocalEdge, PrimitivePatch};
pub use point::{CellId, FaceId, PointId};
pub use zone::{Named, ZoneBinding};
