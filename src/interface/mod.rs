//! The sliding-interface engine.
//!
//! A sliding interface couples two independently meshed, non-conforming
//! zone surfaces: slave points are projected onto the master surface,
//! the two edge networks are intersected, and the resulting cut topology
//! is emitted as an atomic batch of mesh edits. The interface can later
//! be decoupled, restoring the two original boundary patches exactly.

pub mod addressing;
pub mod config;
pub(crate) mod couple;
pub(crate) mod decouple;
pub mod persist;
pub mod projection;
pub mod sliding_interface;

pub use config::{MatchType, ProjectionAlgorithm, SlidingInterfaceConfig, Tolerances};
pub use persist::InterfaceDict;
pub use projection::ProjectedPoint;
pub use sliding_interface::SlidingInterface;

#[cfg(test)]
mod tests;
