//! MeshSlideError: unified error type for mesh-slide public APIs
//!
//! Every failure in this crate is a hard stop. Producing a
//! plausible-but-wrong mesh topology silently is worse than aborting, so
//! there is no retry policy anywhere: an operation either completes and
//! produces a valid edit set, or it returns one of these errors with full
//! diagnostic context.

use crate::geometry::Point3;
use crate::topology::point::PointId;
use thiserror::Error;

/// Unified error type for mesh-slide operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshSlideError {
    /// A zone or patch identifier required by an interface definition
    /// could not be resolved by name.
    #[error("zone or patch `{name}` ({role}) not found; check the mesh definition")]
    UnboundZone {
        /// Name that failed to resolve.
        name: String,
        /// Which of the six identifiers it was (e.g. "master face zone").
        role: &'static str,
    },
    /// A bound face zone contains no faces on a partition that should own
    /// part of it.
    #[error("face zone `{name}` is empty; check the mesh definition")]
    EmptyZone { name: String },
    /// Constructing an interface in the attached state from components is
    /// not supported: the attached addressing cannot be derived without
    /// the persisted provenance maps.
    #[error("creation of a sliding interface from components in attached state is not supported")]
    AttachedFromComponents,
    /// A persisted attached interface is missing one of the addressing
    /// maps that the attached state requires.
    #[error("attached interface dictionary is missing required entry `{entry}`")]
    MissingAttachedEntry { entry: &'static str },
    /// A cut point could not be classified as either a retired point or a
    /// provenance-backed edge intersection. Indicates stale projection or
    /// corrupted provenance.
    #[error(
        "cut point {point} not recognised as either the projected or as \
         intersection point; error in point projection or data mapping"
    )]
    UnclassifiablePoint { point: PointId },
    /// An edge-plane intersection expected to hit the master edge missed
    /// it: the cut fraction fell outside the end-cutoff interval.
    #[error(
        "missed master edge: cut fraction {weight} outside tolerated interval \
         for master edge ({master_start:?} -> {master_end:?})"
    )]
    MissedMasterEdge {
        master_start: Point3,
        master_end: Point3,
        /// Cut fraction computed along the master edge.
        weight: f64,
    },
    /// The point cut on the master edge does not lie on the paired slave
    /// edge within tolerance.
    #[error(
        "missed slave edge: master edge ({master_start:?} -> {master_end:?}), \
         slave edge ({slave_start:?} -> {slave_end:?}), cut point {point:?}, \
         weight {weight}"
    )]
    MissedSlaveEdge {
        master_start: Point3,
        master_end: Point3,
        slave_start: Point3,
        slave_end: Point3,
        point: Point3,
        /// Normalised position of the attempted cut along the slave edge.
        weight: f64,
    },
    /// A provenance edge pair refers to an edge that no longer exists on
    /// the master or slave patch.
    #[error("provenance for cut point {point} refers to a {side} edge that is no longer on the patch")]
    StaleProvenance {
        point: PointId,
        /// "master" or "slave".
        side: &'static str,
    },
    /// Integral match requires every slave point to land on the master
    /// surface; this one did not.
    #[error(
        "integral match violated: slave point {slave_point} projects {distance} \
         away from the master surface (tolerance {tolerance})"
    )]
    IntegralMatchViolation {
        /// Slave-zone local point index.
        slave_point: usize,
        distance: f64,
        tolerance: f64,
    },
    /// Three points supplied for a cutting plane are (nearly) collinear.
    #[error("degenerate cutting plane through {a:?}, {b:?}, {c:?}")]
    DegeneratePlane { a: Point3, b: Point3, c: Point3 },
    /// A topology edit referred to an entity outside the mesh.
    #[error("topology edit refers to {kind} index {index} out of range (size {size})")]
    EditOutOfRange {
        kind: &'static str,
        index: usize,
        size: usize,
    },
    /// Internal addressing invariant violated (attached state).
    #[error("attached addressing inconsistent: {0}")]
    InconsistentAddressing(String),
}
