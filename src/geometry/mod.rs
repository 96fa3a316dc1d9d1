//! Geometric primitives for the sliding-interface engine.
//!
//! Everything here is pure and stateless: points, segments, cutting
//! planes, and the fixed-size clip operations used on interface cells.
//! Tolerances are applied by callers, never in this module.

pub mod cut;
pub mod line;
pub mod plane;
pub mod vector;

pub use cut::{AreaOp, CutOp, VolumeOp};
pub use line::{Line, PointHit};
pub use plane::Plane;
pub use vector::{BoundBox, Point3, Vector3};
