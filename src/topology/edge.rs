//! Mesh edges and the provenance pair for cut points.

use super::point::PointId;
use serde::{Deserialize, Serialize};

/// An edge between two mesh points.
///
/// Equality and hashing are orientation-sensitive; use [`Edge::same_as`]
/// or [`Edge::sorted`] when orientation does not matter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub start: PointId,
    pub end: PointId,
}

impl Edge {
    #[inline]
    pub const fn new(start: PointId, end: PointId) -> Self {
        Self { start, end }
    }

    /// The edge with reversed orientation.
    #[inline]
    pub fn reversed(self) -> Self {
        Self::new(self.end, self.start)
    }

    /// The other endpoint, or `None` when `p` is not on the edge.
    #[inline]
    pub fn other(self, p: PointId) -> Option<PointId> {
        if p == self.start {
            Some(self.end)
        } else if p == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    /// True when both edges connect the same two points, in any order.
    #[inline]
    pub fn same_as(self, other: Self) -> bool {
        self.sorted() == other.sorted()
    }

    /// Canonical (ascending) orientation, usable as a map key.
    #[inline]
    pub fn sorted(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            self.reversed()
        }
    }
}

/// The master/slave edge pair whose intersection created a cut point.
///
/// Endpoints are global mesh point ids; this is the provenance link used
/// to recompute the cut position after mesh motion without re-searching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePair {
    pub master: Edge,
    pub slave: Edge,
}
