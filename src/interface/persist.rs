//! Persisted form of a sliding interface.
//!
//! The dictionary carries the configuration, the attached/active flags
//! and, only while attached, the four addressing maps that cannot be
//! rederived without the persisted provenance. Tolerances appear only
//! when they differ from their compiled-in defaults (the config's serde
//! attributes take care of that). Maps are stored as sorted pair lists
//! so the written form is deterministic and format-agnostic.

use crate::interface::config::SlidingInterfaceConfig;
use crate::topology::edge::EdgePair;
use crate::topology::point::{CellId, FaceId, PointId};
use serde::{Deserialize, Serialize};

/// The persisted-state dictionary of one sliding interface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDict {
    #[serde(flatten)]
    pub config: SlidingInterfaceConfig,
    pub attached: bool,
    pub active: bool,
    #[serde(
        rename = "masterFaceCells",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub master_face_cells: Option<Vec<CellId>>,
    #[serde(
        rename = "slaveFaceCells",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub slave_face_cells: Option<Vec<CellId>>,
    #[serde(
        rename = "masterStickOutFaces",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub master_stick_out_faces: Option<Vec<FaceId>>,
    #[serde(
        rename = "slaveStickOutFaces",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub slave_stick_out_faces: Option<Vec<FaceId>>,
    /// Sorted (cut point, retired slave point) pairs.
    #[serde(
        rename = "retiredPointMap",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub retired_point_map: Option<Vec<(PointId, PointId)>>,
    /// Sorted (cut point, master/slave edge pair) entries.
    #[serde(
        rename = "cutPointEdgePairMap",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cut_point_edge_pair_map: Option<Vec<(PointId, EdgePair)>>,
}
