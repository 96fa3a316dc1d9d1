//! Sliding-interface configuration: names, match policy, projection
//! algorithm and the numeric tolerances.
//!
//! Tolerances have compile-time defaults; any subset may be overridden at
//! construction or through the persisted dictionary. When written back,
//! only non-default values are emitted.

use serde::{Deserialize, Serialize};

/// How completely the slave surface must match the master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Every master zone edge boundary is matched exactly by slave
    /// geometry (fully enclosing interfaces).
    #[default]
    Integral,
    /// Unmatched boundary regions are tolerated and retained as ordinary
    /// boundary faces.
    Partial,
}

/// Strategy for projecting slave points onto the master surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionAlgorithm {
    /// Nearest point on the master surface.
    #[default]
    Nearest,
    /// Nearest point restricted to master faces facing the slave point.
    Visible,
    /// Projection along the slave point normal onto the master surface.
    Direct,
}

pub const POINT_MERGE_TOL_DEFAULT: f64 = 0.05;
pub const EDGE_MERGE_TOL_DEFAULT: f64 = 0.01;
pub const N_FACES_PER_SLAVE_EDGE_DEFAULT: usize = 5;
pub const EDGE_FACE_ESCAPE_LIMIT_DEFAULT: usize = 10;
pub const INTEGRAL_ADJ_TOL_DEFAULT: f64 = 0.05;
pub const EDGE_MASTER_CATCH_FRACTION_DEFAULT: f64 = 0.4;
pub const EDGE_CO_PLANAR_TOL_DEFAULT: f64 = 0.8;
pub const EDGE_END_CUTOFF_TOL_DEFAULT: f64 = 1e-4;

fn point_merge_default() -> f64 {
    POINT_MERGE_TOL_DEFAULT
}
fn edge_merge_default() -> f64 {
    EDGE_MERGE_TOL_DEFAULT
}
fn n_faces_per_slave_edge_default() -> usize {
    N_FACES_PER_SLAVE_EDGE_DEFAULT
}
fn edge_face_escape_limit_default() -> usize {
    EDGE_FACE_ESCAPE_LIMIT_DEFAULT
}
fn integral_adj_default() -> f64 {
    INTEGRAL_ADJ_TOL_DEFAULT
}
fn edge_master_catch_fraction_default() -> f64 {
    EDGE_MASTER_CATCH_FRACTION_DEFAULT
}
fn edge_co_planar_default() -> f64 {
    EDGE_CO_PLANAR_TOL_DEFAULT
}
fn edge_end_cutoff_default() -> f64 {
    EDGE_END_CUTOFF_TOL_DEFAULT
}

fn is_point_merge_default(v: &f64) -> bool {
    *v == POINT_MERGE_TOL_DEFAULT
}
fn is_edge_merge_default(v: &f64) -> bool {
    *v == EDGE_MERGE_TOL_DEFAULT
}
fn is_n_faces_per_slave_edge_default(v: &usize) -> bool {
    *v == N_FACES_PER_SLAVE_EDGE_DEFAULT
}
fn is_edge_face_escape_limit_default(v: &usize) -> bool {
    *v == EDGE_FACE_ESCAPE_LIMIT_DEFAULT
}
fn is_integral_adj_default(v: &f64) -> bool {
    *v == INTEGRAL_ADJ_TOL_DEFAULT
}
fn is_edge_master_catch_fraction_default(v: &f64) -> bool {
    *v == EDGE_MASTER_CATCH_FRACTION_DEFAULT
}
fn is_edge_co_planar_default(v: &f64) -> bool {
    *v == EDGE_CO_PLANAR_TOL_DEFAULT
}
fn is_edge_end_cutoff_default(v: &f64) -> bool {
    *v == EDGE_END_CUTOFF_TOL_DEFAULT
}

/// Numeric tolerances of the coupling algorithms.
///
/// All relative tolerances scale with a local edge length, so the knobs
/// are dimensionless.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Point-point merge distance, as a fraction of the local minimum
    /// edge length.
    #[serde(
        rename = "pointMergeTol",
        default = "point_merge_default",
        skip_serializing_if = "is_point_merge_default"
    )]
    pub point_merge: f64,
    /// Point-edge merge distance, as a fraction of the edge length.
    #[serde(
        rename = "edgeMergeTol",
        default = "edge_merge_default",
        skip_serializing_if = "is_edge_merge_default"
    )]
    pub edge_merge: f64,
    /// Estimated number of master faces overlapping a slave edge; used to
    /// size the candidate containers.
    #[serde(
        rename = "nFacesPerSlaveEdge",
        default = "n_faces_per_slave_edge_default",
        skip_serializing_if = "is_n_faces_per_slave_edge_default"
    )]
    pub n_faces_per_slave_edge: usize,
    /// Maximum number of master faces walked from a seed when searching
    /// for the edges cut by a slave edge.
    #[serde(
        rename = "edgeFaceEscapeLimit",
        default = "edge_face_escape_limit_default",
        skip_serializing_if = "is_edge_face_escape_limit_default"
    )]
    pub edge_face_escape_limit: usize,
    /// Integral-match adjacency tolerance: how far (relative to the local
    /// edge length) a slave point may sit off the master surface.
    #[serde(
        rename = "integralAdjTol",
        default = "integral_adj_default",
        skip_serializing_if = "is_integral_adj_default"
    )]
    pub integral_adj: f64,
    /// Fraction of the slave edge length by which the catch box is grown
    /// when collecting candidate master edges.
    #[serde(
        rename = "edgeMasterCatchFraction",
        default = "edge_master_catch_fraction_default",
        skip_serializing_if = "is_edge_master_catch_fraction_default"
    )]
    pub edge_master_catch_fraction: f64,
    /// Acceptance distance between the master cut point and the slave
    /// edge line, as a fraction of the projected slave edge length.
    #[serde(
        rename = "edgeCoPlanarTol",
        default = "edge_co_planar_default",
        skip_serializing_if = "is_edge_co_planar_default"
    )]
    pub edge_co_planar: f64,
    /// Cut fractions within this distance of an edge end are rejected to
    /// avoid degenerate near-vertex cuts (open interval).
    #[serde(
        rename = "edgeEndCutoffTol",
        default = "edge_end_cutoff_default",
        skip_serializing_if = "is_edge_end_cutoff_default"
    )]
    pub edge_end_cutoff: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point_merge: POINT_MERGE_TOL_DEFAULT,
            edge_merge: EDGE_MERGE_TOL_DEFAULT,
            n_faces_per_slave_edge: N_FACES_PER_SLAVE_EDGE_DEFAULT,
            edge_face_escape_limit: EDGE_FACE_ESCAPE_LIMIT_DEFAULT,
            integral_adj: INTEGRAL_ADJ_TOL_DEFAULT,
            edge_master_catch_fraction: EDGE_MASTER_CATCH_FRACTION_DEFAULT,
            edge_co_planar: EDGE_CO_PLANAR_TOL_DEFAULT,
            edge_end_cutoff: EDGE_END_CUTOFF_TOL_DEFAULT,
        }
    }
}

impl Tolerances {
    /// Log the full parameter set (used when overrides are read in).
    pub fn report(&self) {
        log::info!(
            "sliding interface parameters: pointMergeTol {}, edgeMergeTol {}, \
             nFacesPerSlaveEdge {}, edgeFaceEscapeLimit {}, integralAdjTol {}, \
             edgeMasterCatchFraction {}, edgeCoPlanarTol {}, edgeEndCutoffTol {}",
            self.point_merge,
            self.edge_merge,
            self.n_faces_per_slave_edge,
            self.edge_face_escape_limit,
            self.integral_adj,
            self.edge_master_catch_fraction,
            self.edge_co_planar,
            self.edge_end_cutoff,
        );
    }
}

/// Immutable per-interface parameters, fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlidingInterfaceConfig {
    /// Instance name (used in diagnostics and the persisted dictionary).
    pub name: String,
    #[serde(rename = "masterFaceZoneName")]
    pub master_face_zone_name: String,
    #[serde(rename = "slaveFaceZoneName")]
    pub slave_face_zone_name: String,
    #[serde(rename = "cutPointZoneName")]
    pub cut_point_zone_name: String,
    #[serde(rename = "cutFaceZoneName")]
    pub cut_face_zone_name: String,
    #[serde(rename = "masterPatchName")]
    pub master_patch_name: String,
    #[serde(rename = "slavePatchName")]
    pub slave_patch_name: String,
    #[serde(rename = "typeOfMatch")]
    pub match_type: MatchType,
    #[serde(rename = "coupleDecouple")]
    pub couple_decouple: bool,
    #[serde(rename = "projection")]
    pub projection: ProjectionAlgorithm,
    #[serde(flatten)]
    pub tolerances: Tolerances,
}
