//! Pure cutting operations on triangles and tetrahedra.
//!
//! These are the tolerance-free primitives used to clip interface cells
//! against the sliding cut. A cut is parameterised by fractions along the
//! edges radiating from a reference vertex; the functions below produce
//! the clipped sub-shape, or apply a caller-supplied reduction operator to
//! it. Composed shapes (quad, prism) are decomposed with fixed
//! vertex-index permutation tables and the operator combines per-simplex
//! results with its own rule (`+`).
//!
//! No validation happens here: fractions outside [0,1] are the caller's
//! responsibility, and all tolerancing is applied before these are called.

use super::vector::Point3;
use std::ops::Add;

/// Quad -> two triangles.
const QUAD_TRIS: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// Prism -> three tetrahedra.
const PRISM_TETS: [[usize; 4]; 3] = [[0, 1, 2, 4], [0, 2, 5, 4], [0, 4, 5, 3]];

/// A reduction over simplices. Results combine by `+` when a composed
/// shape is decomposed.
pub trait CutOp {
    type Result: Add<Output = Self::Result>;
    fn tri(&self, p: &[Point3; 3]) -> Self::Result;
    fn tet(&self, p: &[Point3; 4]) -> Self::Result;
}

/// Area vector of a triangle (combines by vector sum).
#[derive(Clone, Copy, Debug, Default)]
pub struct AreaOp;

impl CutOp for AreaOp {
    type Result = Point3;

    #[inline]
    fn tri(&self, p: &[Point3; 3]) -> Point3 {
        (p[1] - p[0]).cross(p[2] - p[0]) * 0.5
    }

    #[inline]
    fn tet(&self, _p: &[Point3; 4]) -> Point3 {
        Point3::ZERO
    }
}

/// Signed volume of a tetrahedron (combines by scalar sum).
#[derive(Clone, Copy, Debug, Default)]
pub struct VolumeOp;

impl CutOp for VolumeOp {
    type Result = f64;

    #[inline]
    fn tri(&self, _p: &[Point3; 3]) -> f64 {
        0.0
    }

    #[inline]
    fn tet(&self, p: &[Point3; 4]) -> f64 {
        (p[1] - p[0]).dot((p[2] - p[0]).cross(p[3] - p[0])) / 6.0
    }
}

/// Select three entries of a fixed-size list.
#[inline]
pub fn tri_reorder<T: Copy, const N: usize>(x: &[T; N], idx: [usize; 3]) -> [T; 3] {
    [x[idx[0]], x[idx[1]], x[idx[2]]]
}

/// Select four entries of a fixed-size list.
#[inline]
pub fn tet_reorder<T: Copy, const N: usize>(x: &[T; N], idx: [usize; 4]) -> [T; 4] {
    [x[idx[0]], x[idx[1]], x[idx[2]], x[idx[3]]]
}

/// Cut a tri from a tri. The cut runs along the two edges connected to
/// vertex 0 at the given fractions; the result is the side connected to
/// vertex 0.
#[inline]
pub fn tri_cut_tri(p: &[Point3; 3], f: [f64; 2]) -> [Point3; 3] {
    [p[0], p[0].lerp(p[1], f[0]), p[0].lerp(p[2], f[1])]
}

/// Cut a quad from a tri. Same cuts as [`tri_cut_tri`]; the result is the
/// side connected to vertices 1 and 2.
#[inline]
pub fn tri_cut_quad(p: &[Point3; 3], f: [f64; 2]) -> [Point3; 4] {
    [
        p[1],
        p[2],
        p[0].lerp(p[2], f[1]),
        p[0].lerp(p[1], f[0]),
    ]
}

/// Cut a tet from a tet along the three edges connected to vertex 0; the
/// result is the side connected to vertex 0.
#[inline]
pub fn tet_cut_tet(p: &[Point3; 4], f: [f64; 3]) -> [Point3; 4] {
    [
        p[0],
        p[0].lerp(p[1], f[0]),
        p[0].lerp(p[2], f[1]),
        p[0].lerp(p[3], f[2]),
    ]
}

/// Cut a prism from a tet. Same cuts as [`tet_cut_tet`]; the result is the
/// side connected to vertices 1, 2 and 3.
#[inline]
pub fn tet_cut_prism0(p: &[Point3; 4], f: [f64; 3]) -> [Point3; 6] {
    [
        p[0].lerp(p[1], f[0]),
        p[0].lerp(p[2], f[1]),
        p[0].lerp(p[3], f[2]),
        p[1],
        p[2],
        p[3],
    ]
}

/// Cut a prism from a tet along the four edges that are not edge 01 or
/// edge 23; the result is the side connected to edge 01.
#[inline]
pub fn tet_cut_prism01(p: &[Point3; 4], f: [f64; 4]) -> [Point3; 6] {
    let mut r = [Point3::ZERO; 6];
    for i in 0..2 {
        r[3 * i] = p[i];
        for j in 0..2 {
            r[3 * i + j + 1] = p[i].lerp(p[j + 2], f[2 * i + j]);
        }
    }
    r
}

/// Same cuts as [`tet_cut_prism01`]; the result is the side connected to
/// edge 23.
#[inline]
pub fn tet_cut_prism23(p: &[Point3; 4], f: [f64; 4]) -> [Point3; 6] {
    let mut r = tet_cut_prism01(p, f);
    r[0] = p[2];
    r[3] = p[3];
    r.swap(2, 4);
    r
}

/// Apply an operation to a quad by splitting it into two tris.
#[inline]
pub fn quad_op<Op: CutOp>(op: &Op, p: &[Point3; 4]) -> Op::Result {
    op.tri(&tri_reorder(p, QUAD_TRIS[0])) + op.tri(&tri_reorder(p, QUAD_TRIS[1]))
}

/// Apply an operation to a prism by splitting it into three tets.
#[inline]
pub fn prism_op<Op: CutOp>(op: &Op, p: &[Point3; 6]) -> Op::Result {
    op.tet(&tet_reorder(p, PRISM_TETS[0]))
        + op.tet(&tet_reorder(p, PRISM_TETS[1]))
        + op.tet(&tet_reorder(p, PRISM_TETS[2]))
}

/// Cut a tri from a tri and apply an operation to the result.
#[inline]
pub fn tri_cut_tri_op<Op: CutOp>(op: &Op, p: &[Point3; 3], f: [f64; 2]) -> Op::Result {
    op.tri(&tri_cut_tri(p, f))
}

/// Cut a quad from a tri and apply an operation to the result.
#[inline]
pub fn tri_cut_quad_op<Op: CutOp>(op: &Op, p: &[Point3; 3], f: [f64; 2]) -> Op::Result {
    quad_op(op, &tri_cut_quad(p, f))
}

/// Cut a tet from a tet and apply an operation to the result.
#[inline]
pub fn tet_cut_tet_op<Op: CutOp>(op: &Op, p: &[Point3; 4], f: [f64; 3]) -> Op::Result {
    op.tet(&tet_cut_tet(p, f))
}

/// Cut the vertex-0 prism from a tet and apply an operation to the result.
#[inline]
pub fn tet_cut_prism0_op<Op: CutOp>(op: &Op, p: &[Point3; 4], f: [f64; 3]) -> Op::Result {
    prism_op(op, &tet_cut_prism0(p, f))
}

/// Cut the edge-01 prism from a tet and apply an operation to the result.
#[inline]
pub fn tet_cut_prism01_op<Op: CutOp>(op: &Op, p: &[Point3; 4], f: [f64; 4]) -> Op::Result {
    prism_op(op, &tet_cut_prism01(p, f))
}

/// Cut the edge-23 prism from a tet and apply an operation to the result.
#[inline]
pub fn tet_cut_prism23_op<Op: CutOp>(op: &Op, p: &[Point3; 4], f: [f64; 4]) -> Op::Result {
    prism_op(op, &tet_cut_prism23(p, f))
}
