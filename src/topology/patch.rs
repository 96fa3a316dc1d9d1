//! Primitive patch: derived addressing for a surface described by a face
//! zone.
//!
//! A patch is built from a list of faces (global point ids) plus the mesh
//! point field, and exposes the local addressing the coupling algorithms
//! need: compacted local points, the edge list (internal edges first),
//! per-face and per-point adjacency, face geometry and point normals.
//! Construction is deterministic: local points are sorted ascending by
//! global id, edges are numbered in first-traversal order.

use crate::geometry::{Line, Point3, Vector3};
use crate::topology::edge::Edge;
use crate::topology::point::PointId;
use hashbrown::HashMap;
use itertools::Itertools;

/// An edge in patch-local point indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalEdge {
    pub start: usize,
    pub end: usize,
}

impl LocalEdge {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Canonical (ascending) orientation, usable as a map key.
    #[inline]
    pub fn sorted(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self::new(self.end, self.start)
        }
    }
}

/// Derived addressing and geometry for a zone surface.
#[derive(Clone, Debug)]
pub struct PrimitivePatch {
    /// Global point ids used by the patch, ascending.
    mesh_points: Vec<PointId>,
    /// Global id -> local index.
    mesh_point_map: HashMap<PointId, usize>,
    /// Faces in patch-local point indices.
    local_faces: Vec<Vec<usize>>,
    /// Positions of the local points.
    local_points: Vec<Point3>,
    /// Patch edges, internal edges first.
    edges: Vec<LocalEdge>,
    n_internal_edges: usize,
    /// Canonical edge -> edge index.
    edge_map: HashMap<LocalEdge, usize>,
    /// Per-face edge indices, in face traversal order.
    face_edges: Vec<Vec<usize>>,
    /// Per-edge face indices (one or two entries, ascending).
    edge_faces: Vec<Vec<usize>>,
    /// Per-local-point face indices, ascending.
    point_faces: Vec<Vec<usize>>,
    face_centres: Vec<Point3>,
    /// Face area vectors (Newell), not normalised.
    face_areas: Vec<Vector3>,
    /// Unit point normals (area-weighted).
    point_normals: Vec<Vector3>,
}

impl PrimitivePatch {
    /// Builds the patch addressing from faces given in global point ids.
    pub fn new(faces: &[Vec<PointId>], points: &[Point3]) -> Self {
        // Compacted local point set, ascending by global id.
        let mesh_points: Vec<PointId> = faces
            .iter()
            .flatten()
            .copied()
            .sorted_unstable()
            .dedup()
            .collect();

        let mesh_point_map: HashMap<PointId, usize> = mesh_points
            .iter()
            .enumerate()
            .map(|(local, &global)| (global, local))
            .collect();

        let local_points: Vec<Point3> =
            mesh_points.iter().map(|p| points[p.index()]).collect();

        let local_faces: Vec<Vec<usize>> = faces
            .iter()
            .map(|f| f.iter().map(|p| mesh_point_map[p]).collect())
            .collect();

        // Edges in first-traversal order, then stable-partitioned so
        // internal edges come first.
        let mut edge_map: HashMap<LocalEdge, usize> = HashMap::new();
        let mut edges: Vec<LocalEdge> = Vec::new();
        let mut edge_faces: Vec<Vec<usize>> = Vec::new();
        let mut face_edges: Vec<Vec<usize>> = vec![Vec::new(); local_faces.len()];

        for (facei, face) in local_faces.iter().enumerate() {
            for i in 0..face.len() {
                let e = LocalEdge::new(face[i], face[(i + 1) % face.len()]);
                let key = e.sorted();
                let edgei = *edge_map.entry(key).or_insert_with(|| {
                    edges.push(e);
                    edge_faces.push(Vec::new());
                    edges.len() - 1
                });
                edge_faces[edgei].push(facei);
                face_edges[facei].push(edgei);
            }
        }

        let (mut internal, mut boundary): (Vec<usize>, Vec<usize>) = (Vec::new(), Vec::new());
        for (edgei, faces_of) in edge_faces.iter().enumerate() {
            if faces_of.len() > 1 {
                internal.push(edgei);
            } else {
                boundary.push(edgei);
            }
        }
        let n_internal_edges = internal.len();

        let mut renumber = vec![0usize; edges.len()];
        for (new, &old) in internal.iter().chain(boundary.iter()).enumerate() {
            renumber[old] = new;
        }

        let mut new_edges = vec![LocalEdge::new(0, 0); edges.len()];
        let mut new_edge_faces = vec![Vec::new(); edges.len()];
        for (old, &new) in renumber.iter().enumerate() {
            new_edges[new] = edges[old];
            new_edge_faces[new] = std::mem::take(&mut edge_faces[old]);
        }
        for list in &mut face_edges {
            for e in list.iter_mut() {
                *e = renumber[*e];
            }
        }
        let edge_map: HashMap<LocalEdge, usize> = new_edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.sorted(), i))
            .collect();

        // Point -> face adjacency, ascending face order.
        let mut point_faces: Vec<Vec<usize>> = vec![Vec::new(); local_points.len()];
        for (facei, face) in local_faces.iter().enumerate() {
            for &p in face {
                point_faces[p].push(facei);
            }
        }

        // Face geometry: centres as point averages, area vectors by the
        // Newell rule (robust for almost-planar n-gons).
        let mut face_centres = Vec::with_capacity(local_faces.len());
        let mut face_areas = Vec::with_capacity(local_faces.len());
        for face in &local_faces {
            let n = face.len() as f64;
            let centre = face
                .iter()
                .fold(Point3::ZERO, |acc, &p| acc + local_points[p])
                / n;
            let mut area = Vector3::ZERO;
            for i in 0..face.len() {
                let a = local_points[face[i]];
                let b = local_points[face[(i + 1) % face.len()]];
                area += a.cross(b) * 0.5;
            }
            face_centres.push(centre);
            face_areas.push(area);
        }

        // Area-weighted unit point normals.
        let mut point_normals = vec![Vector3::ZERO; local_points.len()];
        for (facei, face) in local_faces.iter().enumerate() {
            for &p in face {
                point_normals[p] += face_areas[facei];
            }
        }
        for n in &mut point_normals {
            *n = n.normalized().unwrap_or(Vector3::ZERO);
        }

        Self {
            mesh_points,
            mesh_point_map,
            local_faces,
            local_points,
            edges: new_edges,
            n_internal_edges,
            edge_map,
            face_edges,
            edge_faces: new_edge_faces,
            point_faces,
            face_centres,
            face_areas,
            point_normals,
        }
    }

    #[inline]
    pub fn n_points(&self) -> usize {
        self.local_points.len()
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        self.local_faces.len()
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn n_internal_edges(&self) -> usize {
        self.n_internal_edges
    }

    #[inline]
    pub fn mesh_points(&self) -> &[PointId] {
        &self.mesh_points
    }

    #[inline]
    pub fn local_points(&self) -> &[Point3] {
        &self.local_points
    }

    #[inline]
    pub fn local_faces(&self) -> &[Vec<usize>] {
        &self.local_faces
    }

    #[inline]
    pub fn edges(&self) -> &[LocalEdge] {
        &self.edges
    }

    #[inline]
    pub fn face_edges(&self) -> &[Vec<usize>] {
        &self.face_edges
    }

    #[inline]
    pub fn edge_faces(&self) -> &[Vec<usize>] {
        &self.edge_faces
    }

    #[inline]
    pub fn point_faces(&self) -> &[Vec<usize>] {
        &self.point_faces
    }

    #[inline]
    pub fn face_centres(&self) -> &[Point3] {
        &self.face_centres
    }

    #[inline]
    pub fn face_areas(&self) -> &[Vector3] {
        &self.face_areas
    }

    #[inline]
    pub fn point_normals(&self) -> &[Vector3] {
        &self.point_normals
    }

    /// Local index of a global mesh point, if on the patch.
    #[inline]
    pub fn which_point(&self, p: PointId) -> Option<usize> {
        self.mesh_point_map.get(&p).copied()
    }

    /// Edge index of a local edge, ignoring orientation.
    #[inline]
    pub fn which_edge(&self, e: LocalEdge) -> Option<usize> {
        self.edge_map.get(&e.sorted()).copied()
    }

    /// The global-id form of a patch edge.
    #[inline]
    pub fn global_edge(&self, edgei: usize) -> Edge {
        let e = self.edges[edgei];
        Edge::new(self.mesh_points[e.start], self.mesh_points[e.end])
    }

    /// The segment of a patch edge in space.
    #[inline]
    pub fn edge_line(&self, edgei: usize) -> Line {
        let e = self.edges[edgei];
        Line::new(self.local_points[e.start], self.local_points[e.end])
    }

    /// Length of the shortest edge using a local point.
    pub fn min_edge_length_at(&self, pointi: usize) -> f64 {
        let mut min_len = f64::MAX;
        for (edgei, e) in self.edges.iter().enumerate() {
            if e.start == pointi || e.end == pointi {
                min_len = min_len.min(self.edge_line(edgei).mag());
            }
        }
        if min_len == f64::MAX { 0.0 } else { min_len }
    }

    /// Faces sharing an edge with `facei`, ascending, excluding `facei`.
    pub fn face_neighbours(&self, facei: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.face_edges[facei]
            .iter()
            .flat_map(|&e| self.edge_faces[e].iter().copied())
            .filter(|&f| f != facei)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// True when `q`, assumed on the face plane, lies inside face `facei`.
    ///
    /// The face is fanned into triangles about its centre; `tol` is an
    /// absolute slack on the triangle side tests.
    pub fn point_in_face(&self, facei: usize, q: Point3, tol: f64) -> bool {
        let face = &self.local_faces[facei];
        let c = self.face_centres[facei];
        let n = match self.face_areas[facei].normalized() {
            Some(n) => n,
            None => return false,
        };
        for i in 0..face.len() {
            let a = self.local_points[face[i]];
            let b = self.local_points[face[(i + 1) % face.len()]];
            // Inside the fan triangle (c, a, b): q is on the inner side
            // of every directed side.
            let inside = (b - a).cross(q - a).dot(n) >= -tol
                && (c - b).cross(q - b).dot(n) >= -tol
                && (a - c).cross(q - c).dot(n) >= -tol;
            if inside {
                return true;
            }
        }
        false
    }

    /// Nearest point on face `facei` to `p`, with its distance.
    pub fn nearest_on_face(&self, facei: usize, p: Point3) -> (Point3, f64) {
        let face = &self.local_faces[facei];
        let c = self.face_centres[facei];
        if let Some(n) = self.face_areas[facei].normalized() {
            let foot = p - n * (p - c).dot(n);
            let scale = self.face_areas[facei].mag().sqrt();
            if self.point_in_face(facei, foot, 1e-12 * scale.max(1.0)) {
                return (foot, foot.dist(p));
            }
        }
        // Outside the face: nearest point on its perimeter.
        let mut best = (c, c.dist(p));
        for i in 0..face.len() {
            let a = self.local_points[face[i]];
            let b = self.local_points[face[(i + 1) % face.len()]];
            let hit = Line::new(a, b).nearest_dist(p);
            if hit.distance < best.1 {
                best = (hit.point, hit.distance);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: u32) -> PointId {
        PointId::new(i)
    }

    /// Two unit quads side by side in the z=0 plane:
    /// 3--4--5
    /// |  |  |
    /// 0--1--2
    fn two_quads() -> (Vec<Vec<PointId>>, Vec<Point3>) {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![
            vec![pid(0), pid(1), pid(4), pid(3)],
            vec![pid(1), pid(2), pid(5), pid(4)],
        ];
        (faces, points)
    }

    #[test]
    fn addressing_counts() {
        let (faces, points) = two_quads();
        let patch = PrimitivePatch::new(&faces, &points);
        assert_eq!(patch.n_points(), 6);
        assert_eq!(patch.n_faces(), 2);
        assert_eq!(patch.n_edges(), 7);
        assert_eq!(patch.n_internal_edges(), 1);
        // The single internal edge is numbered first and is 1-4.
        let internal = patch.global_edge(0);
        assert!(internal.same_as(Edge::new(pid(1), pid(4))));
    }

    #[test]
    fn which_point_and_edge() {
        let (faces, points) = two_quads();
        let patch = PrimitivePatch::new(&faces, &points);
        let l1 = patch.which_point(pid(1)).unwrap();
        let l4 = patch.which_point(pid(4)).unwrap();
        assert_eq!(patch.which_edge(LocalEdge::new(l4, l1)), Some(0));
        assert_eq!(patch.which_point(pid(99)), None);
    }

    #[test]
    fn face_geometry() {
        let (faces, points) = two_quads();
        let patch = PrimitivePatch::new(&faces, &points);
        assert_eq!(patch.face_centres()[0], Point3::new(0.5, 0.5, 0.0));
        let area = patch.face_areas()[0];
        assert!((area.mag() - 1.0).abs() < 1e-12);
        assert!((area.z - 1.0).abs() < 1e-12);
        // Point normals all +z on a flat patch.
        for n in patch.point_normals() {
            assert!((n.z - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn point_in_face_and_nearest() {
        let (faces, points) = two_quads();
        let patch = PrimitivePatch::new(&faces, &points);
        assert!(patch.point_in_face(0, Point3::new(0.5, 0.5, 0.0), 1e-12));
        assert!(!patch.point_in_face(0, Point3::new(1.5, 0.5, 0.0), 1e-12));

        let (foot, dist) = patch.nearest_on_face(0, Point3::new(0.5, 0.5, 2.0));
        assert_eq!(foot, Point3::new(0.5, 0.5, 0.0));
        assert!((dist - 2.0).abs() < 1e-12);

        // Outside: clamps onto the boundary edge.
        let (edge_foot, _) = patch.nearest_on_face(0, Point3::new(-1.0, 0.5, 0.0));
        assert_eq!(edge_foot, Point3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn face_neighbours_and_min_edge() {
        let (faces, points) = two_quads();
        let patch = PrimitivePatch::new(&faces, &points);
        assert_eq!(patch.face_neighbours(0), vec![1]);
        assert_eq!(patch.face_neighbours(1), vec![0]);
        let l0 = patch.which_point(pid(0)).unwrap();
        assert!((patch.min_edge_length_at(l0) - 1.0).abs() < 1e-12);
    }
}
