//! The coupling algorithm: stitches the two non-conforming zone surfaces
//! into a single conforming interface.
//!
//! Coupling proceeds in four passes over the projected slave geometry:
//!
//! 1. classify every slave point against the master patch (point, edge or
//!    face hit, or off-patch for a partial match);
//! 2. intersect every matched slave edge with the master edges found by a
//!    bounded face walk, producing the edge-edge cut points;
//! 3. create the cut points (one per retired slave point, one per
//!    edge-edge intersection) and record the retired-point and provenance
//!    maps;
//! 4. detach the zone faces from their cells and add the cut faces that
//!    carry the interface connectivity.
//!
//! The edge cutting predicate lives in [`intersect_edge_pair`], shared
//! with the motion-point recovery so the two can never drift apart.
//! During the initial geometric search a failed candidate simply is not a
//! cut; when the same predicate runs against recorded provenance, failure
//! is fatal.

use crate::geometry::{BoundBox, Line, Plane, Point3};
use crate::interface::addressing::FaceCellAddressing;
use crate::interface::config::{MatchType, Tolerances};
use crate::interface::projection::ProjectedPoint;
use crate::mesh_error::MeshSlideError;
use crate::mesh::edit::{FaceModification, TopoChange};
use crate::mesh::poly_mesh::PolyMesh;
use crate::topology::edge::EdgePair;
use crate::topology::patch::PrimitivePatch;
use crate::topology::point::{FaceId, PointId};
use hashbrown::HashSet;
use std::collections::{BTreeMap, VecDeque};

/// How a projected slave point landed on the master patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SlavePointHit {
    /// Coincides with a master point (local index).
    Point(usize),
    /// Lies on a master edge (local edge index).
    Edge(usize),
    /// Lies inside a master face (local face index).
    Face(usize),
    /// Off the master patch (tolerated for a partial match only).
    Miss { distance: f64 },
}

impl SlavePointHit {
    fn is_matched(&self) -> bool {
        !matches!(self, Self::Miss { .. })
    }
}

/// A successful edge-pair cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgeCut {
    pub point: Point3,
    pub master_fraction: f64,
    pub slave_fraction: f64,
}

/// Maps produced by a couple, stored by the interface while attached.
#[derive(Clone, Debug, Default)]
pub(crate) struct CoupleMaps {
    /// Cut point -> the (global) slave point it replaces.
    pub retired_point_map: BTreeMap<PointId, PointId>,
    /// Cut point -> the master/slave edge pair that created it.
    pub cut_point_edge_pair_map: BTreeMap<PointId, EdgePair>,
    /// Cut faces per master zone-local face.
    pub cut_face_master: Vec<Vec<FaceId>>,
    /// Cut faces per slave zone-local face.
    pub cut_face_slave: Vec<Vec<FaceId>>,
}

/// Everything the couple needs from the interface.
pub(crate) struct CoupleContext<'a> {
    pub mesh: &'a PolyMesh,
    pub master_zone: usize,
    pub slave_zone: usize,
    pub cut_point_zone: usize,
    pub cut_face_zone: usize,
    pub master_patch_index: usize,
    pub slave_patch_index: usize,
    pub addressing: &'a FaceCellAddressing,
    pub tolerances: &'a Tolerances,
    pub match_type: MatchType,
}

/// Intersects a master edge with a projected slave edge.
///
/// The cutting plane passes through the two projected slave-edge
/// endpoints and `plane_third`, the normal-offset midpoint of the
/// unprojected slave edge. The master edge must be cut strictly inside
/// the end-cutoff interval, and the resulting point must lie on the
/// slave edge line within `edge_co_planar` of its length, again strictly
/// inside the end-cutoff interval.
pub(crate) fn intersect_edge_pair(
    master_line: &Line,
    slave_line: &Line,
    plane_third: Point3,
    tol: &Tolerances,
) -> Result<EdgeCut, MeshSlideError> {
    let a = slave_line.start;
    let b = slave_line.end;

    let cut_plane = Plane::through_points(a, b, plane_third).ok_or(
        MeshSlideError::DegeneratePlane {
            a,
            b,
            c: plane_third,
        },
    )?;

    let cut_on_master =
        cut_plane
            .cut_fraction(master_line)
            .ok_or(MeshSlideError::MissedMasterEdge {
                master_start: master_line.start,
                master_end: master_line.end,
                weight: f64::NAN,
            })?;

    if !(cut_on_master > tol.edge_end_cutoff && cut_on_master < 1.0 - tol.edge_end_cutoff) {
        return Err(MeshSlideError::MissedMasterEdge {
            master_start: master_line.start,
            master_end: master_line.end,
            weight: cut_on_master,
        });
    }

    // Master is cut; check the slave. Strict end-point checks avoid
    // capturing degenerate near-vertex cuts.
    let master_cut_point = master_line.point_at(cut_on_master);
    let slave_hit = slave_line.nearest_dist(master_cut_point);
    let cut_on_slave = slave_line.param_of(master_cut_point);
    let merge_tol = tol.edge_co_planar * slave_line.mag();

    if slave_hit.hit()
        && cut_on_slave > tol.edge_end_cutoff
        && cut_on_slave < 1.0 - tol.edge_end_cutoff
        && slave_hit.distance <= merge_tol
    {
        Ok(EdgeCut {
            point: master_cut_point,
            master_fraction: cut_on_master,
            slave_fraction: cut_on_slave,
        })
    } else {
        Err(MeshSlideError::MissedSlaveEdge {
            master_start: master_line.start,
            master_end: master_line.end,
            slave_start: a,
            slave_end: b,
            point: master_cut_point,
            weight: cut_on_slave,
        })
    }
}

/// Classifies every projected slave point against the master patch.
pub(crate) fn classify_slave_points(
    master: &PrimitivePatch,
    slave: &PrimitivePatch,
    projected: &[ProjectedPoint],
    tol: &Tolerances,
    match_type: MatchType,
) -> Result<Vec<SlavePointHit>, MeshSlideError> {
    let mut hits = Vec::with_capacity(slave.n_points());

    for (pointi, pp) in projected.iter().enumerate() {
        // A missed projection beyond the adjacency tolerance is an
        // unmatched point: fatal for an integral match, stick-out for a
        // partial one. Near-misses classify through their fallback.
        if !pp.hit {
            let adj_tol = tol.integral_adj * slave.min_edge_length_at(pointi);
            if pp.miss_distance > adj_tol {
                if match_type == MatchType::Integral {
                    return Err(MeshSlideError::IntegralMatchViolation {
                        slave_point: pointi,
                        distance: pp.miss_distance,
                        tolerance: adj_tol,
                    });
                }
                log::trace!(
                    "slave point {pointi}: off the master patch (distance {})",
                    pp.miss_distance
                );
                hits.push(SlavePointHit::Miss {
                    distance: pp.miss_distance,
                });
                continue;
            }
        }
        let p = pp.point;
        // Point-point: nearest master point within the merge distance.
        let mut point_hit: Option<(usize, f64)> = None;
        for (mpointi, &mp) in master.local_points().iter().enumerate() {
            let d = p.dist(mp);
            if point_hit.is_none_or(|(_, best)| d < best) {
                point_hit = Some((mpointi, d));
            }
        }
        if let Some((mpointi, d)) = point_hit {
            if d < tol.point_merge * master.min_edge_length_at(mpointi) {
                log::trace!("slave point {pointi}: merged with master point {mpointi}");
                hits.push(SlavePointHit::Point(mpointi));
                continue;
            }
        }

        // Point-edge: nearest master edge within the merge distance.
        let mut edge_hit: Option<(usize, f64)> = None;
        for edgei in 0..master.n_edges() {
            let line = master.edge_line(edgei);
            let hit = line.nearest_dist(p);
            if hit.hit() && hit.distance < tol.edge_merge * line.mag()
                && edge_hit.is_none_or(|(_, best)| hit.distance < best)
            {
                edge_hit = Some((edgei, hit.distance));
            }
        }
        if let Some((edgei, _)) = edge_hit {
            log::trace!("slave point {pointi}: on master edge {edgei}");
            hits.push(SlavePointHit::Edge(edgei));
            continue;
        }

        // Point-face: the projected point lies on the master surface, so
        // the nearest face contains it.
        let mut face_hit: Option<(usize, f64)> = None;
        for facei in 0..master.n_faces() {
            let (_, d) = master.nearest_on_face(facei, p);
            if face_hit.is_none_or(|(_, best)| d < best) {
                face_hit = Some((facei, d));
            }
        }
        match face_hit {
            Some((facei, _)) => {
                log::trace!("slave point {pointi}: inside master face {facei}");
                hits.push(SlavePointHit::Face(facei));
            }
            None => {
                return Err(MeshSlideError::EmptyZone {
                    name: "master".into(),
                });
            }
        }
    }

    Ok(hits)
}

/// Master faces reachable from `seeds` by an edge walk bounded by
/// `limit` faces, in discovery order.
fn walk_candidate_faces(
    master: &PrimitivePatch,
    mut seeds: Vec<usize>,
    limit: usize,
    capacity_hint: usize,
) -> Vec<usize> {
    seeds.sort_unstable();
    seeds.dedup();

    let mut seen: HashSet<usize> = HashSet::with_capacity(capacity_hint.max(seeds.len()));
    let mut order: Vec<usize> = Vec::with_capacity(capacity_hint.max(seeds.len()));
    let mut queue: VecDeque<usize> = VecDeque::new();
    for s in seeds {
        if seen.insert(s) {
            order.push(s);
            queue.push_back(s);
        }
    }
    while let Some(facei) = queue.pop_front() {
        if order.len() >= limit {
            break;
        }
        for next in master.face_neighbours(facei) {
            if order.len() >= limit {
                break;
            }
            if seen.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }
    order
}

/// Seed faces on the master patch for a classified slave point.
fn seed_faces(master: &PrimitivePatch, hit: &SlavePointHit) -> Vec<usize> {
    match *hit {
        SlavePointHit::Point(p) => master.point_faces()[p].clone(),
        SlavePointHit::Edge(e) => master.edge_faces()[e].clone(),
        SlavePointHit::Face(f) => vec![f],
        SlavePointHit::Miss { .. } => Vec::new(),
    }
}

/// An edge-edge intersection found during the search pass.
#[derive(Clone, Debug)]
struct EdgeIntersection {
    slave_edge: usize,
    master_edge: usize,
    cut: EdgeCut,
}

/// Finds all master-edge/slave-edge cuts, per slave edge, in walk order.
fn cut_slave_edges(
    master: &PrimitivePatch,
    slave: &PrimitivePatch,
    projected: &[ProjectedPoint],
    hits: &[SlavePointHit],
    tol: &Tolerances,
) -> Vec<EdgeIntersection> {
    let mut intersections = Vec::new();

    for edgei in 0..slave.n_edges() {
        let e = slave.edges()[edgei];
        if !(hits[e.start].is_matched() && hits[e.end].is_matched()) {
            continue;
        }

        let a = projected[e.start].point;
        let b = projected[e.end].point;
        let projected_line = Line::new(a, b);
        if projected_line.mag() <= f64::MIN_POSITIVE {
            continue;
        }

        // Normal-offset midpoint of the unprojected slave edge: the third
        // point of the cutting plane.
        let plane_third = ((slave.local_points()[e.start] + slave.point_normals()[e.start])
            + (slave.local_points()[e.end] + slave.point_normals()[e.end]))
            * 0.5;

        let mut seeds = seed_faces(master, &hits[e.start]);
        seeds.extend(seed_faces(master, &hits[e.end]));
        let faces = walk_candidate_faces(
            master,
            seeds,
            tol.edge_face_escape_limit,
            tol.n_faces_per_slave_edge,
        );

        // Candidate master edges in walk order; first found wins on ties.
        let catch_box = BoundBox::spanning(a, b)
            .inflated(tol.edge_master_catch_fraction * projected_line.mag());
        let mut tried: HashSet<usize> = HashSet::new();
        for &facei in &faces {
            for &mastere in &master.face_edges()[facei] {
                if !tried.insert(mastere) {
                    continue;
                }
                let master_line = master.edge_line(mastere);
                let edge_box = BoundBox::spanning(master_line.start, master_line.end);
                if !edge_box.overlaps(&catch_box) {
                    continue;
                }
                match intersect_edge_pair(&master_line, &projected_line, plane_third, tol) {
                    Ok(cut) => {
                        log::trace!(
                            "slave edge {edgei} cuts master edge {mastere} at {:?}",
                            cut.point
                        );
                        intersections.push(EdgeIntersection {
                            slave_edge: edgei,
                            master_edge: mastere,
                            cut,
                        });
                    }
                    // A failed candidate is simply not a cut during the
                    // initial search.
                    Err(_) => {}
                }
            }
        }
    }

    intersections
}

/// Master zone-local face under a projected position: the containing
/// face, or the nearest one. Ascending scan, strict comparisons.
fn master_face_under(master: &PrimitivePatch, q: Point3) -> usize {
    let mut nearest = (0usize, f64::MAX);
    for facei in 0..master.n_faces() {
        let scale = master.face_areas()[facei].mag().sqrt();
        if master.point_in_face(facei, q, 1e-12 * scale.max(1.0)) {
            return facei;
        }
        let (_, d) = master.nearest_on_face(facei, q);
        if d < nearest.1 {
            nearest = (facei, d);
        }
    }
    nearest.0
}

/// Runs the couple and emits its edits. Returns the addressing maps the
/// interface must hold while attached.
pub(crate) fn couple_interface(
    ctx: &CoupleContext<'_>,
    projected: &[ProjectedPoint],
    edits: &mut TopoChange,
) -> Result<CoupleMaps, MeshSlideError> {
    let mesh = ctx.mesh;
    let tol = ctx.tolerances;

    let master = PrimitivePatch::new(&mesh.zone_faces(ctx.master_zone), mesh.points());
    let slave = PrimitivePatch::new(&mesh.zone_faces(ctx.slave_zone), mesh.points());

    let hits = classify_slave_points(&master, &slave, projected, tol, ctx.match_type)?;
    let intersections = cut_slave_edges(&master, &slave, projected, &hits, tol);

    // Cut points: one per retired (matched) slave point, then one per
    // edge-edge intersection, ordered by (slave edge, walk order).
    let mut maps = CoupleMaps {
        cut_face_master: vec![Vec::new(); master.n_faces()],
        cut_face_slave: vec![Vec::new(); slave.n_faces()],
        ..Default::default()
    };

    let mut slave_cut_point: Vec<Option<PointId>> = vec![None; slave.n_points()];
    for pointi in 0..slave.n_points() {
        if !hits[pointi].is_matched() {
            continue;
        }
        let id = edits.add_point(projected[pointi].point, Some(ctx.cut_point_zone));
        maps.retired_point_map
            .insert(id, slave.mesh_points()[pointi]);
        slave_cut_point[pointi] = Some(id);
    }

    // Intersections grouped per slave edge, ordered along the stored
    // edge orientation.
    let mut edge_cuts: Vec<Vec<(f64, PointId)>> = vec![Vec::new(); slave.n_edges()];
    for intersection in &intersections {
        let id = edits.add_point(intersection.cut.point, Some(ctx.cut_point_zone));
        maps.cut_point_edge_pair_map.insert(
            id,
            EdgePair {
                master: master.global_edge(intersection.master_edge),
                slave: slave.global_edge(intersection.slave_edge),
            },
        );
        edge_cuts[intersection.slave_edge].push((intersection.cut.slave_fraction, id));
    }
    for cuts in &mut edge_cuts {
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
    }

    // Cut faces: each fully matched slave face becomes one interface
    // face, its boundary subdivided by the edge-edge cut points. The
    // loop orientation follows the slave face, so the face area points
    // from the slave cell towards the master cell.
    let slave_zone_faces = &mesh.face_zones()[ctx.slave_zone].faces;
    let mut slave_face_matched = vec![false; slave.n_faces()];
    for (sfacei, face) in slave.local_faces().iter().enumerate() {
        if !face.iter().all(|&p| hits[p].is_matched()) {
            log::trace!("slave face {sfacei} sticks out of the master patch; retained as boundary");
            continue;
        }
        slave_face_matched[sfacei] = true;

        let mut loop_points: Vec<PointId> = Vec::with_capacity(face.len() * 2);
        for (i, &v) in face.iter().enumerate() {
            let next = face[(i + 1) % face.len()];
            let cut_point = slave_cut_point[v].ok_or_else(|| {
                MeshSlideError::InconsistentAddressing(format!(
                    "matched slave point {v} has no cut point"
                ))
            })?;
            loop_points.push(cut_point);

            let local_edge = crate::topology::patch::LocalEdge::new(v, next);
            let edgei = slave.which_edge(local_edge).ok_or_else(|| {
                MeshSlideError::InconsistentAddressing(format!(
                    "slave face {sfacei} edge {v}-{next} is not a patch edge"
                ))
            })?;
            let stored = slave.edges()[edgei];
            if stored.start == v {
                for &(_, id) in &edge_cuts[edgei] {
                    loop_points.push(id);
                }
            } else {
                for &(_, id) in edge_cuts[edgei].iter().rev() {
                    loop_points.push(id);
                }
            }
        }

        // Projected slave face centre decides which master cell couples.
        let centre = face
            .iter()
            .fold(Point3::ZERO, |acc, &p| acc + projected[p].point)
            / face.len() as f64;
        let mfacei = master_face_under(&master, centre);

        let cut_face = edits.add_face(
            loop_points,
            Some(ctx.addressing.slave_face_cells[sfacei]),
            Some(ctx.addressing.master_face_cells[mfacei]),
            None,
            Some(ctx.cut_face_zone),
            false,
        );
        maps.cut_face_slave[sfacei].push(cut_face);
        maps.cut_face_master[mfacei].push(cut_face);
    }

    // Respecify the zone faces: matched faces are detached from their
    // cells and live on as zone-only faces; unmatched faces stay (or
    // return to being) ordinary boundary faces.
    for (sfacei, &face) in slave_zone_faces.iter().enumerate() {
        let flip = mesh.face_zones()[ctx.slave_zone].flip[sfacei];
        let modification = if slave_face_matched[sfacei] {
            FaceModification {
                points: None,
                owner: None,
                neighbour: None,
                patch: None,
                zone: Some(ctx.slave_zone),
                zone_flip: flip,
            }
        } else {
            FaceModification {
                points: None,
                owner: Some(ctx.addressing.slave_face_cells[sfacei]),
                neighbour: None,
                patch: Some(ctx.slave_patch_index),
                zone: Some(ctx.slave_zone),
                zone_flip: flip,
            }
        };
        edits.modify_face(face, modification);
    }

    let master_zone_faces = &mesh.face_zones()[ctx.master_zone].faces;
    for (mfacei, &face) in master_zone_faces.iter().enumerate() {
        let flip = mesh.face_zones()[ctx.master_zone].flip[mfacei];
        let covered = !maps.cut_face_master[mfacei].is_empty();
        let modification = if covered {
            FaceModification {
                points: None,
                owner: None,
                neighbour: None,
                patch: None,
                zone: Some(ctx.master_zone),
                zone_flip: flip,
            }
        } else {
            FaceModification {
                points: None,
                owner: Some(ctx.addressing.master_face_cells[mfacei]),
                neighbour: None,
                patch: Some(ctx.master_patch_index),
                zone: Some(ctx.master_zone),
                zone_flip: flip,
            }
        };
        edits.modify_face(face, modification);
    }

    log::debug!(
        "couple: {} retired points, {} edge intersections, {} cut faces",
        maps.retired_point_map.len(),
        maps.cut_point_edge_pair_map.len(),
        maps.cut_face_slave.iter().map(Vec::len).sum::<usize>(),
    );

    Ok(maps)
}
