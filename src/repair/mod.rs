//! Edge-manifold repair.
//!
//! [`fix_edges`] welds near-coincident vertices, indexes the edges of a
//! [`Geometry`] and removes T-junctions by inserting the offending vertex
//! into the face whose edge it lies on. Two passes run: a tight one using
//! direction-grouped candidates, then, for meshes that are almost manifold,
//! a coarse one trying every vertex left on a bad edge.

use std::collections::{BTreeSet, VecDeque};

use crate::float_types::{
    COARSE_SEGMENT_DISTANCE, MAX_SPLIT_STEPS, MERGE_PRECISION, Real, SECOND_PASS_BAD_EDGE_RATIO,
    SECOND_PASS_MIN_FACES, SEGMENT_DISTANCE, VECTOR_PRECISION,
};
use crate::geometry::Geometry;
use nalgebra::Point3;

pub mod edge_map;
pub mod vector_map;

use edge_map::{Edge, EdgeMap};
use vector_map::VectorMap;

/// Tolerances and limits of [`fix_edges_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOptions {
    /// Decimal digits of the vertex-identity grid
    pub merge_precision: u32,
    /// Decimal digits of the edge-direction grouping
    pub vector_precision: u32,
    /// Colinearity tolerance of the first pass
    pub segment_distance: Real,
    /// Colinearity tolerance of the second pass
    pub coarse_segment_distance: Real,
    /// Total face splits allowed before giving up
    pub max_split_steps: usize,
    /// Second pass runs while `bad edges < ratio * faces`
    pub second_pass_bad_edge_ratio: Real,
    /// Second pass needs at least this many faces
    pub second_pass_min_faces: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            merge_precision: MERGE_PRECISION,
            vector_precision: VECTOR_PRECISION,
            segment_distance: SEGMENT_DISTANCE,
            coarse_segment_distance: COARSE_SEGMENT_DISTANCE,
            max_split_steps: MAX_SPLIT_STEPS,
            second_pass_bad_edge_ratio: SECOND_PASS_BAD_EDGE_RATIO,
            second_pass_min_faces: SECOND_PASS_MIN_FACES,
        }
    }
}

/// Whether `p3` lies strictly inside segment `p1 p2`: its distance from the
/// line is below `distance` and it is closer to both endpoints than they are
/// to each other.
pub fn is_point_on_segment(
    p1: &Point3<Real>,
    p2: &Point3<Real>,
    p3: &Point3<Real>,
    distance: Real,
) -> bool {
    let segment = p2 - p1;
    let length = segment.norm();
    if length <= Real::EPSILON {
        return false;
    }

    let offset = p3 - p1;
    if segment.cross(&offset).norm() / length >= distance {
        return false;
    }

    offset.norm() < length && (p3 - p2).norm() < length
}

/// Repair `geometry` with the default [`RepairOptions`].
pub fn fix_edges(geometry: &mut Geometry) -> EdgeMap {
    fix_edges_with(geometry, &RepairOptions::default())
}

/// Merge vertices, then split faces along T-junctions until every edge is
/// shared by two faces or no further candidate is found.
///
/// Faces keep their position in `geometry.faces`, so the returned map's face
/// indices stay valid. `geometry.is_manifold` reflects the final bad edge
/// count.
pub fn fix_edges_with(geometry: &mut Geometry, options: &RepairOptions) -> EdgeMap {
    geometry.merge_vertices(options.merge_precision);

    let mut edge_map = EdgeMap::build(geometry);
    if edge_map.overshared_count() > 0 {
        log::warn!(
            "{} edge registrations ignored: edges shared by more than two faces",
            edge_map.overshared_count()
        );
    }

    if edge_map.bad_edge_count() > 0 {
        let initial_bad_edges = edge_map.bad_edge_count();
        let vector_map = VectorMap::build(geometry, &edge_map, options.vector_precision);
        break_faces(
            geometry,
            &mut edge_map,
            Candidates::ByDirection(&vector_map),
            options.segment_distance,
            options.max_split_steps,
        );
        log::debug!(
            "first pass: {initial_bad_edges} -> {} bad edges over {} directions",
            edge_map.bad_edge_count(),
            vector_map.len()
        );

        if needs_second_pass(geometry, &edge_map, options) {
            let candidates: BTreeSet<usize> = edge_map
                .bad_edges()
                .flat_map(|edge| [edge.v1, edge.v2])
                .collect();
            break_faces(
                geometry,
                &mut edge_map,
                Candidates::Any(&candidates),
                options.coarse_segment_distance,
                options.max_split_steps,
            );
            log::debug!("second pass: {} bad edges left", edge_map.bad_edge_count());
        }
    }

    geometry.is_manifold = edge_map.bad_edge_count() == 0;
    log::debug!(
        "fix_edges: {} faces, {} edges, {} bad, {} splits",
        geometry.faces.len(),
        edge_map.edge_count(),
        edge_map.bad_edge_count(),
        edge_map.split_count()
    );
    edge_map
}

fn needs_second_pass(geometry: &Geometry, edge_map: &EdgeMap, options: &RepairOptions) -> bool {
    let face_count = geometry.faces.len();
    let bad_edges = edge_map.bad_edge_count();
    !edge_map.split_limit_reached()
        && bad_edges > 0
        && (bad_edges as Real) < options.second_pass_bad_edge_ratio * face_count as Real
        && face_count >= options.second_pass_min_faces
}

/// Vertices worth testing against a bad edge.
#[derive(Clone, Copy)]
enum Candidates<'a> {
    /// Only vertices of bad edges with the same direction
    ByDirection(&'a VectorMap),
    /// The same set for every edge
    Any(&'a BTreeSet<usize>),
}

impl<'a> Candidates<'a> {
    fn for_edge(self, p1: &Point3<Real>, p2: &Point3<Real>) -> Option<&'a BTreeSet<usize>> {
        match self {
            Candidates::ByDirection(vector_map) => vector_map.candidates(p1, p2),
            Candidates::Any(vertices) => Some(vertices),
        }
    }
}

/// Work through all faces, inserting candidate vertices into their bad
/// edges. A split face is queued again; a face is done once none of its bad
/// edges has a candidate on it.
fn break_faces(
    geometry: &mut Geometry,
    edge_map: &mut EdgeMap,
    candidates: Candidates<'_>,
    distance: Real,
    max_steps: usize,
) {
    let mut queue: VecDeque<usize> = (0..geometry.faces.len()).collect();

    while let Some(face_index) = queue.pop_front() {
        let Some((position, vertex)) =
            find_split(geometry, edge_map, face_index, candidates, distance)
        else {
            continue;
        };

        if edge_map.split_count >= max_steps {
            log::warn!(
                "face breaking aborted after {} splits, {} bad edges left",
                edge_map.split_count,
                edge_map.bad_edge_count()
            );
            edge_map.split_limit_reached = true;
            return;
        }

        let indices = &mut geometry.faces[face_index].indices;
        let v1 = indices[position];
        let v2 = indices[(position + 1) % indices.len()];
        indices.insert(position + 1, vertex);

        edge_map.remove_edge(v1, v2, face_index);
        edge_map.add_edge(v1, vertex, face_index);
        edge_map.add_edge(vertex, v2, face_index);
        edge_map.split_count += 1;
        log::trace!("inserted vertex {vertex} between {v1} and {v2} of face {face_index}");

        queue.push_back(face_index);
    }
}

/// First `(edge position, vertex)` such that the face's edge at `position` is
/// bad and `vertex` lies strictly inside it.
fn find_split(
    geometry: &Geometry,
    edge_map: &EdgeMap,
    face_index: usize,
    candidates: Candidates<'_>,
    distance: Real,
) -> Option<(usize, usize)> {
    let vertices = &geometry.vertices;
    for (position, (v1, v2)) in geometry.faces[face_index].edges().enumerate() {
        if !edge_map.get(v1, v2).is_some_and(Edge::is_bad) {
            continue;
        }

        let (p1, p2) = (&vertices[v1], &vertices[v2]);
        let Some(candidates) = candidates.for_edge(p1, p2) else {
            continue;
        };

        let found = candidates
            .iter()
            .copied()
            .filter(|&v3| v3 != v1 && v3 != v2)
            .find(|&v3| is_point_on_segment(p1, p2, &vertices[v3], distance));
        if let Some(vertex) = found {
            return Some((position, vertex));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_on_segment_is_strict() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);

        assert!(is_point_on_segment(&a, &b, &Point3::new(0.5, 0.0, 0.0), 1e-6));
        assert!(!is_point_on_segment(&a, &b, &a, 1e-6));
        assert!(!is_point_on_segment(&a, &b, &Point3::new(2.5, 0.0, 0.0), 1e-6));
        assert!(!is_point_on_segment(&a, &b, &Point3::new(1.0, 0.001, 0.0), 1e-6));
        assert!(is_point_on_segment(&a, &b, &Point3::new(1.0, 0.001, 0.0), 0.01));
    }

    #[test]
    fn open_quad_is_left_alone() {
        let mut quad = Geometry::new();
        quad.add_face([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]])
            .unwrap();
        let edge_map = fix_edges(&mut quad);

        assert_eq!(edge_map.bad_edge_count(), 4);
        assert_eq!(edge_map.split_count(), 0);
        assert!(!quad.is_manifold);
    }
}
