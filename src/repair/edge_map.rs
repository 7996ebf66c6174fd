//! Edge adjacency index over a [`Geometry`].

use crate::float_types::Real;
use crate::geometry::{Face, Geometry};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use nalgebra::Point3;

/// Canonical key of the unordered edge `{a, b}`.
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// An undirected edge and the (at most two) faces registered on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub v1: usize,
    pub v2: usize,
    pub face1: usize,
    /// `None` for a boundary (bad) edge
    pub face2: Option<usize>,
}

impl Edge {
    /// Used by a single face only.
    pub const fn is_bad(&self) -> bool {
        self.face2.is_none()
    }
}

/// Map from canonical edge key to [`Edge`], with running counters.
///
/// Registering an edge a third time leaves the record untouched and only
/// bumps [`overshared_count`](EdgeMap::overshared_count).
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: HashMap<(usize, usize), Edge>,
    edge_count: usize,
    bad_edge_count: usize,
    overshared_count: usize,
    pub(crate) split_count: usize,
    pub(crate) split_limit_reached: bool,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every edge of every face of `geometry`.
    pub fn build(geometry: &Geometry) -> Self {
        let mut edge_map = EdgeMap::new();
        for (face_index, face) in geometry.faces.iter().enumerate() {
            edge_map.add_face(face_index, face);
        }
        edge_map
    }

    pub fn add_face(&mut self, face_index: usize, face: &Face) {
        for (a, b) in face.edges() {
            self.add_edge(a, b, face_index);
        }
    }

    /// Register `face` on edge `{v1, v2}`.
    pub fn add_edge(&mut self, v1: usize, v2: usize, face: usize) {
        match self.edges.entry(edge_key(v1, v2)) {
            Entry::Vacant(entry) => {
                entry.insert(Edge {
                    v1,
                    v2,
                    face1: face,
                    face2: None,
                });
                self.edge_count += 1;
                self.bad_edge_count += 1;
            },
            Entry::Occupied(mut entry) => {
                let edge = entry.get_mut();
                if edge.face2.is_none() {
                    edge.face2 = Some(face);
                    self.bad_edge_count -= 1;
                } else {
                    log::trace!(
                        "edge ({v1}, {v2}) already shared by faces {} and {:?}, ignoring face {face}",
                        edge.face1,
                        edge.face2
                    );
                    self.overshared_count += 1;
                }
            },
        }
    }

    /// Unregister `face` from edge `{v1, v2}`; the edge disappears once no
    /// face uses it.
    pub fn remove_edge(&mut self, v1: usize, v2: usize, face: usize) {
        let Entry::Occupied(mut entry) = self.edges.entry(edge_key(v1, v2)) else {
            return;
        };
        let edge = entry.get_mut();
        if edge.face2 == Some(face) {
            edge.face2 = None;
            self.bad_edge_count += 1;
        } else if edge.face1 == face {
            if let Some(other) = edge.face2.take() {
                edge.face1 = other;
                self.bad_edge_count += 1;
            } else {
                entry.remove();
                self.edge_count -= 1;
                self.bad_edge_count -= 1;
            }
        }
    }

    pub fn get(&self, v1: usize, v2: usize) -> Option<&Edge> {
        self.edges.get(&edge_key(v1, v2))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn bad_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(|edge| edge.is_bad())
    }

    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub const fn bad_edge_count(&self) -> usize {
        self.bad_edge_count
    }

    /// Registrations ignored because the edge already had two faces.
    pub const fn overshared_count(&self) -> usize {
        self.overshared_count
    }

    /// Face splits performed by the repair that produced this map.
    pub const fn split_count(&self) -> usize {
        self.split_count
    }

    /// Whether that repair stopped at its split cap.
    pub const fn split_limit_reached(&self) -> bool {
        self.split_limit_reached
    }

    /// Wireframe segments for rendering: every boundary edge plus every edge
    /// whose two face normals meet at `angle_degrees` or more.
    ///
    /// Segments are ordered by their vertex indices.
    pub fn edges_geometry(
        &self,
        geometry: &Geometry,
        angle_degrees: Real,
    ) -> Vec<[Point3<Real>; 2]> {
        let threshold = angle_degrees.to_radians().cos();

        let mut selected: Vec<(&(usize, usize), &Edge)> = self
            .edges
            .iter()
            .filter(|(_, edge)| match edge.face2 {
                None => true,
                Some(face2) => {
                    let n1 = geometry.faces[edge.face1].normal;
                    let n2 = geometry.faces[face2].normal;
                    n1.dot(&n2) <= threshold
                },
            })
            .collect();
        selected.sort_unstable_by_key(|(key, _)| **key);

        selected
            .into_iter()
            .map(|(_, edge)| [geometry.vertices[edge.v1], geometry.vertices[edge.v2]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::DEFAULT_EDGE_ANGLE_DEGREES;

    #[test]
    fn counters_follow_registrations() {
        let mut edge_map = EdgeMap::new();
        edge_map.add_edge(0, 1, 0);
        assert_eq!((edge_map.edge_count(), edge_map.bad_edge_count()), (1, 1));

        edge_map.add_edge(1, 0, 1);
        assert_eq!((edge_map.edge_count(), edge_map.bad_edge_count()), (1, 0));
        assert_eq!(edge_map.get(1, 0).unwrap().face2, Some(1));

        edge_map.add_edge(0, 1, 2);
        assert_eq!(edge_map.overshared_count(), 1);
        assert_eq!(edge_map.bad_edge_count(), 0);
    }

    #[test]
    fn remove_edge_reopens_then_drops() {
        let mut edge_map = EdgeMap::new();
        edge_map.add_edge(3, 7, 0);
        edge_map.add_edge(3, 7, 1);

        edge_map.remove_edge(7, 3, 0);
        let edge = edge_map.get(3, 7).unwrap();
        assert_eq!((edge.face1, edge.face2), (1, None));
        assert_eq!(edge_map.bad_edge_count(), 1);

        edge_map.remove_edge(3, 7, 1);
        assert!(edge_map.get(3, 7).is_none());
        assert_eq!((edge_map.edge_count(), edge_map.bad_edge_count()), (0, 0));
    }

    #[test]
    fn cube_wireframe_has_twelve_creases() {
        let cube = Geometry::cube(1.0);
        let edge_map = EdgeMap::build(&cube);
        assert_eq!(edge_map.edge_count(), 12);
        assert_eq!(edge_map.bad_edge_count(), 0);
        assert_eq!(
            edge_map.edges_geometry(&cube, DEFAULT_EDGE_ANGLE_DEGREES).len(),
            12
        );
    }
}
