//! Groups the vertices of bad edges by line direction.

use std::collections::BTreeSet;

use crate::float_types::{Real, decimal_scale};
use crate::geometry::Geometry;
use crate::repair::edge_map::EdgeMap;
use hashbrown::HashMap;
use nalgebra::Point3;

/// Quantized unit direction, sign-normalized so that a segment and its
/// reverse share a key.
pub type DirectionKey = (i64, i64, i64);

/// Direction key of the segment `p1 -> p2`, rounded to `precision` decimal
/// digits. The first non-zero component of the key is always positive.
/// Returns `None` for zero-length segments.
pub fn direction_key(p1: &Point3<Real>, p2: &Point3<Real>, precision: u32) -> Option<DirectionKey> {
    let direction = (p2 - p1).try_normalize(Real::EPSILON)?;
    let scale = decimal_scale(precision);
    let key = (
        (direction.x * scale).round() as i64,
        (direction.y * scale).round() as i64,
        (direction.z * scale).round() as i64,
    );

    let first_non_zero = [key.0, key.1, key.2].into_iter().find(|&c| c != 0);
    Some(match first_non_zero {
        Some(c) if c < 0 => (-key.0, -key.1, -key.2),
        _ => key,
    })
}

/// For every direction, the vertices lying on bad edges with that direction.
#[derive(Debug, Clone, Default)]
pub struct VectorMap {
    vertices_by_direction: HashMap<DirectionKey, BTreeSet<usize>>,
    precision: u32,
}

impl VectorMap {
    pub fn new(precision: u32) -> Self {
        VectorMap {
            vertices_by_direction: HashMap::new(),
            precision,
        }
    }

    /// Index the bad edges of `edge_map`.
    pub fn build(geometry: &Geometry, edge_map: &EdgeMap, precision: u32) -> Self {
        let mut vector_map = VectorMap::new(precision);
        for edge in edge_map.bad_edges() {
            vector_map.add_edge(geometry, edge.v1, edge.v2);
        }
        vector_map
    }

    pub fn add_edge(&mut self, geometry: &Geometry, v1: usize, v2: usize) {
        let Some(key) = direction_key(&geometry.vertices[v1], &geometry.vertices[v2], self.precision)
        else {
            return;
        };
        let vertices = self.vertices_by_direction.entry(key).or_default();
        vertices.insert(v1);
        vertices.insert(v2);
    }

    /// Vertices on bad edges parallel to `p1 -> p2`.
    pub fn candidates(&self, p1: &Point3<Real>, p2: &Point3<Real>) -> Option<&BTreeSet<usize>> {
        self.vertices_by_direction
            .get(&direction_key(p1, p2, self.precision)?)
    }

    /// Number of distinct directions.
    pub fn len(&self) -> usize {
        self.vertices_by_direction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices_by_direction.is_empty()
    }
}
