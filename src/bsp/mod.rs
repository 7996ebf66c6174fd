//! Binary Space Partitioning (BSP) tree
//!
//! Nodes live in an arena owned by [`Bsp`] and refer to their children by
//! [`NodeId`]. The tree is grown incrementally by [`Bsp::add_polygon`]: the
//! first polygon reaching an empty node defines that node's plane.

pub mod node;
pub mod plane;
pub mod polygon;

pub use node::{Node, NodeId};
pub use plane::{Plane, SplitPolygon};
pub use polygon::Polygon;

use crate::float_types::{Real, plane_epsilon};
use crate::geometry::{Face, Geometry};
use crate::traits::Solid;
use nalgebra::Matrix4;

/// Fragments of a polygon pushed through a tree by [`Bsp::classify_polygon`].
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Fragments that reached a missing back child (solid space)
    pub inside: Vec<Polygon>,
    /// Fragments that reached a missing front child (empty space)
    pub outside: Vec<Polygon>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Front,
    Back,
}

/// A BSP tree over world-space polygons.
#[derive(Debug, Clone)]
pub struct Bsp {
    nodes: Vec<Node>,
}

impl Default for Bsp {
    fn default() -> Self {
        Self::new()
    }
}

impl Bsp {
    /// An empty tree: a single root node without a plane.
    pub fn new() -> Self {
        Bsp {
            nodes: vec![Node::new()],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|node| node.polygons.len()).sum()
    }

    /// Build a tree from the faces of `geometry`, each vertex mapped through
    /// `world_matrix`. Normals are recomputed in world space; faces that
    /// collapse to a degenerate polygon are skipped.
    pub fn from_geometry(geometry: &Geometry, world_matrix: &Matrix4<Real>) -> Self {
        let mut bsp = Bsp::new();
        for face in &geometry.faces {
            let polygon = Polygon::new(
                face.indices
                    .iter()
                    .map(|&i| world_matrix.transform_point(&geometry.vertices[i]))
                    .collect(),
            );
            bsp.add_polygon(polygon);
        }
        log::debug!(
            "built BSP with {} nodes from {} faces",
            bsp.node_count(),
            geometry.faces.len()
        );
        bsp
    }

    /// Build a tree from a solid placed in world space.
    pub fn from_solid<T: Solid + ?Sized>(solid: &T) -> Self {
        Self::from_geometry(solid.geometry(), &solid.world_matrix())
    }

    /// Build a tree by inserting `polygons` in order.
    pub fn from_polygons<I: IntoIterator<Item = Polygon>>(polygons: I) -> Self {
        let mut bsp = Bsp::new();
        bsp.add_polygons(polygons);
        bsp
    }

    pub fn add_polygons<I: IntoIterator<Item = Polygon>>(&mut self, polygons: I) {
        for polygon in polygons {
            self.add_polygon(polygon);
        }
    }

    /// Insert one polygon. An empty node adopts the polygon's plane; otherwise
    /// the polygon is split by the node's plane, coplanar parts stay at the
    /// node and the rest descend into (lazily created) children.
    pub fn add_polygon(&mut self, polygon: Polygon) {
        if polygon.is_degenerate() {
            log::trace!("skipping degenerate polygon with {} vertices", polygon.vertices.len());
            return;
        }

        let epsilon = plane_epsilon();
        let mut pending = vec![(self.root(), polygon)];

        while let Some((id, polygon)) = pending.pop() {
            let node = &mut self.nodes[id.0];
            let Some(plane) = node.plane.clone() else {
                node.plane = Some(Plane::from_polygon(&polygon));
                node.polygons.push(polygon);
                continue;
            };

            let split = plane.split_polygon(&polygon, epsilon);
            node.polygons.extend(split.coplanar_front);
            node.polygons.extend(split.coplanar_back);

            if !split.front.is_empty() {
                let front = self.child_or_insert(id, Side::Front);
                pending.extend(split.front.into_iter().map(|p| (front, p)));
            }
            if !split.back.is_empty() {
                let back = self.child_or_insert(id, Side::Back);
                pending.extend(split.back.into_iter().map(|p| (back, p)));
            }
        }
    }

    fn child_or_insert(&mut self, id: NodeId, side: Side) -> NodeId {
        let existing = match side {
            Side::Front => self.nodes[id.0].front,
            Side::Back => self.nodes[id.0].back,
        };
        if let Some(child) = existing {
            return child;
        }

        let child = NodeId(self.nodes.len());
        self.nodes.push(Node::new());
        match side {
            Side::Front => self.nodes[id.0].front = Some(child),
            Side::Back => self.nodes[id.0].back = Some(child),
        }
        child
    }

    /// Push `polygon` through the tree exactly as insertion would, sorting the
    /// fragments into those ending in solid space and those ending outside.
    /// Coplanar fragments follow the side their normal agrees with.
    pub fn classify_polygon(&self, polygon: &Polygon) -> Classification {
        let epsilon = plane_epsilon();
        let mut result = Classification::default();
        let mut pending = vec![(self.root(), polygon.clone())];

        while let Some((id, polygon)) = pending.pop() {
            let node = &self.nodes[id.0];
            let Some(plane) = &node.plane else {
                // only an empty tree has a node without a plane
                result.outside.push(polygon);
                continue;
            };

            let split = plane.split_polygon(&polygon, epsilon);
            let front = split.coplanar_front.into_iter().chain(split.front);
            let back = split.coplanar_back.into_iter().chain(split.back);

            match node.front {
                Some(child) => pending.extend(front.map(|p| (child, p))),
                None => result.outside.extend(front),
            }
            match node.back {
                Some(child) => pending.extend(back.map(|p| (child, p))),
                None => result.inside.extend(back),
            }
        }

        result
    }

    /// Remove the parts of `polygons` that lie inside this tree. A polygon
    /// with no inside fragment is kept whole rather than as its fragments.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            let classification = self.classify_polygon(&polygon);
            if classification.inside.is_empty() {
                kept.push(polygon);
            } else {
                kept.extend(classification.outside);
            }
        }
        kept
    }

    /// Remove every polygon of this tree that lies inside `other`.
    pub fn clip(&mut self, other: &Bsp) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Convert solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        // every arena node belongs to the tree, so a flat pass visits them all
        for node in &mut self.nodes {
            node.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Return all polygons in this tree, depth first from the root.
    pub fn polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            result.extend_from_slice(&node.polygons);
            stack.extend(node.back);
            stack.extend(node.front);
        }
        result
    }

    /// Consumes the tree and returns all of its polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes
            .into_iter()
            .flat_map(|node| node.polygons)
            .collect()
    }

    /// Flatten the tree into a [`Geometry`], giving every polygon its own
    /// fresh vertices. Run [`fix_edges`](crate::repair::fix_edges) on the
    /// result to weld it back into a connected mesh.
    pub fn to_geometry(&self) -> Geometry {
        let mut geometry = Geometry::new();
        for polygon in self.polygons() {
            let start = geometry.vertices.len();
            geometry.vertices.extend_from_slice(&polygon.vertices);
            geometry.faces.push(Face {
                indices: (start..geometry.vertices.len()).collect(),
                normal: polygon.normal,
            });
        }
        geometry
    }
}
