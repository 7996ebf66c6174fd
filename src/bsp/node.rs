//! BSP tree node data structure

use crate::bsp::plane::Plane;
use crate::bsp::polygon::Polygon;

/// Index of a [`Node`] inside its owning [`Bsp`](crate::bsp::Bsp) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Dividing plane, or **None** until the first polygon is inserted.
    pub plane: Option<Plane>,

    /// Child holding the *front* half‑space.
    pub front: Option<NodeId>,

    /// Child holding the *back* half‑space.
    pub back: Option<NodeId>,

    /// Polygons that lie *exactly* on `plane`
    pub polygons: Vec<Polygon>,
}

impl Node {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    pub const fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }
}
