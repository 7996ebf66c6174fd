//! Union, intersection and subtraction of solids via BSP clipping.

use crate::bsp::Bsp;
use crate::float_types::MIN_SOLID_FACES;
use crate::geometry::Geometry;
use crate::repair::{RepairOptions, edge_map::EdgeMap, fix_edges_with};
use crate::traits::Solid;

/// The boolean operation to apply in [`boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersection,
    Subtraction,
}

impl Bsp {
    /// Merge the surface of `other` into this tree, dropping what each
    /// solid encloses of the other and the duplicated coplanar faces.
    fn merge(&mut self, mut other: Bsp) {
        self.clip(&other);
        other.clip(self);
        other.invert();
        other.clip(self);
        other.invert();
        self.add_polygons(other.into_polygons());
    }

    /// Return a tree representing union of the two trees.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union(mut self, other: Bsp) -> Bsp {
        self.merge(other);
        self
    }

    /// Return a tree representing intersection of the two trees,
    /// computed as `¬(¬a ∪ ¬b)`.
    ///
    /// ```text
    /// let c = a.intersect(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersect(mut self, mut other: Bsp) -> Bsp {
        self.invert();
        other.invert();
        self.merge(other);
        self.invert();
        self
    }

    /// Return a tree representing difference of the two trees,
    /// computed as `¬(¬a ∪ b)`.
    ///
    /// ```text
    /// let c = a.subtract(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn subtract(mut self, other: Bsp) -> Bsp {
        self.invert();
        self.merge(other);
        self.invert();
        self
    }

    /// Apply `op` with `other` as the second operand.
    pub fn apply(self, op: BooleanOp, other: Bsp) -> Bsp {
        match op {
            BooleanOp::Union => self.union(other),
            BooleanOp::Intersection => self.intersect(other),
            BooleanOp::Subtraction => self.subtract(other),
        }
    }
}

/// Combine two solids and return the repaired world-space result.
pub fn boolean<A, B>(op: BooleanOp, a: &A, b: &B) -> Geometry
where
    A: Solid + ?Sized,
    B: Solid + ?Sized,
{
    boolean_with(op, a, b, &RepairOptions::default()).0
}

/// Like [`boolean`], with explicit repair options, also returning the edge
/// map of the repaired result for wireframe extraction.
///
/// If either operand has fewer than [`MIN_SOLID_FACES`] faces no BSP is
/// built: the operand that represents the answer (`b` for a union with a
/// degenerate `a`, `a` otherwise) is returned in world space, unrepaired.
pub fn boolean_with<A, B>(
    op: BooleanOp,
    a: &A,
    b: &B,
    options: &RepairOptions,
) -> (Geometry, EdgeMap)
where
    A: Solid + ?Sized,
    B: Solid + ?Sized,
{
    let a_degenerate = a.geometry().faces.len() < MIN_SOLID_FACES;
    let b_degenerate = b.geometry().faces.len() < MIN_SOLID_FACES;
    if a_degenerate || b_degenerate {
        log::debug!(
            "{op:?} skipped: degenerate operand (a: {} faces, b: {} faces)",
            a.geometry().faces.len(),
            b.geometry().faces.len()
        );
        let untouched = if op == BooleanOp::Union && a_degenerate && !b_degenerate {
            world_geometry(b)
        } else {
            world_geometry(a)
        };
        let edges = EdgeMap::build(&untouched);
        return (untouched, edges);
    }

    let bsp_a = Bsp::from_solid(a);
    let bsp_b = Bsp::from_solid(b);
    let result = bsp_a.apply(op, bsp_b);
    log::debug!("{op:?} produced {} polygons", result.polygon_count());

    let mut geometry = result.to_geometry();
    let edges = fix_edges_with(&mut geometry, options);
    (geometry, edges)
}

fn world_geometry<T: Solid + ?Sized>(solid: &T) -> Geometry {
    let mut geometry = solid.geometry().clone();
    geometry.apply_matrix4(&solid.world_matrix());
    geometry
}
