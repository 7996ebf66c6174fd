//! World-space polygon used inside the BSP tree

use crate::float_types::Real;
use crate::geometry::newell_normal;
use nalgebra::{Point3, Vector3};

/// A convex-or-not planar polygon carrying materialized points rather than
/// indices, so boolean operations can clip and duplicate vertices freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point3<Real>>,

    /// Cached unit normal (zero for degenerate polygons)
    pub normal: Vector3<Real>,
}

impl Polygon {
    /// Create a polygon, computing its normal by Newell's method.
    pub fn new(vertices: Vec<Point3<Real>>) -> Self {
        let normal = newell_normal(&vertices);
        Polygon { vertices, normal }
    }

    /// Create a polygon with a known normal, as produced by splitting.
    pub const fn with_normal(vertices: Vec<Point3<Real>>, normal: Vector3<Real>) -> Self {
        Polygon { vertices, normal }
    }

    /// Fewer than 3 vertices, or no usable normal.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.normal.norm_squared() < Real::EPSILON
    }

    /// Reverses winding order and negates the normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.normal = -self.normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_reverses_winding() {
        let mut polygon = Polygon::new(vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        polygon.flip();
        assert_eq!(polygon.normal, -Vector3::z());
        assert_eq!(polygon.vertices[0], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(newell_normal(&polygon.vertices), polygon.normal);
    }

    #[test]
    fn colinear_points_are_degenerate() {
        let polygon = Polygon::new(vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert!(polygon.is_degenerate());
    }
}
