//! Primitive solids

use crate::float_types::Real;
use crate::geometry::{Face, Geometry};
use nalgebra::{Point3, Vector3};

impl Geometry {
    /// Create an axis-aligned box spanning `(0,0,0)..(width, length, height)`
    /// with shared corner vertices and outward-facing quads.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Geometry {
        // Define the eight corner vertices once
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),        // 0: origin
            Point3::new(width, 0.0, 0.0),      // 1: +X
            Point3::new(width, length, 0.0),   // 2: +X+Y
            Point3::new(0.0, length, 0.0),     // 3: +Y
            Point3::new(0.0, 0.0, height),     // 4: +Z
            Point3::new(width, 0.0, height),   // 5: +X+Z
            Point3::new(width, length, height), // 6: +X+Y+Z
            Point3::new(0.0, length, height),  // 7: +Y+Z
        ];

        // (indices, normal), CCW seen from outside
        let face_definitions = [
            (vec![0, 3, 2, 1], -Vector3::z()), // Bottom face
            (vec![4, 5, 6, 7], Vector3::z()),  // Top face
            (vec![0, 1, 5, 4], -Vector3::y()), // Front face
            (vec![3, 7, 6, 2], Vector3::y()),  // Back face
            (vec![0, 4, 7, 3], -Vector3::x()), // Left face
            (vec![1, 2, 6, 5], Vector3::x()),  // Right face
        ];

        let faces = face_definitions
            .into_iter()
            .map(|(indices, normal)| Face { indices, normal })
            .collect();

        Geometry {
            vertices,
            faces,
            is_manifold: true,
        }
    }

    /// Cube of side `size` with one corner at the origin.
    pub fn cube(size: Real) -> Geometry {
        Self::cuboid(size, size, size)
    }
}
