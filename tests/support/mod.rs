//! Test support library
//! Provides mesh builders and helpers shared by the integration tests.

#![allow(dead_code)]

use bimcsg::{Geometry, bsp::Polygon, float_types::Real};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Area of a planar polygon, fanned from its first vertex.
pub fn polygon_area(polygon: &Polygon) -> Real {
    let v = &polygon.vertices;
    (1..v.len().saturating_sub(1))
        .map(|i| (v[i] - v[0]).cross(&(v[i + 1] - v[0])).norm() * 0.5)
        .sum()
}

/// Unit cube whose top face is cut into `strips` quads along x.
///
/// The front (`y = 0`) and back (`y = 1`) faces stay single quads, so every
/// inner strip vertex forms a T-junction on their top edges. `lift` raises
/// one inner front vertex `(i, dz)` off the edge line.
pub fn strip_roof_cube(strips: usize, lift: Option<(usize, Real)>) -> Geometry {
    assert!(strips >= 1);
    let mut vertices = Geometry::cube(1.0).vertices;

    let inner = strips - 1;
    for i in 1..strips {
        let x = i as Real / strips as Real;
        let z = match lift {
            Some((j, dz)) if j == i => 1.0 + dz,
            _ => 1.0,
        };
        vertices.push(Point3::new(x, 0.0, z));
    }
    for i in 1..strips {
        vertices.push(Point3::new(i as Real / strips as Real, 1.0, 1.0));
    }

    let front = |i: usize| match i {
        0 => 4,
        i if i == strips => 5,
        i => 8 + i - 1,
    };
    let back = |i: usize| match i {
        0 => 7,
        i if i == strips => 6,
        i => 8 + inner + i - 1,
    };

    let mut faces = vec![
        vec![0, 3, 2, 1], // bottom
        vec![0, 1, 5, 4], // front
        vec![3, 7, 6, 2], // back
        vec![0, 4, 7, 3], // left
        vec![1, 2, 6, 5], // right
    ];
    faces.extend((0..strips).map(|i| vec![front(i), front(i + 1), back(i + 1), back(i)]));

    Geometry::from_faces(vertices, &faces).expect("valid strip roof cube")
}

/// Unit cube with its top split once at `x = 0.5`: seven faces and two
/// T-junctions.
pub fn t_junction_cube() -> Geometry {
    strip_roof_cube(2, None)
}
