//! Dividing planes and polygon splitting

use crate::bsp::polygon::Polygon;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

// Plane classification bit flags
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `n · p = w` with unit normal `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

/// The four buckets produced by [`Plane::split_polygon`].
#[derive(Debug, Clone, Default)]
pub struct SplitPolygon {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

impl Plane {
    /// Create a new plane from normal vector and distance
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// The plane through `point` with the given normal.
    pub fn from_point_normal(point: &Point3<Real>, normal: Vector3<Real>) -> Self {
        let normal = normal.normalize();
        Plane {
            w: normal.dot(&point.coords),
            normal,
        }
    }

    /// Plane through the first vertex of `polygon`, along its normal.
    pub fn from_polygon(polygon: &Polygon) -> Self {
        Self::from_point_normal(&polygon.vertices[0], polygon.normal)
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point, snapping distances within `epsilon` to [`COPLANAR`].
    pub fn orient_point(&self, point: &Point3<Real>, epsilon: Real) -> i8 {
        let t = self.signed_distance(point);
        if t < -epsilon {
            BACK
        } else if t > epsilon {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Splits `polygon` by this plane into four buckets.
    ///
    /// Coplanar polygons go to `coplanar_front` when their normal agrees
    /// with the plane's, `coplanar_back` otherwise. Spanning polygons are cut
    /// along the plane; each part keeps the original normal and is kept only
    /// if it retains at least 3 vertices.
    pub fn split_polygon(&self, polygon: &Polygon, epsilon: Real) -> SplitPolygon {
        let mut result = SplitPolygon::default();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(v, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.normal) > 0.0 {
                    result.coplanar_front.push(polygon.clone());
                } else {
                    result.coplanar_back.push(polygon.clone());
                }
            },
            FRONT => result.front.push(polygon.clone()),
            BACK => result.back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vertex_i, vertex_j) = (polygon.vertices[i], polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let edge = vertex_j - vertex_i;
                        let t = (self.w - self.normal.dot(&vertex_i.coords))
                            / self.normal.dot(&edge);
                        let intersection = vertex_i + edge * t;
                        split_front.push(intersection);
                        split_back.push(intersection);
                    }
                }

                if split_front.len() >= 3 {
                    result
                        .front
                        .push(Polygon::with_normal(split_front, polygon.normal));
                }
                if split_back.len() >= 3 {
                    result
                        .back
                        .push(Polygon::with_normal(split_back, polygon.normal));
                }
            },
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PLANE_EPSILON;

    fn square(z: Real) -> Polygon {
        Polygon::new(vec![
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ])
    }

    #[test]
    fn classify_sides() {
        let plane = Plane::from_normal(Vector3::z(), 0.0);
        assert_eq!(plane.split_polygon(&square(1.0), PLANE_EPSILON).front.len(), 1);
        assert_eq!(plane.split_polygon(&square(-1.0), PLANE_EPSILON).back.len(), 1);

        let coplanar = plane.split_polygon(&square(0.000001), PLANE_EPSILON);
        assert_eq!(coplanar.coplanar_front.len(), 1);

        let mut flipped = square(0.0);
        flipped.flip();
        assert_eq!(plane.split_polygon(&flipped, PLANE_EPSILON).coplanar_back.len(), 1);
    }

    #[test]
    fn spanning_square_is_cut_in_two() {
        let plane = Plane::from_normal(Vector3::y(), 0.0);
        let split = plane.split_polygon(&square(0.0), PLANE_EPSILON);

        assert!(split.coplanar_front.is_empty() && split.coplanar_back.is_empty());
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front[0].vertices.len(), 4);
        assert!(split.front[0].vertices.iter().all(|v| v.y >= -PLANE_EPSILON));
        assert!(split.back[0].vertices.iter().all(|v| v.y <= PLANE_EPSILON));
        assert_eq!(split.front[0].normal, Vector3::z());
    }

    #[test]
    fn vertex_on_plane_goes_to_both_parts() {
        // Triangle with its apex exactly on x = 0
        let triangle = Polygon::new(vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
        ]);
        let plane = Plane::from_normal(Vector3::x(), 0.0);
        let split = plane.split_polygon(&triangle, PLANE_EPSILON);
        assert_eq!(split.front[0].vertices.len(), 3);
        assert_eq!(split.back[0].vertices.len(), 3);
    }
}
