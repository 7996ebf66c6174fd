//! Indexed polyhedral mesh shared by the BSP tree and the edge repair.

use crate::errors::GeometryError;
use crate::float_types::{Real, decimal_scale};
use crate::traits::Transform;
use hashbrown::HashMap;
use nalgebra::{Matrix4, Point3, Vector3};

pub mod shapes;

/// A vertex handed to [`Geometry::add_face`]: either an existing index or a
/// new point that gets appended to the vertex list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceVertex {
    Index(usize),
    Point(Point3<Real>),
}

impl From<usize> for FaceVertex {
    fn from(index: usize) -> Self {
        FaceVertex::Index(index)
    }
}

impl From<Point3<Real>> for FaceVertex {
    fn from(point: Point3<Real>) -> Self {
        FaceVertex::Point(point)
    }
}

impl From<[Real; 3]> for FaceVertex {
    fn from([x, y, z]: [Real; 3]) -> Self {
        FaceVertex::Point(Point3::new(x, y, z))
    }
}

/// A planar polygon described by indices into the owning [`Geometry`].
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Indices into `Geometry::vertices`, in winding order
    pub indices: Vec<usize>,

    /// Cached outward unit normal (zero for degenerate faces)
    pub normal: Vector3<Real>,
}

impl Face {
    /// Return an iterator over paired indices each forming an edge of the face
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices
            .iter()
            .zip(self.indices.iter().cycle().skip(1))
            .map(|(&a, &b)| (a, b))
    }

    /// Recompute `normal` from the current vertex positions.
    pub fn update_normal(&mut self, vertices: &[Point3<Real>]) {
        self.normal = newell_normal(self.indices.iter().map(|&i| &vertices[i]));
    }
}

/// Unit normal of a polygon by Newell's method, robust to mild non-planarity.
/// Returns the zero vector for degenerate input.
pub fn newell_normal<'a, I>(points: I) -> Vector3<Real>
where
    I: IntoIterator<Item = &'a Point3<Real>>,
    I::IntoIter: Clone,
{
    let points = points.into_iter();
    let normal = points
        .clone()
        .zip(points.cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (curr, next)| {
            acc + Vector3::new(
                (curr.y - next.y) * (curr.z + next.z),
                (curr.z - next.z) * (curr.x + next.x),
                (curr.x - next.x) * (curr.y + next.y),
            )
        });

    normal.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// An indexed polyhedral mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Point3<Real>>,
    pub faces: Vec<Face>,

    /// `true` iff every edge is shared by exactly two faces; maintained by
    /// [`fix_edges`](crate::repair::fix_edges)
    pub is_manifold: bool,
}

impl Geometry {
    /// Returns a new empty Geometry
    pub const fn new() -> Self {
        Geometry {
            vertices: Vec::new(),
            faces: Vec::new(),
            is_manifold: false,
        }
    }

    /// Build a Geometry from a vertex list and per-face index lists, as
    /// supplied by mesh producers.
    ///
    /// ## Errors
    /// If a face has fewer than 3 indices or references a missing vertex.
    pub fn from_faces(
        vertices: Vec<Point3<Real>>,
        faces: &[Vec<usize>],
    ) -> Result<Self, GeometryError> {
        let mut geometry = Geometry {
            vertices,
            ..Geometry::new()
        };
        for face in faces {
            geometry.add_face(face.iter().copied())?;
        }
        Ok(geometry)
    }

    /// Append a face. Each element is either an index into the existing
    /// vertex list or a point, which is appended and referenced by its new
    /// index. The face normal is computed immediately.
    ///
    /// Returns the index of the new face.
    ///
    /// ## Errors
    /// If fewer than 3 vertices are given or an index is out of bounds; the
    /// geometry is left unchanged in that case.
    pub fn add_face<I, V>(&mut self, vertices: I) -> Result<usize, GeometryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FaceVertex>,
    {
        let face_vertices: Vec<FaceVertex> = vertices.into_iter().map(Into::into).collect();
        if face_vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(face_vertices.len()));
        }

        let len = self.vertices.len();
        if let Some(&index) = face_vertices.iter().find_map(|v| match v {
            FaceVertex::Index(index) if *index >= len => Some(index),
            _ => None,
        }) {
            return Err(GeometryError::IndexOutOfRange { index, len });
        }

        let indices = face_vertices
            .into_iter()
            .map(|v| match v {
                FaceVertex::Index(index) => index,
                FaceVertex::Point(point) => {
                    self.vertices.push(point);
                    self.vertices.len() - 1
                },
            })
            .collect();

        let mut face = Face {
            indices,
            normal: Vector3::zeros(),
        };
        face.update_normal(&self.vertices);
        self.faces.push(face);
        Ok(self.faces.len() - 1)
    }

    /// Merge vertices that fall on the same cell of a `10^-precision` grid.
    ///
    /// The first vertex of each cell survives with its original position.
    /// Face indices are rewritten through the resulting remap, consecutive
    /// duplicate indices (zero-length edges) are collapsed, and faces left
    /// with fewer than 3 indices are dropped.
    pub fn merge_vertices(&mut self, precision: u32) {
        let scale = decimal_scale(precision);
        let key = |p: &Point3<Real>| {
            (
                (p.x * scale).round() as i64,
                (p.y * scale).round() as i64,
                (p.z * scale).round() as i64,
            )
        };

        let mut unique_by_key: HashMap<(i64, i64, i64), usize> =
            HashMap::with_capacity(self.vertices.len());
        let mut unique_vertices = Vec::with_capacity(self.vertices.len());
        let remap: Vec<usize> = self
            .vertices
            .iter()
            .map(|p| {
                *unique_by_key.entry(key(p)).or_insert_with(|| {
                    unique_vertices.push(*p);
                    unique_vertices.len() - 1
                })
            })
            .collect();

        let face_count = self.faces.len();
        self.faces.retain_mut(|face| {
            let mut indices: Vec<usize> = face.indices.iter().map(|&i| remap[i]).collect();
            indices.dedup();
            while indices.len() > 1 && indices.first() == indices.last() {
                indices.pop();
            }
            face.indices = indices;
            face.indices.len() >= 3
        });

        if face_count != self.faces.len() {
            log::debug!(
                "merge_vertices dropped {} degenerate faces",
                face_count - self.faces.len()
            );
        }
        log::trace!(
            "merge_vertices: {} -> {} vertices",
            self.vertices.len(),
            unique_vertices.len()
        );

        self.vertices = unique_vertices;
    }

    /// Apply an affine transform to every vertex in place, then recompute all
    /// face normals (normals are not preserved by non-uniform scaling).
    pub fn apply_matrix4(&mut self, matrix: &Matrix4<Real>) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
        self.update_normals();
    }

    /// Recompute the normal of every face.
    pub fn update_normals(&mut self) {
        for face in &mut self.faces {
            face.update_normal(&self.vertices);
        }
    }

    /// Replace this geometry with a deep copy of `other`. Normals are copied
    /// when usable and recomputed when missing.
    pub fn copy_from(&mut self, other: &Geometry) {
        self.vertices.clone_from(&other.vertices);
        self.faces.clone_from(&other.faces);
        self.is_manifold = other.is_manifold;
        for face in &mut self.faces {
            if face.normal == Vector3::zeros() {
                face.update_normal(&self.vertices);
            }
        }
    }

    /// Points of one face, in winding order.
    pub fn face_points(&self, face: &Face) -> Vec<Point3<Real>> {
        face.indices.iter().map(|&i| self.vertices[i]).collect()
    }

    /// Axis aligned bounds `(mins, maxs)` of all vertices, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mins, maxs), v| {
            (mins.inf(v), maxs.sup(v))
        }))
    }

    /// Compute the total surface area by fanning every face from its first vertex.
    pub fn surface_area(&self) -> Real {
        self.faces
            .iter()
            .map(|face| {
                let points = self.face_points(face);
                (1..points.len().saturating_sub(1))
                    .map(|i| {
                        (points[i] - points[0])
                            .cross(&(points[i + 1] - points[0]))
                            .norm()
                            * 0.5
                    })
                    .sum::<Real>()
            })
            .sum()
    }

    /// **Mathematical Foundation: Volume by the divergence theorem**
    ///
    /// ```text
    /// V = (1/6) * Σ p0 · (p_i × p_{i+1})
    /// ```
    /// summed over a fan of every face. The result is signed: positive for
    /// closed meshes wound counter-clockwise when seen from outside.
    pub fn volume(&self) -> Real {
        self.faces
            .iter()
            .map(|face| {
                let points = self.face_points(face);
                (1..points.len().saturating_sub(1))
                    .map(|i| {
                        points[0]
                            .coords
                            .dot(&points[i].coords.cross(&points[i + 1].coords))
                    })
                    .sum::<Real>()
            })
            .sum::<Real>()
            / 6.0
    }

    /// Test if every edge is used by exactly two faces, without touching
    /// `is_manifold`.
    pub fn is_closed(&self) -> bool {
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &self.faces {
            for (a, b) in face.edges() {
                *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        edge_count.values().all(|&count| count == 2)
    }
}

impl Transform for Geometry {
    fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        let mut geometry = self.clone();
        geometry.apply_matrix4(matrix);
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn add_face_mixes_indices_and_points() {
        let mut geometry = Geometry::new();
        geometry.vertices.push(Point3::origin());
        let face = geometry
            .add_face([
                FaceVertex::Index(0),
                Point3::new(1.0, 0.0, 0.0).into(),
                Point3::new(0.0, 1.0, 0.0).into(),
            ])
            .unwrap();

        assert_eq!(face, 0);
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.faces[0].indices, vec![0, 1, 2]);
        assert_relative_eq!(geometry.faces[0].normal, Vector3::z());
    }

    #[test]
    fn add_face_rejects_bad_indices() {
        let mut geometry = Geometry::new();
        geometry.vertices.push(Point3::origin());
        assert_eq!(
            geometry.add_face([0usize, 1, 2]),
            Err(GeometryError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            geometry.add_face([0usize, 0]),
            Err(GeometryError::TooFewVertices(2))
        );
        assert!(geometry.faces.is_empty());
    }

    #[test]
    fn newell_normal_of_quad() {
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 2.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        assert_relative_eq!(newell_normal(&quad), Vector3::x());
    }

    #[test]
    fn merge_drops_collapsed_faces() {
        let mut geometry = Geometry::new();
        geometry
            .add_face([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.00001, 0.0]])
            .unwrap();
        geometry.merge_vertices(4);
        assert!(geometry.faces.is_empty());
        assert_eq!(geometry.vertices.len(), 2);
    }
}
