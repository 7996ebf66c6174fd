use crate::float_types::Real;
use crate::geometry::Geometry;
use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};

/// Anything that can take part in a boolean operation: a [`Geometry`] plus
/// the transform placing it in world space.
pub trait Solid {
    fn geometry(&self) -> &Geometry;

    /// Local-to-world transform. Defaults to identity.
    fn world_matrix(&self) -> Matrix4<Real> {
        Matrix4::identity()
    }
}

impl Solid for Geometry {
    fn geometry(&self) -> &Geometry {
        self
    }
}

impl<T: Solid + ?Sized> Solid for &T {
    fn geometry(&self) -> &Geometry {
        (**self).geometry()
    }

    fn world_matrix(&self) -> Matrix4<Real> {
        (**self).world_matrix()
    }
}

/// A geometry in local coordinates together with its world transform, as
/// produced by scene-graph objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub geometry: Geometry,
    pub matrix: Matrix4<Real>,
}

impl Placed {
    pub const fn new(geometry: Geometry, matrix: Matrix4<Real>) -> Self {
        Placed { geometry, matrix }
    }
}

impl Solid for Placed {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn world_matrix(&self) -> Matrix4<Real> {
        self.matrix
    }
}

/// Affine transformations returning new values.
pub trait Transform: Sized {
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Rotates by x_degrees, y_degrees, z_degrees
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        // Compose them in the desired order
        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }
}
