// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Signed-distance band inside which a vertex counts as lying on a BSP plane.
pub const PLANE_EPSILON: Real = 1e-5;

/// Decimal digits kept when quantizing vertices for identity (`10^-4` grid).
pub const MERGE_PRECISION: u32 = 4;

/// Decimal digits kept when quantizing edge directions for the repair heuristic.
pub const VECTOR_PRECISION: u32 = 3;

/// Colinearity tolerance of the first face-breaking pass.
pub const SEGMENT_DISTANCE: Real = 1e-6;

/// Colinearity tolerance of the second, coarser face-breaking pass.
pub const COARSE_SEGMENT_DISTANCE: Real = 0.01;

/// Hard cap on the number of face splits a single repair may perform.
pub const MAX_SPLIT_STEPS: usize = 100_000;

/// The second pass only runs while bad edges stay below this share of the faces.
pub const SECOND_PASS_BAD_EDGE_RATIO: Real = 0.1;

/// The second pass only runs on meshes with at least this many faces.
pub const SECOND_PASS_MIN_FACES: usize = 12;

/// Solids with fewer faces are returned untouched by boolean operations.
pub const MIN_SOLID_FACES: usize = 4;

/// Crease angle used when deriving wireframe edges.
pub const DEFAULT_EDGE_ANGLE_DEGREES: Real = 5.0;

/// Lazily-initialized plane epsilon used by the BSP tree.
/// Defaults to [`PLANE_EPSILON`], but can be overridden:
///  1) **Build-time**: set env var `BIMCSG_PLANE_EPSILON` (e.g. `BIMCSG_PLANE_EPSILON=1e-6 cargo build`)
///  2) **Runtime**: call [`set_plane_epsilon`] once before using the library
static PLANE_EPSILON_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current plane epsilon.
pub fn plane_epsilon() -> Real {
    *PLANE_EPSILON_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("BIMCSG_PLANE_EPSILON") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        PLANE_EPSILON
    })
}

/// Set the plane epsilon programmatically once (subsequent calls are ignored).
/// Call near program start: `bimcsg::float_types::set_plane_epsilon(1e-6);`
pub fn set_plane_epsilon(value: Real) {
    let _ = PLANE_EPSILON_CELL.set(value.max(Real::EPSILON));
}

/// Scale factor `10^digits` used by the quantizing keys.
#[inline]
pub fn decimal_scale(digits: u32) -> Real {
    (10.0 as Real).powi(digits as i32)
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;
