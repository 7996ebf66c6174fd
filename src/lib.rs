//! **Constructive Solid Geometry (CSG)** for indexed polyhedral meshes, built
//! around Boolean operations (*union*, *intersection*, *subtraction*) on
//! polygons stored in [BSP](bsp) trees, followed by an edge-manifold repair
//! pass ([`fix_edges`]) that welds the result back into a closed mesh.
//!
//! ```no_run
//! use bimcsg::{BooleanOp, Geometry, Transform, boolean};
//!
//! let wall = Geometry::cuboid(4.0, 0.3, 2.5);
//! let opening = Geometry::cuboid(1.0, 1.0, 1.5).translate(1.5, -0.35, 0.5);
//! let result = boolean(BooleanOp::Subtraction, &wall, &opening);
//! assert!(result.is_manifold);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod boolean;
pub mod bsp;
pub mod errors;
pub mod float_types;
pub mod geometry;
pub mod repair;
pub mod traits;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use boolean::{BooleanOp, boolean, boolean_with};
pub use bsp::Bsp;
pub use errors::GeometryError;
pub use geometry::{Face, Geometry};
pub use repair::edge_map::EdgeMap;
pub use repair::{RepairOptions, fix_edges, fix_edges_with};
pub use traits::{Placed, Solid, Transform};
