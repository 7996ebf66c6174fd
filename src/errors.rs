//! Geometry construction errors

/// Problems detected while building a [`Geometry`](crate::geometry::Geometry)
/// from externally supplied indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A face references a vertex that does not exist
    #[error("(IndexOutOfRange) Face index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// A face has fewer than the minimal 3 vertices
    #[error("(TooFewVertices) A face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}
