// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose normalization library.

use std::fmt;

/// Result type alias for pose operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose normalization library.
#[derive(Debug)]
pub enum PoseError {
    /// A schema candidate's path resolved but the data under it is
    /// structurally malformed (wrong item shape, non-numeric coordinate).
    SchemaError(String),
    /// A requested body-part name is absent from the topology.
    TopologyLookupError(String),
    /// A body-part name was registered twice.
    DuplicatePartError(String),
    /// Frames within one sequence have inconsistent lengths, or a point
    /// index is out of range for the sequence. Indicates an internal defect.
    ShapeMismatch(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaError(msg) => write!(f, "Schema error: {msg}"),
            Self::TopologyLookupError(msg) => write!(f, "Unknown body part: {msg}"),
            Self::DuplicatePartError(msg) => write!(f, "Duplicate body part: {msg}"),
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}
