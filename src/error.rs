//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Joint '{0}' not found in model")]
    UnknownJoint(String),

    #[error("Singular stiffness matrix - {0}")]
    SingularSystem(String),

    #[error("Element '{0}' not found in model")]
    UnknownElement(String),

    #[error("Load '{0}' not found in model")]
    UnknownLoad(String),

    #[error("Duplicate id '{0}' already exists")]
    DuplicateId(String),

    #[error("Joint '{joint}' is still referenced by {referenced_by}")]
    JointInUse { joint: String, referenced_by: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FrameError {
    /// Stable tag for the failure class, used at the HTTP / WASM boundary
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DegenerateGeometry(_) => "degenerate_geometry",
            Self::UnknownJoint(_) => "unknown_joint",
            Self::SingularSystem(_) => "singular_system",
            Self::UnknownElement(_) => "unknown_element",
            Self::UnknownLoad(_) => "unknown_load",
            Self::DuplicateId(_) => "duplicate_id",
            Self::JointInUse { .. } => "joint_in_use",
            Self::InvalidInput(_) => "invalid_input",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;
