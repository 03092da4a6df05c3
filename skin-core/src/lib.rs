//! CPU linear blend skinning with tolerant bone data ingestion
//!
//! This crate provides everything between raw bone documents and a deformed
//! mesh:
//! - `skin-transform` (command-line pipeline)
//! - tests and benchmarks that drive the engine directly
//!
//! # Modules
//!
//! - [`math`] - Column-major matrix and vector kernel
//! - [`types`] - Mesh, per-vertex influences and bone poses
//! - [`json`] - Dependency-free JSON-like document parser
//! - [`extract`] - Alias-tolerant extraction of weights and matrices
//! - [`skinning`] - Scalar and accelerated skinning backends
//! - [`profiler`] - Scoped stage timing
//! - [`stats`] - Timing report and bench aggregate

pub mod error;
pub mod extract;
pub mod json;
pub mod math;
pub mod profiler;
pub mod skinning;
pub mod stats;
pub mod types;

// Re-export the error model
pub use error::{ErrorKind, Location, ParseError, SchemaError, SkinError, SkinResult, ValidationError};

// Re-export the skinning engine
pub use skinning::{MeshSkinner, SKINNING_STAGE, SkinBackend};

// Re-export core data types
pub use math::{Mat4, Vec3, Vec4};
pub use types::{
    BONE_INDEX_SENTINEL, BonePoseData, BoneWeightsData, MAX_BONE_INDEX, MAX_BONES, MAX_INFLUENCES,
    Mesh, VertexBoneWeights,
};

// Re-export document ingestion
pub use extract::{parse_bone_matrices, parse_bone_pose, parse_bone_weights};

// Re-export timing
pub use profiler::{Profiler, ScopedStage, TimingSink};
pub use stats::{BenchSummary, StatsReport, TimingEntry};
