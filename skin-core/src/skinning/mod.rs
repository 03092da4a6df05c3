//! Linear blend skinning
//!
//! Each output vertex is the weight-normalized blend of up to four
//! `skin[b] · (x, y, z, 1)` terms, where `skin[b] = new_pose[b] ·
//! inverse_bind_pose[b]` is computed once per call rather than per vertex.
//!
//! Two backends produce the same result:
//! - [`SkinBackend::Scalar`] (default): bounds-checked reference path
//! - [`SkinBackend::Accelerated`]: branchless glam SIMD path over a padded
//!   256-entry matrix table, opt-in and only when [`accelerated::is_supported`]

pub mod accelerated;
mod scalar;


use crate::error::{SkinResult, ValidationError};
use crate::profiler::{ScopedStage, TimingSink};
use crate::types::{BonePoseData, BoneWeightsData, Mesh};

/// Stage name recorded for every [`MeshSkinner::skin`] call
pub const SKINNING_STAGE: &str = "cpu_skinning";

/// Skinning implementation selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkinBackend {
    #[default]
    Scalar,
    Accelerated,
}

/// Stateless skinning engine; safe to call repeatedly
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshSkinner {
    backend: SkinBackend,
}

impl MeshSkinner {
    /// Skinner using the scalar reference path
    pub fn new() -> Self {
        Self::default()
    }

    /// Skinner using `backend` if this build supports it, scalar otherwise
    pub fn with_backend(backend: SkinBackend) -> Self {
        let backend = match backend {
            SkinBackend::Accelerated if !accelerated::is_supported() => SkinBackend::Scalar,
            other => other,
        };
        Self { backend }
    }

    /// Backend actually in use
    pub fn backend(&self) -> SkinBackend {
        self.backend
    }

    /// Deform `source` into a new mesh with the same triangles
    ///
    /// Exactly one [`SKINNING_STAGE`] sample is recorded into `sink`, whether
    /// the call succeeds or fails.
    pub fn skin<S: TimingSink + ?Sized>(
        &self,
        source: &Mesh,
        weights: &BoneWeightsData,
        poses: &BonePoseData,
        sink: &mut S,
    ) -> SkinResult<Mesh> {
        let _stage = ScopedStage::new(sink, SKINNING_STAGE);

        validate_inputs(source, weights, poses)?;

        let positions = match self.backend {
            SkinBackend::Scalar => {
                scalar::skin_positions(&source.positions, &weights.per_vertex_weights, poses)?
            }
            SkinBackend::Accelerated => {
                accelerated::skin_positions(&source.positions, &weights.per_vertex_weights, poses)?
            }
        };
        Ok(source.with_positions(positions))
    }
}

fn validate_inputs(
    source: &Mesh,
    weights: &BoneWeightsData,
    poses: &BonePoseData,
) -> Result<(), ValidationError> {
    if source.vertex_count() != weights.len() {
        return Err(ValidationError::VertexCountMismatch {
            mesh: source.vertex_count(),
            weights: weights.len(),
        });
    }
    poses.validate()?;
    Ok(())
}
