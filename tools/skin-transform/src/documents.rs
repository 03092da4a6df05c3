//! Bone weight and pose document loading

use anyhow::{Context, Result};
use skin_core::{
    BonePoseData, BoneWeightsData, Mat4, ScopedStage, TimingSink, parse_bone_matrices,
    parse_bone_weights,
};
use std::path::Path;

pub const READ_WEIGHTS_STAGE: &str = "read_weights_json";
pub const READ_INVERSE_BIND_POSE_STAGE: &str = "read_inverse_bind_pose_json";
pub const READ_NEW_POSE_STAGE: &str = "read_new_pose_json";

/// Load per-vertex bone influences
pub fn read_bone_weights<S: TimingSink + ?Sized>(
    path: &Path,
    sink: &mut S,
) -> Result<BoneWeightsData> {
    let _stage = ScopedStage::new(sink, READ_WEIGHTS_STAGE);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bone weights: {:?}", path))?;
    let weights = parse_bone_weights(&text)
        .with_context(|| format!("Invalid bone weights document: {:?}", path))?;

    tracing::debug!("Read bone weights for {} vertices", weights.len());
    Ok(weights)
}

/// Load one list of bone matrices, timed under `stage`
pub fn read_bone_matrices<S: TimingSink + ?Sized>(
    path: &Path,
    sink: &mut S,
    stage: &'static str,
) -> Result<Vec<Mat4>> {
    let _stage = ScopedStage::new(sink, stage);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bone pose: {:?}", path))?;
    let matrices = parse_bone_matrices(&text)
        .with_context(|| format!("Invalid bone pose document: {:?}", path))?;

    tracing::debug!("Read {} bone matrices from {:?}", matrices.len(), path);
    Ok(matrices)
}

/// Load the inverse bind pose and the new pose
pub fn read_bone_pose<S: TimingSink + ?Sized>(
    inverse_bind_pose: &Path,
    new_pose: &Path,
    sink: &mut S,
) -> Result<BonePoseData> {
    let inverse_bind_pose = read_bone_matrices(inverse_bind_pose, sink, READ_INVERSE_BIND_POSE_STAGE)?;
    let new_pose = read_bone_matrices(new_pose, sink, READ_NEW_POSE_STAGE)?;
    Ok(BonePoseData::new(inverse_bind_pose, new_pose))
}
