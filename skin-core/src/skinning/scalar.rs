//! Bounds-checked scalar skinning (reference path)

use crate::error::ValidationError;
use crate::math::{Mat4, Vec3, Vec4, divide_by_w};
use crate::types::{BonePoseData, VertexBoneWeights};

pub(super) fn skin_positions(
    positions: &[Vec3],
    weights: &[VertexBoneWeights],
    poses: &BonePoseData,
) -> Result<Vec<Vec3>, ValidationError> {
    let skin_matrices = poses.skin_matrices();

    positions
        .iter()
        .zip(weights)
        .enumerate()
        .map(|(vertex, (&position, influences))| {
            skin_vertex(position, influences, &skin_matrices, vertex)
        })
        .collect()
}

/// Blend one vertex; vertices without an active influence keep their position
pub(super) fn skin_vertex(
    position: Vec3,
    influences: &VertexBoneWeights,
    skin_matrices: &[Mat4],
    vertex: usize,
) -> Result<Vec3, ValidationError> {
    let point = Vec4::point(position);
    let mut blended = Vec4::ZERO;
    let mut total_weight = 0.0f32;

    for (bone, weight) in influences.active() {
        let matrix = skin_matrices.get(bone as usize).ok_or(
            ValidationError::BoneIndexOutOfRange {
                vertex,
                bone,
                bone_count: skin_matrices.len(),
            },
        )?;
        blended += matrix.mul_vec4(point) * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return Ok(position);
    }

    // Upstream weights are not trusted to sum to exactly 1
    Ok(divide_by_w(blended * total_weight.recip()))
}
