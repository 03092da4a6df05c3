//! Branchless SIMD skinning path
//!
//! Skin matrices live in a fixed 256-entry table indexed by the bone index
//! reinterpreted as `u8`. Every slot past the skeleton holds identity, so the
//! sentinel (-1, i.e. slot 255) needs no branch: its weight is masked to zero
//! and the lookup can never go out of bounds. The transform and accumulate
//! run on `glam::Vec4`/`glam::Mat4`, which use SSE2, NEON or wasm SIMD when
//! the target has them.
//!
//! Preconditions, both validated once before the blend loop: the skeleton
//! has at most [`MAX_BONES`] bones, and every active influence names a bone
//! the skeleton has. The loop itself carries no per-slot bounds checks.

use crate::error::ValidationError;
use crate::math::{Vec3, Vec4, divide_by_w};
use crate::types::{BonePoseData, MAX_BONES, MAX_INFLUENCES, VertexBoneWeights};

/// Matrix table size: one slot per `u8` value
pub const TABLE_SIZE: usize = 256;

/// Whether glam was compiled with a SIMD backend for this target
pub fn is_supported() -> bool {
    cfg!(any(
        target_feature = "sse2",
        target_feature = "simd128",
        all(target_arch = "aarch64", target_feature = "neon"),
    ))
}

/// Skin all positions; inputs must already be length-checked
pub fn skin_positions(
    positions: &[Vec3],
    weights: &[VertexBoneWeights],
    poses: &BonePoseData,
) -> Result<Vec<Vec3>, ValidationError> {
    let table = build_table(poses)?;
    check_active_bones(weights, poses.new_pose.len())?;
    Ok(positions
        .iter()
        .zip(weights)
        .map(|(&position, influences)| skin_vertex(position, influences, &table))
        .collect())
}

fn build_table(poses: &BonePoseData) -> Result<Box<[glam::Mat4; TABLE_SIZE]>, ValidationError> {
    let bones = poses.new_pose.len();
    if bones > MAX_BONES {
        return Err(ValidationError::TooManyBones {
            bones,
            max: MAX_BONES,
        });
    }

    let mut table = Box::new([glam::Mat4::IDENTITY; TABLE_SIZE]);
    for (slot, (pose, inverse_bind)) in table
        .iter_mut()
        .zip(poses.new_pose.iter().zip(&poses.inverse_bind_pose))
    {
        *slot = pose.to_glam() * inverse_bind.to_glam();
    }
    Ok(table)
}

/// First active influence past the skeleton, reported like the scalar path
fn check_active_bones(
    weights: &[VertexBoneWeights],
    bone_count: usize,
) -> Result<(), ValidationError> {
    for (vertex, influences) in weights.iter().enumerate() {
        if let Some((bone, _)) = influences
            .active()
            .find(|&(bone, _)| bone as usize >= bone_count)
        {
            return Err(ValidationError::BoneIndexOutOfRange {
                vertex,
                bone,
                bone_count,
            });
        }
    }
    Ok(())
}

#[inline]
fn skin_vertex(
    position: Vec3,
    influences: &VertexBoneWeights,
    table: &[glam::Mat4; TABLE_SIZE],
) -> Vec3 {
    let point = glam::Vec4::new(position.x, position.y, position.z, 1.0);
    let mut blended = glam::Vec4::ZERO;
    let mut total_weight = 0.0f32;

    for slot in 0..MAX_INFLUENCES {
        let bone = influences.bone_indices[slot];
        let matrix = &table[usize::from(bone as u8)];
        let weight = if bone < 0 {
            0.0
        } else {
            influences.weights[slot].max(0.0)
        };
        blended += (*matrix * point) * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return position;
    }
    divide_by_w(Vec4::from_glam(blended * total_weight.recip()))
}
