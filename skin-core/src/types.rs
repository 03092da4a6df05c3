//! Skinning data model

use crate::error::ValidationError;
use crate::math::{Mat4, Vec3};

/// Maximum bone influences per vertex
pub const MAX_INFLUENCES: usize = 4;

/// Bone index marking an unused influence slot
pub const BONE_INDEX_SENTINEL: i8 = -1;

/// Highest bone index representable in a weight slot
///
/// Bone indices are stored as `i8` with -1 reserved as the sentinel, which
/// caps a skeleton at 128 addressable bones (0..=127).
pub const MAX_BONE_INDEX: i8 = i8::MAX;

/// Number of bone ids a weight slot can address
pub const MAX_BONES: usize = MAX_BONE_INDEX as usize + 1;

/// Up to four (bone, weight) influences for one vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexBoneWeights {
    pub bone_indices: [i8; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl Default for VertexBoneWeights {
    fn default() -> Self {
        Self {
            bone_indices: [BONE_INDEX_SENTINEL; MAX_INFLUENCES],
            weights: [0.0; MAX_INFLUENCES],
        }
    }
}

impl VertexBoneWeights {
    /// Build from up to four `(bone, weight)` pairs; extra pairs are dropped
    pub fn from_influences(influences: &[(i8, f32)]) -> Self {
        let mut out = Self::default();
        for (slot, &(bone, weight)) in influences.iter().take(MAX_INFLUENCES).enumerate() {
            out.bone_indices[slot] = bone;
            out.weights[slot] = weight;
        }
        out
    }

    /// Iterate over slots that contribute to the blend
    pub fn active(&self) -> impl Iterator<Item = (i8, f32)> + '_ {
        self.bone_indices
            .iter()
            .zip(self.weights.iter())
            .filter(|&(&bone, &weight)| bone >= 0 && weight > 0.0)
            .map(|(&bone, &weight)| (bone, weight))
    }
}

/// Triangle mesh: positions plus 0-based index triples
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Build a mesh, checking that every triangle references a real vertex
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, ValidationError> {
        let vertex_count = positions.len();
        for (triangle, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ValidationError::TriangleIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            positions,
            triangles,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Same topology with the positions replaced
    pub(crate) fn with_positions(&self, positions: Vec<Vec3>) -> Self {
        debug_assert_eq!(positions.len(), self.positions.len());
        Self {
            positions,
            triangles: self.triangles.clone(),
        }
    }
}

/// Per-vertex bone influences, one entry per mesh vertex
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoneWeightsData {
    pub per_vertex_weights: Vec<VertexBoneWeights>,
}

impl BoneWeightsData {
    pub fn new(per_vertex_weights: Vec<VertexBoneWeights>) -> Self {
        Self { per_vertex_weights }
    }

    pub fn len(&self) -> usize {
        self.per_vertex_weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_vertex_weights.is_empty()
    }
}

/// Bind and target pose per bone; the list index is the bone id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonePoseData {
    pub inverse_bind_pose: Vec<Mat4>,
    pub new_pose: Vec<Mat4>,
}

impl BonePoseData {
    pub fn new(inverse_bind_pose: Vec<Mat4>, new_pose: Vec<Mat4>) -> Self {
        Self {
            inverse_bind_pose,
            new_pose,
        }
    }

    /// Check that both pose lists describe the same skeleton
    pub fn validate(&self) -> Result<usize, ValidationError> {
        if self.inverse_bind_pose.len() != self.new_pose.len() {
            return Err(ValidationError::BoneCountMismatch {
                inverse_bind: self.inverse_bind_pose.len(),
                new_pose: self.new_pose.len(),
            });
        }
        Ok(self.new_pose.len())
    }

    /// `new_pose[b] · inverse_bind_pose[b]` for every bone
    ///
    /// Callers must [`validate`](Self::validate) first; unpaired bones are
    /// dropped by the zip.
    pub fn skin_matrices(&self) -> Vec<Mat4> {
        self.new_pose
            .iter()
            .zip(self.inverse_bind_pose.iter())
            .map(|(pose, inverse_bind)| pose.mul_mat4(inverse_bind))
            .collect()
    }
}
