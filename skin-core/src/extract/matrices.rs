//! Bone matrix extraction
//!
//! Used for both the inverse bind pose and the new pose documents; the two
//! differ only in meaning, not in shape.

use super::{BONE_LIST_KEYS, MATRIX_KEYS, expect_array, narrow_f32, root_list};
use crate::error::{Location, SchemaError, SkinResult};
use crate::json::{self, Value};
use crate::math::Mat4;
use crate::types::BonePoseData;

/// Parse a bone matrix document
pub fn parse_bone_matrices(text: &str) -> SkinResult<Vec<Mat4>> {
    let root = json::parse(text)?;
    Ok(bone_matrices_from_value(&root)?)
}

/// Parse the inverse bind pose and new pose documents into one pose set
///
/// Bone counts are not compared here; the skinning engine validates that.
pub fn parse_bone_pose(inverse_bind_pose: &str, new_pose: &str) -> SkinResult<BonePoseData> {
    Ok(BonePoseData::new(
        parse_bone_matrices(inverse_bind_pose)?,
        parse_bone_matrices(new_pose)?,
    ))
}

/// Extract column-major bone matrices from a parsed document
pub fn bone_matrices_from_value(root: &Value) -> Result<Vec<Mat4>, SchemaError> {
    root_list(root, BONE_LIST_KEYS)?
        .iter()
        .enumerate()
        .map(|(bone, entry)| bone_matrix(entry, bone))
        .collect()
}

fn bone_matrix(entry: &Value, bone: usize) -> Result<Mat4, SchemaError> {
    let values = match entry {
        Value::Array(values) => values.as_slice(),
        Value::Object(_) => {
            let matrix = entry
                .get_any(MATRIX_KEYS)
                .ok_or(SchemaError::MissingKey {
                    at: Location::Bone(bone),
                    expected: MATRIX_KEYS,
                })?;
            expect_array(matrix, Location::Bone(bone))?
        }
        other => {
            return Err(SchemaError::WrongType {
                at: Location::Bone(bone),
                expected: "array or object",
                found: other.type_name(),
            });
        }
    };

    if values.len() != 16 {
        return Err(SchemaError::MatrixLength {
            at: Location::Bone(bone),
            found: values.len(),
        });
    }

    let mut m = [0.0f32; 16];
    for (dst, value) in m.iter_mut().zip(values) {
        *dst = narrow_f32(value, Location::Bone(bone))?;
    }
    Ok(Mat4::from_cols_array(m))
}
