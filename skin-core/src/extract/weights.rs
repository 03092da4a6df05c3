//! Bone weight extraction
//!
//! A vertex record comes in one of two shapes:
//!
//! ```text
//! { "bone_indices": [0, 3], "weights": [0.75, 0.25] }
//! { "influences": [ { "bone_index": 0, "weight": 0.75 }, { "joint": 3, "value": 0.25 } ] }
//! ```
//!
//! The parallel-list shape wins when both are present. Only the first
//! [`MAX_INFLUENCES`] entries are kept, but every entry is type-checked.

use super::{
    BONE_INDEX_LIST_KEYS, INFLUENCE_INDEX_KEYS, INFLUENCE_LIST_KEYS, INFLUENCE_WEIGHT_KEYS,
    VERTEX_LIST_KEYS, WEIGHT_LIST_KEYS, expect_array, narrow_bone_index, narrow_f32, root_list,
};
use crate::error::{Location, SchemaError, SkinResult};
use crate::json::{self, Value};
use crate::types::{BoneWeightsData, MAX_INFLUENCES, VertexBoneWeights};

/// Every key that identifies a vertex record, for "nothing recognised" errors
const VERTEX_RECORD_KEYS: &[&str] = &[
    "bone_indices",
    "boneIndices",
    "indices",
    "joints",
    "index",
    "influences",
    "bones",
    "bone_influences",
];

/// Parse a bone weights document
pub fn parse_bone_weights(text: &str) -> SkinResult<BoneWeightsData> {
    let root = json::parse(text)?;
    Ok(bone_weights_from_value(&root)?)
}

/// Extract per-vertex bone weights from a parsed document
pub fn bone_weights_from_value(root: &Value) -> Result<BoneWeightsData, SchemaError> {
    let records = root_list(root, VERTEX_LIST_KEYS)?;
    let per_vertex_weights = records
        .iter()
        .enumerate()
        .map(|(vertex, record)| vertex_record(record, vertex))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BoneWeightsData::new(per_vertex_weights))
}

fn vertex_record(record: &Value, vertex: usize) -> Result<VertexBoneWeights, SchemaError> {
    if record.as_object().is_none() {
        return Err(SchemaError::WrongType {
            at: Location::Vertex(vertex),
            expected: "object",
            found: record.type_name(),
        });
    }

    let indices = record.get_any(BONE_INDEX_LIST_KEYS);
    let weights = record.get_any(WEIGHT_LIST_KEYS);
    if let (Some(indices), Some(weights)) = (indices, weights) {
        return parallel_lists(indices, weights, vertex);
    }

    if let Some(influences) = record.get_any(INFLUENCE_LIST_KEYS) {
        return influence_list(influences, vertex);
    }

    let expected = match (indices, weights) {
        (Some(_), None) => WEIGHT_LIST_KEYS,
        (None, Some(_)) => BONE_INDEX_LIST_KEYS,
        _ => VERTEX_RECORD_KEYS,
    };
    Err(SchemaError::MissingKey {
        at: Location::Vertex(vertex),
        expected,
    })
}

fn parallel_lists(
    indices: &Value,
    weights: &Value,
    vertex: usize,
) -> Result<VertexBoneWeights, SchemaError> {
    let indices = expect_array(indices, Location::Vertex(vertex))?;
    let weights = expect_array(weights, Location::Vertex(vertex))?;

    let mut out = VertexBoneWeights::default();
    for (slot, value) in indices.iter().enumerate() {
        let bone = narrow_bone_index(value, Location::Influence { vertex, slot })?;
        if slot < MAX_INFLUENCES {
            out.bone_indices[slot] = bone;
        }
    }
    for (slot, value) in weights.iter().enumerate() {
        let weight = narrow_f32(value, Location::Influence { vertex, slot })?;
        if slot < MAX_INFLUENCES {
            out.weights[slot] = weight;
        }
    }
    Ok(out)
}

fn influence_list(influences: &Value, vertex: usize) -> Result<VertexBoneWeights, SchemaError> {
    let entries = expect_array(influences, Location::Vertex(vertex))?;

    let mut out = VertexBoneWeights::default();
    for (slot, entry) in entries.iter().enumerate() {
        let at = Location::Influence { vertex, slot };
        if entry.as_object().is_none() {
            return Err(SchemaError::WrongType {
                at,
                expected: "object",
                found: entry.type_name(),
            });
        }

        let index = entry
            .get_any(INFLUENCE_INDEX_KEYS)
            .ok_or_else(|| SchemaError::MissingKey {
                at: at.clone(),
                expected: INFLUENCE_INDEX_KEYS,
            })?;
        let weight = entry
            .get_any(INFLUENCE_WEIGHT_KEYS)
            .ok_or_else(|| SchemaError::MissingKey {
                at: at.clone(),
                expected: INFLUENCE_WEIGHT_KEYS,
            })?;

        let bone = narrow_bone_index(index, at.clone())?;
        let weight = narrow_f32(weight, at)?;
        if slot < MAX_INFLUENCES {
            out.bone_indices[slot] = bone;
            out.weights[slot] = weight;
        }
    }
    Ok(out)
}
