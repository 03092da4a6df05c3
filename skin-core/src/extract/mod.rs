//! Domain extractors: generic [`Value`] trees -> strict skinning inputs
//!
//! Authoring tools disagree on key names for the same data, so every field
//! is looked up through a list of aliases. The alias lists are public so
//! tooling can report what is accepted.

mod matrices;
mod weights;


pub use matrices::{bone_matrices_from_value, parse_bone_matrices, parse_bone_pose};
pub use weights::{bone_weights_from_value, parse_bone_weights};

use crate::error::{Location, SchemaError};
use crate::json::Value;

/// Root keys that may hold the vertex record list
pub const VERTEX_LIST_KEYS: &[&str] = &["vertices", "vertex_weights", "weights", "skin"];
/// Per-vertex keys for the parallel bone index list
pub const BONE_INDEX_LIST_KEYS: &[&str] =
    &["bone_indices", "boneIndices", "indices", "joints", "index"];
/// Per-vertex keys for the parallel weight list
pub const WEIGHT_LIST_KEYS: &[&str] = &["weights", "bone_weights", "boneWeights", "weight"];
/// Per-vertex keys for a list of influence objects
pub const INFLUENCE_LIST_KEYS: &[&str] = &["influences", "bones", "bone_influences"];
/// Bone index key inside an influence object
pub const INFLUENCE_INDEX_KEYS: &[&str] = &["bone_index", "boneIndex", "index", "joint"];
/// Weight key inside an influence object
pub const INFLUENCE_WEIGHT_KEYS: &[&str] = &["weight", "value"];
/// Root key that may hold the bone list
pub const BONE_LIST_KEYS: &[&str] = &["bones"];
/// Bone entry key holding the matrix
pub const MATRIX_KEYS: &[&str] = &["matrix"];

/// Resolve a root that is either a bare list or an object holding one
fn root_list<'v>(root: &'v Value, keys: &'static [&'static str]) -> Result<&'v [Value], SchemaError> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(_) => {
            let list = root.get_any(keys).ok_or(SchemaError::MissingKey {
                at: Location::Root,
                expected: keys,
            })?;
            expect_array(list, Location::Root)
        }
        other => Err(SchemaError::WrongType {
            at: Location::Root,
            expected: "array or object",
            found: other.type_name(),
        }),
    }
}

fn expect_array(value: &Value, at: Location) -> Result<&[Value], SchemaError> {
    value.as_array().ok_or(SchemaError::WrongType {
        at,
        expected: "array",
        found: value.type_name(),
    })
}

fn expect_finite(value: &Value, at: Location) -> Result<f64, SchemaError> {
    let number = value.as_f64().ok_or_else(|| SchemaError::WrongType {
        at: at.clone(),
        expected: "number",
        found: value.type_name(),
    })?;
    if !number.is_finite() {
        return Err(SchemaError::NonFiniteNumber { at, value: number });
    }
    Ok(number)
}

/// Narrow a parsed number to `f32`; values that overflow `f32` are rejected
fn narrow_f32(value: &Value, at: Location) -> Result<f32, SchemaError> {
    let number = expect_finite(value, at.clone())?;
    let narrowed = number as f32;
    if !narrowed.is_finite() {
        return Err(SchemaError::NonFiniteNumber { at, value: number });
    }
    Ok(narrowed)
}

/// Narrow a parsed number to an `i8` bone index, truncating toward zero
///
/// Values outside the `i8` range are rejected rather than wrapped.
fn narrow_bone_index(value: &Value, at: Location) -> Result<i8, SchemaError> {
    let number = expect_finite(value, at.clone())?.trunc();
    if number < f64::from(i8::MIN) || number > f64::from(i8::MAX) {
        return Err(SchemaError::IndexOutOfRange { at, value: number });
    }
    Ok(number as i8)
}
