//! Minimal structured-data reader for bone documents
//!
//! Recursive-descent parser producing a generic [`Value`] tree. It knows
//! nothing about skinning; the [`extract`](crate::extract) module walks the
//! tree afterwards.
//!
//! Narrower than JSON: strings support only the
//! `\" \\ \/ \b \f \n \r \t` escapes (no `\u`), and numbers are any run of
//! digits, signs, `.` and exponent markers parsed as `f64`.

mod parser;


use hashbrown::HashMap;

pub use parser::parse;

/// Generic parsed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member lookup on an object; `None` for other variants
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// First member found among `keys`, checked in the order given
    pub fn get_any(&self, keys: &[&str]) -> Option<&Value> {
        let map = self.as_object()?;
        keys.iter().find_map(|key| map.get(*key))
    }

    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
