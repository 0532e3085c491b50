//! Generic configuration values.
//!
//! Input files are parsed into [`Value`] trees before any job-specification
//! structure is recognized. The type is a closed tagged union so that merge and
//! coercion behavior stays testable independent of the serialization library.

use indexmap::IndexMap;

use crate::errors::ValueError;

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;

/// A loosely-typed configuration value.
///
/// Mappings preserve the order in which keys appeared in the input file; that
/// order flows through structure building and rendering unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Convert a parsed YAML node into a [`Value`].
    ///
    /// Null and tagged nodes have no counterpart in the job-specification data
    /// model and are rejected, as are mappings with non-string keys.
    pub fn from_yaml(node: &serde_yaml::Value) -> Result<Self, ValueError> {
        match node {
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(ValueError::UnsupportedValue {
                        kind: "number".to_string(),
                    })
                }
            }
            serde_yaml::Value::Sequence(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(Value::from_yaml(item)?);
                }
                Ok(Value::List(list))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = IndexMap::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = key
                        .as_str()
                        .ok_or_else(|| ValueError::NonStringKey {
                            key: format!("{key:?}"),
                        })?
                        .to_string();
                    map.insert(key, Value::from_yaml(value)?);
                }
                Ok(Value::Map(map))
            }
            serde_yaml::Value::Null => Err(ValueError::UnsupportedValue {
                kind: "null".to_string(),
            }),
            serde_yaml::Value::Tagged(tagged) => Err(ValueError::UnsupportedValue {
                kind: format!("tagged node {}", tagged.tag),
            }),
        }
    }

    /// The string content, when this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether this value is a mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }
}
