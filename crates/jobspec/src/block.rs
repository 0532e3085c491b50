//! Block representations of configuration trees.
//!
//! [`ConfigBlock`] mirrors the raw shape of one parsed input file with no
//! grammar applied; it exists only as the input to structure building.
//! [`TemplateBlock`] is the canonical unit the rest of the system operates on:
//! every node carries a [`BlockType`] from the fixed job-specification grammar.

use crate::grammar::BlockType;
use crate::value::Value;

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;

/// One block of a parsed input file, before grammar filtering.
///
/// Derived mechanically from a [`Value`] mapping: a key whose value is a
/// mapping becomes one child; a key whose value is a sequence of mappings
/// becomes one child per element, all sharing the key as their name; any other
/// value becomes a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBlock {
    pub name: String,
    pub parameters: Vec<(String, Value)>,
    pub children: Vec<ConfigBlock>,
}

impl ConfigBlock {
    /// Build a [`ConfigBlock`] named `name` from a mapping value.
    ///
    /// Non-mapping values produce a block with a single parameter under
    /// `name`, which keeps malformed-but-parseable input flowing into
    /// structure building (where it is filtered) instead of failing here.
    pub fn from_value(name: &str, value: &Value) -> ConfigBlock {
        let mut block = ConfigBlock {
            name: name.to_string(),
            parameters: Vec::new(),
            children: Vec::new(),
        };

        let map = match value {
            Value::Map(map) => map,
            other => {
                block.parameters.push((name.to_string(), other.clone()));
                return block;
            }
        };

        for (key, entry) in map {
            match entry {
                Value::Map(_) => block.children.push(ConfigBlock::from_value(key, entry)),
                Value::List(items) if !items.is_empty() && items.iter().all(Value::is_map) => {
                    for item in items {
                        block.children.push(ConfigBlock::from_value(key, item));
                    }
                }
                other => block.parameters.push((key.clone(), other.clone())),
            }
        }

        block
    }

    /// All children sharing `name`, in input order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigBlock> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// The first parameter stored under `key`.
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// A canonical job-specification block.
///
/// Invariants: `block_type` is a member of the fixed grammar; the children's
/// block types are a subset of the grammar's declared children for
/// `block_type`; parameter keys are unique within one block; child order is
/// the structure-build order, with overlay-only nodes appended at the end by
/// the changes pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBlock {
    pub block_type: BlockType,
    pub label: Option<String>,
    pub parameters: Vec<(String, Value)>,
    pub children: Vec<TemplateBlock>,
}

impl TemplateBlock {
    /// An empty block of the given type.
    pub fn new(block_type: BlockType) -> TemplateBlock {
        TemplateBlock {
            block_type,
            label: None,
            parameters: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether the block carries no parameters and no children.
    ///
    /// Empty blocks are dropped rather than attached, uniformly at every
    /// level of structure building.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.children.is_empty()
    }

    /// The value of the parameter stored under `key`.
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Overwrite the parameter under `key`, or append it when absent.
    pub fn set_parameter(&mut self, key: &str, value: Value) {
        match self.parameters.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value,
            None => self.parameters.push((key.to_string(), value)),
        }
    }

    /// The first child of the given type.
    pub fn child_of(&self, block_type: BlockType) -> Option<&TemplateBlock> {
        self.children
            .iter()
            .find(|child| child.block_type == block_type)
    }

    /// All children of the given type, in order.
    pub fn children_of(&self, block_type: BlockType) -> impl Iterator<Item = &TemplateBlock> {
        self.children
            .iter()
            .filter(move |child| child.block_type == block_type)
    }
}
