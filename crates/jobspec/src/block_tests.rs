//! Tests for block construction from generic values.

use super::*;
use crate::value::Value;

fn config_from_yaml(text: &str) -> ConfigBlock {
    let node: serde_yaml::Value = serde_yaml::from_str(text).unwrap();
    let value = Value::from_yaml(&node).unwrap();
    ConfigBlock::from_value("job", &value)
}

#[test]
fn scalar_entries_become_parameters() {
    let block = config_from_yaml("name: example\ncount: 3\nenabled: true");
    assert_eq!(block.parameters.len(), 3);
    assert_eq!(
        block.parameter("name"),
        Some(&Value::String("example".to_string()))
    );
    assert_eq!(block.parameter("count"), Some(&Value::Int(3)));
    assert!(block.children.is_empty());
}

#[test]
fn mapping_entries_become_single_children() {
    let block = config_from_yaml("update:\n  max_parallel: 1");
    assert_eq!(block.children.len(), 1);
    assert_eq!(block.children[0].name, "update");
    assert_eq!(block.children[0].parameter("max_parallel"), Some(&Value::Int(1)));
}

#[test]
fn sequences_of_mappings_become_sibling_children_sharing_the_key() {
    let block = config_from_yaml("group:\n  - name: web\n  - name: api");
    let groups: Vec<&ConfigBlock> = block.children_named("group").collect();
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].parameter("name"),
        Some(&Value::String("web".to_string()))
    );
    assert_eq!(
        groups[1].parameter("name"),
        Some(&Value::String("api".to_string()))
    );
}

#[test]
fn scalar_sequences_stay_parameters() {
    let block = config_from_yaml("datacenters: [dc1, dc2]");
    assert!(block.children.is_empty());
    assert!(matches!(block.parameter("datacenters"), Some(Value::List(_))));
}

#[test]
fn template_block_set_parameter_overwrites_or_appends() {
    let mut block = TemplateBlock::new(BlockType::Task);
    block.set_parameter("cpu", Value::Int(100));
    block.set_parameter("cpu", Value::Int(200));
    block.set_parameter("memory", Value::Int(256));

    assert_eq!(block.parameters.len(), 2);
    assert_eq!(block.parameter("cpu"), Some(&Value::Int(200)));
    assert_eq!(block.parameter("memory"), Some(&Value::Int(256)));
}

#[test]
fn template_block_emptiness_ignores_the_label() {
    let mut block = TemplateBlock::new(BlockType::Group);
    block.label = Some("web".to_string());
    assert!(block.is_empty());

    block.set_parameter("count", Value::Int(1));
    assert!(!block.is_empty());
}
