//! Structure building: projecting parsed input onto the job-specification
//! grammar.
//!
//! The builder consumes one [`ConfigBlock`] tree per input file and produces a
//! canonical [`TemplateBlock`] tree. Only children declared in the grammar for
//! the current block type are recursed into; everything else is dropped. The
//! builder is a pure function of its inputs and never fails on missing
//! optional blocks: empty results are simply not attached to the parent.

use tracing::debug;

use crate::block::{ConfigBlock, TemplateBlock};
use crate::grammar::{BlockType, MergePolicy};
use crate::value::Value;

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;

/// Build the canonical block for `block_type` from one input block.
///
/// The root call for an input file is made at [`BlockType::Job`]. Block types
/// with bespoke projection (network, connect, and the composed service and
/// sidecar shapes) are dispatched to dedicated builders; everything else goes
/// through the generic grammar-driven projection.
pub fn build(input: &ConfigBlock, block_type: BlockType) -> TemplateBlock {
    match block_type {
        BlockType::Network => build_network(input),
        BlockType::Connect => build_connect(input),
        BlockType::Resources => build_resources(input),
        BlockType::Service => build_service(input),
        BlockType::Check => build_check(input),
        BlockType::SidecarService => build_sidecar_service(input),
        BlockType::SidecarTask => build_sidecar_task(input),
        other => build_generic(input, other),
    }
}

/// Grammar-driven projection: own parameters, then declared children in
/// grammar order.
fn build_generic(input: &ConfigBlock, block_type: BlockType) -> TemplateBlock {
    let mut block = own_parameters(input, block_type);
    for &child_type in block_type.children() {
        attach(&mut block, input, child_type);
    }

    let dropped: Vec<&str> = input
        .children
        .iter()
        .map(|child| child.name.as_str())
        .filter(|name| {
            block_type
                .children()
                .iter()
                .all(|child_type| child_type.as_str() != *name)
        })
        .collect();
    if !dropped.is_empty() {
        debug!(block = %block_type, dropped = ?dropped, "dropped unrecognized child blocks");
    }

    block
}

/// Copy the input's scalar and list parameters into a fresh block.
///
/// Labeled block types lift the `name` parameter into the block label instead
/// of keeping it as a parameter. Unknown keys become parameters; no grammar
/// exists below scalars.
fn own_parameters(input: &ConfigBlock, block_type: BlockType) -> TemplateBlock {
    let mut block = TemplateBlock::new(block_type);
    for (key, value) in &input.parameters {
        if block_type.is_labeled() && key == "name" {
            if let Some(name) = value.as_str() {
                block.label = Some(name.to_string());
                continue;
            }
        }
        block.parameters.push((key.clone(), value.clone()));
    }
    block
}

/// Build and attach the input's children of `child_type`.
///
/// Singleton types take the first matching input child; duplicate kinds take
/// every child sharing the type name. Built children with no parameters and
/// no children are dropped rather than attached as empty placeholders. The
/// emptiness check is always made on the built node, never the input node.
fn attach(parent: &mut TemplateBlock, input: &ConfigBlock, child_type: BlockType) {
    let name = child_type.as_str();
    match child_type.merge_policy() {
        MergePolicy::Singleton => {
            if let Some(child) = input.children_named(name).next() {
                attach_if_populated(parent, build(child, child_type));
            }
        }
        MergePolicy::NamedDuplicate | MergePolicy::UnnamedDuplicate { .. } => {
            for child in input.children_named(name) {
                attach_if_populated(parent, build(child, child_type));
            }
        }
    }
}

fn attach_if_populated(parent: &mut TemplateBlock, block: TemplateBlock) {
    if !block.is_empty() {
        parent.children.push(block);
    }
}

/// `network` synthesizes its two scalar parameters from differently-named
/// input keys (`type` and `host`), then recurses into its declared subtypes.
fn build_network(input: &ConfigBlock) -> TemplateBlock {
    let mut block = TemplateBlock::new(BlockType::Network);
    if let Some(mode) = input.parameter("type") {
        block.parameters.push(("mode".to_string(), mode.clone()));
    }
    if let Some(hostname) = input.parameter("host") {
        block
            .parameters
            .push(("hostname".to_string(), hostname.clone()));
    }
    attach(&mut block, input, BlockType::Dns);
    attach(&mut block, input, BlockType::Port);
    block
}

/// `connect` short-circuits to the minimal default-sidecar shape when the
/// input carries `sidecar_service: true`; the empty sidecar child is attached
/// deliberately, bypassing the populated check.
fn build_connect(input: &ConfigBlock) -> TemplateBlock {
    if let Some(Value::Bool(true)) = input.parameter("sidecar_service") {
        let mut block = TemplateBlock::new(BlockType::Connect);
        block
            .children
            .push(TemplateBlock::new(BlockType::SidecarService));
        return block;
    }

    let mut block = own_parameters(input, BlockType::Connect);
    attach(&mut block, input, BlockType::SidecarService);
    attach(&mut block, input, BlockType::SidecarTask);
    block
}

// The composed shapes below stitch their known children in a fixed order;
// that order determines final sibling ordering and must stay stable.

fn build_resources(input: &ConfigBlock) -> TemplateBlock {
    let mut block = own_parameters(input, BlockType::Resources);
    attach(&mut block, input, BlockType::Device);
    block
}

fn build_service(input: &ConfigBlock) -> TemplateBlock {
    let mut block = own_parameters(input, BlockType::Service);
    attach(&mut block, input, BlockType::Check);
    attach(&mut block, input, BlockType::Connect);
    attach(&mut block, input, BlockType::Meta);
    block
}

fn build_check(input: &ConfigBlock) -> TemplateBlock {
    let mut block = own_parameters(input, BlockType::Check);
    attach(&mut block, input, BlockType::CheckRestart);
    block
}

fn build_sidecar_service(input: &ConfigBlock) -> TemplateBlock {
    let mut block = own_parameters(input, BlockType::SidecarService);
    attach(&mut block, input, BlockType::Proxy);
    block
}

fn build_sidecar_task(input: &ConfigBlock) -> TemplateBlock {
    let mut block = own_parameters(input, BlockType::SidecarTask);
    attach(&mut block, input, BlockType::Env);
    attach(&mut block, input, BlockType::Logs);
    attach(&mut block, input, BlockType::Resources);
    block
}
