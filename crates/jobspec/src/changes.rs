//! The changes engine: merging overlay trees and scalar overrides into a base
//! canonical tree.
//!
//! One call to [`apply`] mutates the base tree in place. Overlay trees are
//! read-only throughout; they are matched against base blocks using each block
//! type's merge policy, merged parameter-by-parameter, and any overlay block
//! with no base counterpart is appended as a new sibling at the end of its
//! parent's child list. Release renaming, namespace injection, and chart-value
//! substitution happen at their designated block types, always after the
//! parameter merge and before recursion into children.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::block::TemplateBlock;
use crate::errors::StructureError;
use crate::grammar::{BlockType, MergePolicy};
use crate::value::Value;

#[cfg(test)]
#[path = "changes_tests.rs"]
mod tests;

/// Everything one build wants changed relative to the base definition.
///
/// Supplied once per build and immutable during the merge pass. Overlay trees
/// apply in declared order, so a later overlay's value for the same key wins
/// over an earlier one.
#[derive(Debug, Clone, Default)]
pub struct Changes {
    /// Release name appended to job, group, and task labels.
    pub release: Option<String>,
    /// Target namespace injected into the job and its consul/vault blocks.
    pub namespace: Option<String>,
    /// Externally supplied substitutions, e.g. `type` or `deploy_version`.
    pub chart_values: IndexMap<String, Value>,
    /// Canonical trees of the overlay files, in application order.
    pub overlays: Vec<TemplateBlock>,
}

/// Merge `changes` into `base`, mutating it in place.
///
/// The root call must be made at a job block. Missing overlay matches are
/// treated as "no changes at this node", never as errors.
pub fn apply(base: &mut TemplateBlock, changes: &Changes) -> Result<(), StructureError> {
    if base.block_type != BlockType::Job {
        return Err(StructureError::UnexpectedRoot {
            found: base.block_type,
        });
    }

    let matches: Vec<&TemplateBlock> = changes
        .overlays
        .iter()
        .filter(|overlay| overlay.block_type == BlockType::Job)
        .collect();
    debug!(
        overlays = matches.len(),
        release = changes.release.as_deref().unwrap_or(""),
        namespace = changes.namespace.as_deref().unwrap_or(""),
        "applying changes to job tree"
    );

    let mut path = vec![segment(base)];
    apply_block(base, &matches, changes, None, &mut path)
}

/// One recursion step: validate shape, merge parameters, run the type-specific
/// mutation, then recurse into declared children with a narrowed overlay view.
fn apply_block<'a>(
    base: &mut TemplateBlock,
    matches: &[&'a TemplateBlock],
    changes: &'a Changes,
    parent: Option<BlockType>,
    path: &mut Vec<String>,
) -> Result<(), StructureError> {
    validate_singleton_shape(base, path)?;
    merge_parameters(base, matches);
    mutate(base, changes, parent);

    let parent_type = base.block_type;
    for &child_type in parent_type.children() {
        let candidates: Vec<&'a TemplateBlock> = matches
            .iter()
            .flat_map(|overlay| overlay.children_of(child_type))
            .collect();
        let mut used = vec![false; candidates.len()];

        for child in base
            .children
            .iter_mut()
            .filter(|child| child.block_type == child_type)
        {
            let mut narrowed: Vec<&'a TemplateBlock> = Vec::new();
            for (index, candidate) in candidates.iter().enumerate() {
                if policy_match(child_type, child, candidate) {
                    used[index] = true;
                    narrowed.push(*candidate);
                }
            }
            path.push(segment(child));
            apply_block(child, &narrowed, changes, Some(parent_type), path)?;
            path.pop();
        }

        // Overlay blocks with no base counterpart become new siblings at the
        // end of the child list. Overlay files that add the same new block are
        // merged together before it is appended.
        let mut remaining: Vec<&'a TemplateBlock> = candidates
            .iter()
            .enumerate()
            .filter(|(index, _)| !used[*index])
            .map(|(_, candidate)| *candidate)
            .collect();
        while !remaining.is_empty() {
            let mut appended = remaining.remove(0).clone();
            let mut further: Vec<&'a TemplateBlock> = Vec::new();
            remaining.retain(|candidate| {
                if policy_match(child_type, &appended, candidate) {
                    further.push(*candidate);
                    false
                } else {
                    true
                }
            });
            trace!(block = %child_type, parent = %parent_type, "appending overlay-only block");
            path.push(segment(&appended));
            apply_block(&mut appended, &further, changes, Some(parent_type), path)?;
            path.pop();
            base.children.push(appended);
        }
    }

    Ok(())
}

/// The base tree may hold at most one instance of each singleton child type.
/// This is a structural assumption about the base, not the overlays.
fn validate_singleton_shape(base: &TemplateBlock, path: &[String]) -> Result<(), StructureError> {
    for &child_type in base.block_type.children() {
        if child_type.merge_policy() != MergePolicy::Singleton {
            continue;
        }
        let count = base.children_of(child_type).count();
        if count > 1 {
            return Err(StructureError::DuplicateSingleton {
                block_type: child_type,
                path: path.join("."),
                count,
            });
        }
    }
    Ok(())
}

/// Overlay parameters overwrite same-key base parameters; overlay-only keys
/// are appended. Applied at every block type without exception.
fn merge_parameters(base: &mut TemplateBlock, matches: &[&TemplateBlock]) {
    for overlay in matches {
        for (key, value) in &overlay.parameters {
            base.set_parameter(key, value.clone());
        }
    }
}

/// Whether an overlay block describes the same instance as a base block.
fn policy_match(block_type: BlockType, base: &TemplateBlock, overlay: &TemplateBlock) -> bool {
    match block_type.merge_policy() {
        MergePolicy::Singleton => true,
        MergePolicy::NamedDuplicate => base.label == overlay.label,
        MergePolicy::UnnamedDuplicate { key } => base.parameter(key) == overlay.parameter(key),
    }
}

/// Type-specific mutations, run after the parameter merge and before
/// recursion so a rename applied to a parent is never observed by children.
fn mutate(block: &mut TemplateBlock, changes: &Changes, parent: Option<BlockType>) {
    match block.block_type {
        BlockType::Job => mutate_job(block, changes),
        BlockType::Group | BlockType::Task => {
            if let Some(release) = &changes.release {
                suffix_label(block, release);
            }
        }
        BlockType::Consul if parent == Some(BlockType::Group) => {
            if let Some(namespace) = &changes.namespace {
                block.set_parameter("namespace", Value::String(namespace.clone()));
            }
        }
        BlockType::Vault => {
            if let Some(namespace) = &changes.namespace {
                block.set_parameter("namespace", Value::String(namespace.clone()));
            }
        }
        // The job's direct meta child is distinct from the general meta type
        // used elsewhere: it carries the deploy identity.
        BlockType::Meta if parent == Some(BlockType::Job) => {
            if let Some(version) = changes.chart_values.get("deploy_version") {
                block.set_parameter("run_uuid", version.clone());
            }
        }
        BlockType::Service => {
            if let Some(release) = &changes.release {
                suffix_task_reference(block, release);
            }
        }
        _ => {}
    }
}

fn mutate_job(job: &mut TemplateBlock, changes: &Changes) {
    if let Some(release) = &changes.release {
        suffix_label(job, release);
    }
    if job.parameter("type").is_none() {
        if let Some(job_type) = changes.chart_values.get("type") {
            job.set_parameter("type", job_type.clone());
        }
    }
    if let Some(namespace) = &changes.namespace {
        if job.parameter("namespace").is_none() {
            job.set_parameter("namespace", Value::String(namespace.clone()));
        }
    }
    if job.child_of(BlockType::Meta).is_none() {
        if let Some(version) = changes.chart_values.get("deploy_version") {
            let mut meta = TemplateBlock::new(BlockType::Meta);
            meta.parameters
                .push(("run_uuid".to_string(), version.clone()));
            job.children.push(meta);
        }
    }
}

/// Append `-{release}` to the block label exactly once. Composed merge runs
/// must not stack suffixes.
fn suffix_label(block: &mut TemplateBlock, release: &str) {
    if release.is_empty() {
        return;
    }
    if let Some(label) = &mut block.label {
        let suffix = format!("-{release}");
        if !label.ends_with(&suffix) {
            label.push_str(&suffix);
        }
    }
}

/// A service referencing a task by name must follow that task's rename.
fn suffix_task_reference(service: &mut TemplateBlock, release: &str) {
    if release.is_empty() {
        return;
    }
    let suffix = format!("-{release}");
    if let Some(Value::String(task)) = service.parameter("task").cloned() {
        if !task.ends_with(&suffix) {
            service.set_parameter("task", Value::String(format!("{task}{suffix}")));
        }
    }
}

fn segment(block: &TemplateBlock) -> String {
    match &block.label {
        Some(label) => format!("{}[{label}]", block.block_type),
        None => block.block_type.to_string(),
    }
}
