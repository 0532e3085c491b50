//! Rendering canonical trees to job-specification text.
//!
//! The mapping is fixed: every block becomes a nested `block_type "label"
//! { ... }` construct with two-space indentation, every parameter a
//! `key = value` line. Strings are quoted, numbers and booleans are bare,
//! lists are bracketed comma-joined literals, and the `data` key is rendered
//! as a heredoc block. The output is byte-identical for identical inputs;
//! downstream schedulers consume this text format directly.

use jobspec::{TemplateBlock, Value};

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

/// Render the final canonical tree to job-specification text.
pub fn render_job(job: &TemplateBlock) -> String {
    let mut out = String::new();
    render_block(job, 0, &mut out);
    out
}

fn render_block(block: &TemplateBlock, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    out.push_str(&pad);
    out.push_str(block.block_type.as_str());
    if let Some(label) = &block.label {
        out.push_str(" \"");
        out.push_str(label);
        out.push('"');
    }
    out.push_str(" {\n");

    for (key, value) in &block.parameters {
        if key == "data" {
            if let Value::String(text) = value {
                out.push_str(&format!("{pad}  data = <<EOH\n{text}\nEOH\n"));
                continue;
            }
        }
        out.push_str(&format!("{pad}  {key} = {}\n", render_value(value)));
    }

    for child in &block.children {
        out.push('\n');
        render_block(child, depth + 1, out);
    }

    out.push_str(&pad);
    out.push_str("}\n");
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", escape(text)),
        Value::Int(int) => int.to_string(),
        Value::Float(float) => float.to_string(),
        Value::Bool(boolean) => boolean.to_string(),
        Value::List(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Map(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{key} = {}", render_value(value)))
                .collect();
            format!("{{ {} }}", rendered.join(", "))
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
