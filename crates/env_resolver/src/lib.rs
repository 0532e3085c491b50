//! Reference-token resolution for job-specification trees.
//!
//! String values and block labels may embed parameter references of two
//! shapes: a bare reference `${NAME}` and a reference with an inline default
//! `${NAME|default=VALUE}`. References are resolved against a layered source:
//! a file-backed KEY=VALUE variable file underneath the ambient process
//! environment, with the environment taking precedence where both define the
//! same name.
//!
//! A name that resolves through neither layer and carries no default is not a
//! local error: it is accumulated in the resolver and reported once, in
//! aggregate, after the whole tree has been processed. The token text is left
//! unexpanded at its position so the output names the unresolved reference.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use jobspec::{TemplateBlock, Value};

mod errors;
pub use errors::Error;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// `${NAME}` or `${NAME|default=LITERAL}`, where NAME is a namespaced
/// identifier.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)(?:\|default=([^}]*))?\}")
        .unwrap_or_else(|error| panic!("reference token pattern is invalid: {error}"))
});

/// Resolves reference tokens against layered named-value sources.
///
/// One resolver is created per build invocation; the missing-reference
/// accumulator is part of the instance, never process-wide state, so
/// independent builds stay deterministic.
pub struct Resolver {
    vars: HashMap<String, String>,
    missing: Vec<String>,
}

impl Resolver {
    /// Create a resolver from an optional variable file layered under the
    /// process environment.
    ///
    /// An unreadable or malformed variable file is a hard error; resolution
    /// cannot meaningfully proceed without the layer the caller asked for.
    pub fn from_sources(var_file: Option<&Path>) -> Result<Self, Error> {
        let mut vars = HashMap::new();

        if let Some(path) = var_file {
            let entries = dotenvy::from_path_iter(path).map_err(|error| Error::VarFile {
                path: path.display().to_string(),
                reason: error.to_string(),
            })?;
            for entry in entries {
                let (key, value) = entry.map_err(|error| Error::VarFile {
                    path: path.display().to_string(),
                    reason: error.to_string(),
                })?;
                vars.insert(key, value);
            }
            debug!(path = %path.display(), count = vars.len(), "loaded variable file");
        }

        // The process environment wins where both layers define a name.
        for (key, value) in std::env::vars() {
            vars.insert(key, value);
        }

        Ok(Resolver {
            vars,
            missing: Vec::new(),
        })
    }

    /// Create a resolver over a fixed set of named values, with no ambient
    /// environment layer.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Resolver {
            vars,
            missing: Vec::new(),
        }
    }

    /// Expand every reference token in `text`.
    ///
    /// Single pass: text produced by a substitution is never re-scanned.
    /// Unresolvable tokens are recorded and left unexpanded in place.
    pub fn resolve_text(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in TOKEN.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            match self.expand(&caps) {
                Some(value) => out.push_str(&value),
                None => {
                    self.record_missing(name.as_str());
                    out.push_str(whole.as_str());
                }
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        out
    }

    /// Resolve one value. A string that is exactly one reference token is
    /// re-typed on successful resolution; strings with surrounding literal
    /// text stay strings. Lists are resolved elementwise.
    pub fn resolve_value(&mut self, value: &Value) -> Value {
        match value {
            Value::String(text) => self.resolve_string(text),
            Value::List(items) => {
                Value::List(items.iter().map(|item| self.resolve_value(item)).collect())
            }
            other => other.clone(),
        }
    }

    /// Resolve every label and string parameter in the tree, depth first.
    pub fn resolve_tree(&mut self, block: &mut TemplateBlock) {
        if let Some(label) = &block.label {
            let resolved = self.resolve_text(label);
            block.label = Some(resolved);
        }
        for (_, value) in block.parameters.iter_mut() {
            let resolved = self.resolve_value(value);
            *value = resolved;
        }
        for child in block.children.iter_mut() {
            self.resolve_tree(child);
        }
    }

    /// The names that could not be resolved, each listed once, in the order
    /// they were first encountered.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Consume the resolver and return the missing-reference report.
    pub fn into_missing(self) -> Vec<String> {
        self.missing
    }

    fn resolve_string(&mut self, text: &str) -> Value {
        if let Some(caps) = TOKEN.captures(text) {
            let is_whole_token = caps
                .get(0)
                .is_some_and(|whole| whole.start() == 0 && whole.end() == text.len());
            if is_whole_token {
                return match self.expand(&caps) {
                    Some(resolved) => retype(&resolved),
                    None => {
                        if let Some(name) = caps.get(1) {
                            self.record_missing(name.as_str());
                        }
                        Value::String(text.to_string())
                    }
                };
            }
        }
        Value::String(self.resolve_text(text))
    }

    fn expand(&self, caps: &Captures<'_>) -> Option<String> {
        let name = caps.get(1)?.as_str();
        if let Some(value) = self.vars.get(name) {
            trace!(name, "resolved reference from named-value source");
            return Some(value.clone());
        }
        caps.get(2).map(|default| {
            trace!(name, "resolved reference from inline default");
            default.as_str().to_string()
        })
    }

    fn record_missing(&mut self, name: &str) {
        if !self.missing.iter().any(|existing| existing == name) {
            self.missing.push(name.to_string());
        }
    }
}

/// Best-effort re-typing of a resolved reference value.
///
/// Attempts integer, then boolean, then 32-bit float, then 64-bit float; the
/// first successful parse wins, otherwise the value stays a string. The same
/// literal always yields the same type.
pub fn retype(text: &str) -> Value {
    if let Ok(int) = text.parse::<i64>() {
        return Value::Int(int);
    }
    if let Ok(boolean) = text.parse::<bool>() {
        return Value::Bool(boolean);
    }
    if let Ok(float) = text.parse::<f32>() {
        return Value::Float(f64::from(float));
    }
    if let Ok(float) = text.parse::<f64>() {
        return Value::Float(float);
    }
    Value::String(text.to_string())
}
