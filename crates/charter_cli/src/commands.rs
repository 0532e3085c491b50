//! CLI command implementations.

pub mod deploy_cmd;
pub mod render_cmd;
