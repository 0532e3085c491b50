//! # Jobspec
//!
//! The canonical job-specification model for Charter: generic configuration
//! values, the fixed block-type grammar, the structure builder that projects
//! parsed input onto that grammar, and the changes engine that merges overlay
//! trees and scalar overrides into a base tree.
//!
//! ## Pipeline position
//!
//! Input files are parsed into [`Value`] trees by the caller, mechanically
//! reshaped into [`ConfigBlock`]s, projected into canonical [`TemplateBlock`]
//! trees by [`structure::build`], and finally merged by [`changes::apply`].
//! The mutated base tree is the sole artifact handed onward for rendering.
//!
//! ## Examples
//!
//! ```
//! use jobspec::{changes, structure, BlockType, Changes, ConfigBlock, Value};
//!
//! let parsed: serde_yaml::Value = serde_yaml::from_str(
//!     "name: example\ntype: service\ngroup:\n  - name: web\n    count: 2\n",
//! )
//! .unwrap();
//! let value = Value::from_yaml(&parsed).unwrap();
//! let input = ConfigBlock::from_value("job", &value);
//!
//! let mut job = structure::build(&input, BlockType::Job);
//! let changes = Changes {
//!     release: Some("prod".to_string()),
//!     ..Changes::default()
//! };
//! changes::apply(&mut job, &changes).unwrap();
//!
//! assert_eq!(job.label.as_deref(), Some("example-prod"));
//! ```

pub mod block;
pub mod changes;
pub mod errors;
pub mod grammar;
pub mod structure;
pub mod value;

pub use block::{ConfigBlock, TemplateBlock};
pub use changes::Changes;
pub use errors::{StructureError, ValueError};
pub use grammar::{BlockType, MergePolicy};
pub use value::Value;
