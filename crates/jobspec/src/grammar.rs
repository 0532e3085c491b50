//! The fixed job-specification grammar.
//!
//! Every block type the system recognizes is a variant of [`BlockType`]. The
//! grammar (which child types a block may contain, in traversal order) and the
//! merge policy for each type are exhaustive matches over the enum, so adding
//! a variant without registering its children and policy is a compile error
//! rather than a silent no-op.

#[cfg(test)]
#[path = "grammar_tests.rs"]
mod tests;

/// The closed vocabulary of job-specification block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Job,
    Group,
    Task,
    Service,
    Check,
    CheckRestart,
    Connect,
    SidecarService,
    SidecarTask,
    Proxy,
    Upstreams,
    Network,
    Dns,
    Port,
    Resources,
    Device,
    Template,
    Artifact,
    Env,
    Meta,
    Logs,
    Vault,
    Consul,
    Restart,
    Reschedule,
    Update,
    Migrate,
    Periodic,
    Parameterized,
    EphemeralDisk,
    Volume,
    VolumeMount,
    Scaling,
    Constraint,
    Affinity,
    Spread,
    Identity,
    Lifecycle,
}

/// How overlay instances of a block type are matched against base instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// At most one instance per parent; an overlay merges into the existing
    /// instance or creates it when absent.
    Singleton,
    /// Multiple instances matched across trees by their label.
    NamedDuplicate,
    /// Multiple unlabeled instances matched by the value of the discriminator
    /// parameter.
    UnnamedDuplicate { key: &'static str },
}

impl BlockType {
    /// The block-type name as it appears in input files and rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Job => "job",
            BlockType::Group => "group",
            BlockType::Task => "task",
            BlockType::Service => "service",
            BlockType::Check => "check",
            BlockType::CheckRestart => "check_restart",
            BlockType::Connect => "connect",
            BlockType::SidecarService => "sidecar_service",
            BlockType::SidecarTask => "sidecar_task",
            BlockType::Proxy => "proxy",
            BlockType::Upstreams => "upstreams",
            BlockType::Network => "network",
            BlockType::Dns => "dns",
            BlockType::Port => "port",
            BlockType::Resources => "resources",
            BlockType::Device => "device",
            BlockType::Template => "template",
            BlockType::Artifact => "artifact",
            BlockType::Env => "env",
            BlockType::Meta => "meta",
            BlockType::Logs => "logs",
            BlockType::Vault => "vault",
            BlockType::Consul => "consul",
            BlockType::Restart => "restart",
            BlockType::Reschedule => "reschedule",
            BlockType::Update => "update",
            BlockType::Migrate => "migrate",
            BlockType::Periodic => "periodic",
            BlockType::Parameterized => "parameterized",
            BlockType::EphemeralDisk => "ephemeral_disk",
            BlockType::Volume => "volume",
            BlockType::VolumeMount => "volume_mount",
            BlockType::Scaling => "scaling",
            BlockType::Constraint => "constraint",
            BlockType::Affinity => "affinity",
            BlockType::Spread => "spread",
            BlockType::Identity => "identity",
            BlockType::Lifecycle => "lifecycle",
        }
    }

    /// The child block types this type may contain, in traversal order.
    ///
    /// This order is the only determinant of sibling ordering in built trees
    /// and must stay stable for output compatibility.
    pub fn children(&self) -> &'static [BlockType] {
        match self {
            BlockType::Job => &[
                BlockType::Constraint,
                BlockType::Affinity,
                BlockType::Spread,
                BlockType::Parameterized,
                BlockType::Periodic,
                BlockType::Update,
                BlockType::Migrate,
                BlockType::Reschedule,
                BlockType::Group,
                BlockType::Meta,
            ],
            BlockType::Group => &[
                BlockType::Constraint,
                BlockType::Affinity,
                BlockType::Spread,
                BlockType::Consul,
                BlockType::Restart,
                BlockType::Reschedule,
                BlockType::EphemeralDisk,
                BlockType::Update,
                BlockType::Migrate,
                BlockType::Network,
                BlockType::Service,
                BlockType::Volume,
                BlockType::Scaling,
                BlockType::Task,
                BlockType::Vault,
                BlockType::Meta,
            ],
            BlockType::Task => &[
                BlockType::Constraint,
                BlockType::Affinity,
                BlockType::Artifact,
                BlockType::Env,
                BlockType::Identity,
                BlockType::Lifecycle,
                BlockType::Logs,
                BlockType::Resources,
                BlockType::Restart,
                BlockType::Service,
                BlockType::Template,
                BlockType::Vault,
                BlockType::VolumeMount,
                BlockType::Scaling,
                BlockType::Meta,
            ],
            BlockType::Service => &[BlockType::Check, BlockType::Connect, BlockType::Meta],
            BlockType::Check => &[BlockType::CheckRestart],
            BlockType::Connect => &[BlockType::SidecarService, BlockType::SidecarTask],
            BlockType::SidecarService => &[BlockType::Proxy],
            BlockType::SidecarTask => &[BlockType::Env, BlockType::Logs, BlockType::Resources],
            BlockType::Proxy => &[BlockType::Upstreams],
            BlockType::Network => &[BlockType::Dns, BlockType::Port],
            BlockType::Resources => &[BlockType::Device],
            BlockType::Device => &[BlockType::Constraint, BlockType::Affinity],
            BlockType::CheckRestart
            | BlockType::Upstreams
            | BlockType::Dns
            | BlockType::Port
            | BlockType::Template
            | BlockType::Artifact
            | BlockType::Env
            | BlockType::Meta
            | BlockType::Logs
            | BlockType::Vault
            | BlockType::Consul
            | BlockType::Restart
            | BlockType::Reschedule
            | BlockType::Update
            | BlockType::Migrate
            | BlockType::Periodic
            | BlockType::Parameterized
            | BlockType::EphemeralDisk
            | BlockType::Volume
            | BlockType::VolumeMount
            | BlockType::Scaling
            | BlockType::Constraint
            | BlockType::Affinity
            | BlockType::Spread
            | BlockType::Identity
            | BlockType::Lifecycle => &[],
        }
    }

    /// The merge policy governing how overlay instances match base instances.
    pub fn merge_policy(&self) -> MergePolicy {
        match self {
            BlockType::Group | BlockType::Task | BlockType::Volume | BlockType::Device => {
                MergePolicy::NamedDuplicate
            }
            BlockType::Service => MergePolicy::UnnamedDuplicate { key: "name" },
            BlockType::Check => MergePolicy::UnnamedDuplicate { key: "name" },
            BlockType::Port => MergePolicy::UnnamedDuplicate { key: "to" },
            BlockType::Template => MergePolicy::UnnamedDuplicate { key: "destination" },
            BlockType::Upstreams => MergePolicy::UnnamedDuplicate {
                key: "destination_name",
            },
            BlockType::Artifact => MergePolicy::UnnamedDuplicate { key: "source" },
            BlockType::Constraint | BlockType::Affinity | BlockType::Spread => {
                MergePolicy::UnnamedDuplicate { key: "attribute" }
            }
            BlockType::VolumeMount => MergePolicy::UnnamedDuplicate { key: "volume" },
            BlockType::Job
            | BlockType::CheckRestart
            | BlockType::Connect
            | BlockType::SidecarService
            | BlockType::SidecarTask
            | BlockType::Proxy
            | BlockType::Network
            | BlockType::Dns
            | BlockType::Resources
            | BlockType::Env
            | BlockType::Meta
            | BlockType::Logs
            | BlockType::Vault
            | BlockType::Consul
            | BlockType::Restart
            | BlockType::Reschedule
            | BlockType::Update
            | BlockType::Migrate
            | BlockType::Periodic
            | BlockType::Parameterized
            | BlockType::EphemeralDisk
            | BlockType::Scaling
            | BlockType::Identity
            | BlockType::Lifecycle => MergePolicy::Singleton,
        }
    }

    /// Whether instances of this type carry a label lifted from the input's
    /// `name` parameter.
    pub fn is_labeled(&self) -> bool {
        matches!(self, BlockType::Job) || self.merge_policy() == MergePolicy::NamedDuplicate
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
