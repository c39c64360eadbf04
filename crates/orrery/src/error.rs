//! Load-time errors. The frame loop itself never fails: absent nodes are
//! skipped where they are found.

use crate::api::types::NodeId;

/// Errors from scene-graph mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown scene node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} cannot be its own parent")]
    SelfParent(NodeId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}

/// Errors from parsing, validating or assembling a system manifest.
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("body `{body}` references unknown parent `{parent}` (parents must be listed first)")]
    UnknownParent { body: String, parent: String },

    #[error("duplicate body name `{0}`")]
    DuplicateBody(String),

    #[error("body `{body}` has a non-finite `{field}`")]
    NonFinite { body: String, field: &'static str },

    #[error("body `{body}` must have a positive radius")]
    InvalidRadius { body: String },

    #[error("duplicate camera preset `{0}`")]
    DuplicatePreset(String),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
