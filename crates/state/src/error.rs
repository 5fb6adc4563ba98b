use std::path::PathBuf;

use crate::plan::NodeId;

/// Errors raised by structural edits of a [`PlanTree`](crate::plan::PlanTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("the document root cannot be removed or moved")]
    RootImmutable,

    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("cannot move node {0} below itself")]
    MoveIntoDescendant(NodeId),

    #[error("node {0} is the last top-level element")]
    LastTopLevel(NodeId),
}

/// Errors raised while stepping through the undo history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// Repopulating the document from a stored snapshot failed. The document
    /// has already been cleared at that point and is left as the failed load
    /// produced it.
    #[error("failed to load history entry {position}")]
    SnapshotLoad {
        position: usize,
        #[source]
        source: PlanError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}
