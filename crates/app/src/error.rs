use std::path::PathBuf;

use plan_state::{ConfigError, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid plan file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} has unsupported plan file version {found}", path.display())]
    UnsupportedVersion { path: PathBuf, found: u32 },
    #[error("{} contains node {id} more than once", path.display())]
    DuplicateNodeId { path: PathBuf, id: NodeId },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
