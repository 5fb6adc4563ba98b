use std::collections::HashSet;
use std::path::Path;

use plan_state::{NodeId, PlanNode, PlanTree};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;

pub const PLAN_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct PlanFileRef<'a> {
    version: u32,
    nodes: &'a [PlanNode],
}

#[derive(Debug, Deserialize)]
struct PlanFile {
    version: u32,
    #[serde(default)]
    nodes: Vec<PlanNode>,
}

/// Writes the top-level elements of `tree` as pretty-printed JSON.
pub fn save_plan(path: &Path, tree: &PlanTree) -> Result<(), AppError> {
    let file = PlanFileRef {
        version: PLAN_FILE_VERSION,
        nodes: tree.top_level(),
    };
    let json = serde_json::to_string_pretty(&file).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), nodes = tree.node_count(), "saved plan");
    Ok(())
}

pub fn load_plan(path: &Path) -> Result<Vec<PlanNode>, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PlanFile = serde_json::from_str(&raw).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if file.version != PLAN_FILE_VERSION {
        return Err(AppError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
        });
    }
    if let Some(id) = first_repeated_id(&file.nodes) {
        return Err(AppError::DuplicateNodeId {
            path: path.to_path_buf(),
            id,
        });
    }
    info!(path = %path.display(), top_level = file.nodes.len(), "loaded plan");
    Ok(file.nodes)
}

fn first_repeated_id(nodes: &[PlanNode]) -> Option<NodeId> {
    let mut seen = HashSet::new();
    let mut pending: Vec<&PlanNode> = nodes.iter().collect();
    while let Some(node) = pending.pop() {
        if !seen.insert(node.id) {
            return Some(node.id);
        }
        pending.extend(node.children.iter());
    }
    None
}
