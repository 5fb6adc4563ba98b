//! Test-plan document model with snapshot-based undo/redo.
//!
//! Edits to a [`PlanTree`](plan::PlanTree) are observed by an
//! [`UndoHistory`](undo::UndoHistory), which records a deep snapshot after
//! each change and can step backward and forward through them.

pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod history;
pub mod observer;
pub mod plan;
pub mod project;
pub mod snapshot;
pub mod undo;
pub mod view;

pub use command::UndoCommand;
pub use config::{AppConfig, HistoryConfig};
pub use document::PlanDocument;
pub use error::{ConfigError, HistoryError, PlanError};
pub use history::{HistoryListener, HistoryLog, HistoryStatus};
pub use plan::{ElementKind, NodeId, PlanNode, PlanTree, PropertyValue};
pub use snapshot::{HistoryEntry, Snapshot};
pub use undo::UndoHistory;
pub use view::{DocumentView, TreeViewState};
