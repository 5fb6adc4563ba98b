//! Bounded, cursor-indexed log of document snapshots.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::document::PlanDocument;
use crate::snapshot::{HistoryEntry, Snapshot};

/// Cheap summary of the log, handed to [`HistoryListener`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub position: Option<usize>,
    pub len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Called whenever the log changes (add, clear or a navigation step).
pub trait HistoryListener {
    fn history_changed(&mut self, status: HistoryStatus);
}

impl<F> HistoryListener for F
where
    F: FnMut(HistoryStatus),
{
    fn history_changed(&mut self, status: HistoryStatus) {
        self(status)
    }
}

#[derive(Debug, Default)]
struct Transaction {
    depth: usize,
    pending: Option<String>,
}

pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    /// `None` while nothing has been recorded.
    position: Option<usize>,
    capacity: usize,
    suppressed: bool,
    transaction: Transaction,
    listeners: Vec<Box<dyn HistoryListener>>,
}

impl std::fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLog")
            .field("entries", &self.entries.len())
            .field("position", &self.position)
            .field("capacity", &self.capacity)
            .field("suppressed", &self.suppressed)
            .finish()
    }
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            position: None,
            capacity,
            suppressed: false,
            transaction: Transaction::default(),
            listeners: Vec::new(),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.history_size)
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.position.and_then(|p| self.entries.get(p))
    }

    pub fn can_undo(&self) -> bool {
        self.position.is_some_and(|p| p > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.position.is_some_and(|p| p + 1 < self.entries.len())
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            position: self.position,
            len: self.entries.len(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    pub fn register_listener(&mut self, listener: impl HistoryListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Records the current state of `document` after an edit.
    ///
    /// Ignored when the log is disabled or suppressed, and for an empty
    /// document. Inside a transaction only the first description is kept and
    /// recording is deferred to [`end_transaction`](Self::end_transaction).
    pub fn add<D>(&mut self, document: &D, description: &str)
    where
        D: PlanDocument + ?Sized,
    {
        if !self.is_enabled() {
            debug!("history size is 0, undo/redo is disabled");
            return;
        }
        if self.suppressed {
            debug!(description, "not adding history while suppressed");
            return;
        }
        if document.is_empty() {
            debug!(description, "not adding history for an empty document");
            return;
        }
        if self.transaction.depth > 0 {
            if self.transaction.pending.is_none() {
                self.transaction.pending = Some(description.to_string());
            }
            return;
        }
        self.push(Snapshot::capture(document.root()), description);
    }

    fn push(&mut self, snapshot: Snapshot, description: &str) {
        let next = self.position.map_or(0, |p| p + 1);
        if self.entries.len() > next {
            debug!(
                position = next,
                size = self.entries.len(),
                "discarding records after position"
            );
            self.entries.truncate(next);
        }
        self.entries
            .push_back(HistoryEntry::new(snapshot, description));

        // Evicting from the front shifts every index down by one; the cursor
        // follows so it keeps naming the entry just added.
        let mut position = next;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            position = position.saturating_sub(1);
        }
        self.position = Some(position);

        debug!(
            description,
            position,
            size = self.entries.len(),
            "added history entry"
        );
        self.notify_listeners();
    }

    /// Moves the cursor by `offset` and returns the snapshot it lands on.
    ///
    /// Invalid steps (undo at the first entry, redo at the last, empty or
    /// disabled log, a target outside the log, or an open transaction)
    /// leave the log untouched and return `None`.
    pub fn step(&mut self, offset: isize) -> Option<&Snapshot> {
        debug!(
            position = ?self.position,
            offset,
            size = self.entries.len(),
            "moving in history"
        );
        if !self.is_enabled() {
            debug!("history size is 0, undo/redo is disabled");
            return None;
        }
        if self.in_transaction() {
            warn!(offset, "can't move in history while a transaction is open");
            return None;
        }
        if offset < 0 && !self.can_undo() {
            warn!("can't undo, already at the first record");
            return None;
        }
        if offset > 0 && !self.can_redo() {
            warn!("can't redo, already at the last record");
            return None;
        }
        if self.entries.is_empty() || offset == 0 {
            warn!(offset, "can't proceed, nothing to move to");
            return None;
        }

        let current = self.position?;
        let Some(target) = current
            .checked_add_signed(offset)
            .filter(|target| *target < self.entries.len())
        else {
            warn!(current, offset, "step leaves the history");
            return None;
        };

        self.position = Some(target);
        self.entries.get(target).map(HistoryEntry::snapshot)
    }

    pub fn clear(&mut self) {
        if !self.is_enabled() {
            debug!("history size is 0, undo/redo is disabled");
            return;
        }
        if self.suppressed {
            return;
        }
        debug!("clearing undo history");
        self.entries.clear();
        self.position = None;
        // An open transaction stays open; only its pending edit is dropped.
        self.transaction.pending = None;
        self.notify_listeners();
    }

    /// Opens a group of edits that is recorded as one entry. Groups nest.
    pub fn begin_transaction(&mut self) {
        self.transaction.depth += 1;
    }

    /// Closes a group; the outermost close records a single entry when any
    /// edit arrived while it was open.
    pub fn end_transaction<D>(&mut self, document: &D)
    where
        D: PlanDocument + ?Sized,
    {
        if self.transaction.depth == 0 {
            warn!("end_transaction without a matching begin");
            return;
        }
        self.transaction.depth -= 1;
        if self.transaction.depth > 0 {
            return;
        }
        if let Some(description) = self.transaction.pending.take() {
            self.add(document, &description);
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.depth > 0
    }

    pub(crate) fn notify_listeners(&mut self) {
        let status = self.status();
        for listener in &mut self.listeners {
            listener.history_changed(status);
        }
    }
}
