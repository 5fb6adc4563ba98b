//! Undo/redo over whole-document snapshots.
//!
//! [`UndoHistory`] owns the [`HistoryLog`] and the [`ChangeObserver`] that
//! feeds it. A navigation step swaps the document content for a stored
//! snapshot while the observer is detached, and carries the view's
//! expansion and selection across the swap.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, error};

use crate::config::HistoryConfig;
use crate::document::PlanDocument;
use crate::error::{HistoryError, PlanError};
use crate::history::{HistoryListener, HistoryLog, HistoryStatus};
use crate::observer::ChangeObserver;
use crate::plan::{ListenerId, PlanNode, SharedListener};
use crate::view::DocumentView;

#[derive(Debug, Default)]
struct SavedViewState {
    expanded: Vec<usize>,
    selected: Option<usize>,
}

#[derive(Debug)]
pub struct UndoHistory {
    log: Rc<RefCell<HistoryLog>>,
    observer: Rc<RefCell<ChangeObserver>>,
    listener: Option<ListenerId>,
    saved: SavedViewState,
}

impl UndoHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self::with_log(HistoryLog::from_config(config))
    }

    pub fn with_log(log: HistoryLog) -> Self {
        let log = Rc::new(RefCell::new(log));
        let observer = Rc::new(RefCell::new(ChangeObserver::new(log.clone())));
        Self {
            log,
            observer,
            listener: None,
            saved: SavedViewState::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.log.borrow().is_enabled()
    }

    /// Starts recording edits of `document`. Does nothing when the history
    /// is disabled or already attached.
    pub fn attach<D: PlanDocument + ?Sized>(&mut self, document: &mut D) {
        if !self.is_enabled() || self.listener.is_some() {
            return;
        }
        let listener: SharedListener = self.observer.clone();
        self.listener = Some(document.add_listener(listener));
    }

    pub fn detach<D: PlanDocument + ?Sized>(&mut self, document: &mut D) {
        if let Some(id) = self.listener.take() {
            document.remove_listener(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    pub fn log(&self) -> Ref<'_, HistoryLog> {
        self.log.borrow()
    }

    pub fn status(&self) -> HistoryStatus {
        self.log.borrow().status()
    }

    pub fn can_undo(&self) -> bool {
        self.log.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.borrow().can_redo()
    }

    pub fn register_listener(&mut self, listener: impl HistoryListener + 'static) {
        self.log.borrow_mut().register_listener(listener);
    }

    /// Records the current document explicitly, e.g. the initial state.
    pub fn record<D: PlanDocument + ?Sized>(&mut self, document: &D, description: &str) {
        self.log.borrow_mut().add(document, description);
    }

    pub fn clear(&mut self) {
        self.log.borrow_mut().clear();
    }

    /// Starts a fresh history whose first entry is the current document.
    pub fn reset<D: PlanDocument + ?Sized>(&mut self, document: &D, description: &str) {
        let mut log = self.log.borrow_mut();
        log.clear();
        log.add(document, description);
    }

    pub fn begin_transaction(&mut self) {
        self.log.borrow_mut().begin_transaction();
    }

    pub fn end_transaction<D: PlanDocument + ?Sized>(&mut self, document: &D) {
        self.log.borrow_mut().end_transaction(document);
    }

    pub fn in_transaction(&self) -> bool {
        self.log.borrow().in_transaction()
    }

    pub fn undo<D: PlanDocument + ?Sized>(
        &mut self,
        document: &mut D,
        view: Option<&mut dyn DocumentView>,
    ) -> Result<bool, HistoryError> {
        self.move_in_history(-1, document, view)
    }

    pub fn redo<D: PlanDocument + ?Sized>(
        &mut self,
        document: &mut D,
        view: Option<&mut dyn DocumentView>,
    ) -> Result<bool, HistoryError> {
        self.move_in_history(1, document, view)
    }

    /// Steps `offset` entries through the history and loads the entry into
    /// `document`.
    ///
    /// Returns `Ok(false)` when the step is not possible; the log and the
    /// document are then untouched. A failure while loading the snapshot
    /// leaves the document as the failed load produced it; the view is
    /// still restored against that partial document.
    pub fn move_in_history<D: PlanDocument + ?Sized>(
        &mut self,
        offset: isize,
        document: &mut D,
        mut view: Option<&mut dyn DocumentView>,
    ) -> Result<bool, HistoryError> {
        let (nodes, position) = {
            let mut log = self.log.borrow_mut();
            let Some(snapshot) = log.step(offset) else {
                return Ok(false);
            };
            let nodes = snapshot.materialize();
            (nodes, log.position().unwrap_or_default())
        };

        if let Some(view) = view.as_deref_mut() {
            self.save_view_state(document.root(), view);
        }

        let loaded = self.load_snapshot(document, nodes);
        if let Err(source) = &loaded {
            error!(position, error = %source, "failed to load from history");
        }

        if let Some(view) = view.as_deref_mut() {
            view.content_replaced();
            self.restore_view_state(document.root(), view);
            view.refresh_editor(document.root());
        }

        {
            let log = self.log.borrow();
            debug!(position = ?log.position(), size = log.len(), "moved in history");
        }
        self.log.borrow_mut().notify_listeners();
        loaded
            .map(|()| true)
            .map_err(|source| HistoryError::SnapshotLoad { position, source })
    }

    fn load_snapshot<D: PlanDocument + ?Sized>(
        &mut self,
        document: &mut D,
        nodes: Vec<PlanNode>,
    ) -> Result<(), PlanError> {
        let observer = self.listener.take().and_then(|id| document.remove_listener(id));
        self.log.borrow_mut().set_suppressed(true);

        document.clear();
        let root = document.root().id;
        let result = document.add_subtree(root, nodes);

        if let Some(observer) = observer {
            self.listener = Some(document.add_listener(observer));
        }
        self.log.borrow_mut().set_suppressed(false);
        result
    }

    fn save_view_state(&mut self, root: &PlanNode, view: &dyn DocumentView) {
        self.saved.expanded = view.expanded_rows(root);
        self.saved.selected = view.selected_row(root);
    }

    fn restore_view_state(&mut self, root: &PlanNode, view: &mut dyn DocumentView) {
        if self.saved.expanded.is_empty() {
            view.expand_row(root, 0);
        } else {
            // Ascending order: expanding a row only shifts the rows below it.
            for &row in &self.saved.expanded {
                view.expand_row(root, row);
            }
        }
        view.select_row(root, self.saved.selected);
    }
}
