use tracing::{info, warn};

use crate::command::UndoCommand;
use crate::config::HistoryConfig;
use crate::error::PlanError;
use crate::plan::{ElementKind, NodeId, PlanNode, PlanTree, PropertyValue};
use crate::undo::UndoHistory;
use crate::view::{DocumentView, TreeViewState};

pub const DEFAULT_PLAN_NAME: &str = "Test Plan";

/// The edited document and its history.
#[derive(Debug)]
pub struct ProjectState {
    pub plan: PlanTree,
    pub history: UndoHistory,
}

impl ProjectState {
    pub fn new(config: &HistoryConfig) -> Self {
        let mut plan = PlanTree::with_test_plan(DEFAULT_PLAN_NAME);
        let mut history = UndoHistory::new(config);
        history.attach(&mut plan);
        history.record(&plan, "Created");
        Self { plan, history }
    }

    /// Runs one user action against the plan. However many edits it makes,
    /// the action is recorded as a single history entry.
    pub fn transact<T>(
        &mut self,
        action: impl FnOnce(&mut PlanTree) -> Result<T, PlanError>,
    ) -> Result<T, PlanError> {
        self.history.begin_transaction();
        let result = action(&mut self.plan);
        self.history.end_transaction(&self.plan);
        result
    }

    /// Replaces the document with a blank plan.
    pub fn new_plan(&mut self) {
        let blank = PlanNode::new(DEFAULT_PLAN_NAME, ElementKind::TestPlan);
        self.replace_content(vec![blank], "Initial Tree");
    }

    /// Replaces the document with loaded nodes.
    pub fn load_plan(&mut self, nodes: Vec<PlanNode>) -> Result<(), PlanError> {
        self.history.detach(&mut self.plan);
        self.plan.clear();
        let root = self.plan.root_id();
        let loaded = self.plan.add_subtree(root, nodes);
        self.history.attach(&mut self.plan);
        self.history.reset(&self.plan, "Loaded tree");
        loaded
    }

    fn replace_content(&mut self, nodes: Vec<PlanNode>, description: &str) {
        self.history.detach(&mut self.plan);
        self.plan.clear();
        let root = self.plan.root_id();
        if let Err(err) = self.plan.add_subtree(root, nodes) {
            warn!(error = %err, "failed to populate plan");
        }
        self.history.attach(&mut self.plan);
        self.history.reset(&self.plan, description);
    }
}

pub struct UiState {
    pub view: TreeViewState,
    pub new_node_name: String,
    pub new_node_kind: ElementKind,
    pub rename_buffer: String,
    pub new_property_key: String,
    pub new_property_value: String,
    pub plan_path: String,
    pub status: Option<String>,
    pub show_history: bool,
    /// Node and editor revision the inspector buffers were filled from.
    pub inspected: Option<(NodeId, u64)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            view: TreeViewState::default(),
            new_node_name: String::new(),
            new_node_kind: ElementKind::ThreadGroup,
            rename_buffer: String::new(),
            new_property_key: String::new(),
            new_property_value: String::new(),
            plan_path: String::from("plan.json"),
            status: None,
            show_history: true,
            inspected: None,
        }
    }
}

pub struct AppState {
    pub project: ProjectState,
    pub ui: UiState,
}

impl AppState {
    pub fn new(config: &HistoryConfig) -> Self {
        let mut state = Self {
            project: ProjectState::new(config),
            ui: UiState::default(),
        };
        state.focus_first();
        state
    }

    pub fn undo(&mut self) {
        self.run(UndoCommand::Undo);
    }

    pub fn redo(&mut self) {
        self.run(UndoCommand::Redo);
    }

    pub fn run(&mut self, command: UndoCommand) {
        let result = command.apply(
            &mut self.project.history,
            &mut self.project.plan,
            Some(&mut self.ui.view as &mut dyn DocumentView),
        );
        match result {
            Ok(true) => self.ui.status = None,
            Ok(false) => {}
            Err(err) => self.ui.status = Some(format!("{}: {err}", command.label())),
        }
    }

    /// Navigates straight to the history entry at `index`.
    pub fn jump_to(&mut self, index: usize) {
        let Some(position) = self.project.history.log().position() else {
            return;
        };
        let offset = index as isize - position as isize;
        let result = self.project.history.move_in_history(
            offset,
            &mut self.project.plan,
            Some(&mut self.ui.view as &mut dyn DocumentView),
        );
        if let Err(err) = result {
            self.ui.status = Some(format!("History: {err}"));
        }
    }

    pub fn selected_node(&self) -> Option<&PlanNode> {
        self.ui.view.selected().and_then(|id| self.project.plan.node(id))
    }

    /// Whether the selected node may be deleted. The last top-level element
    /// always stays.
    pub fn can_remove_selected(&self) -> bool {
        self.ui
            .view
            .selected()
            .is_some_and(|id| self.project.plan.can_remove(id))
    }

    /// Whether the selected node sits below a top-level element and can be
    /// wrapped in a new controller.
    pub fn can_wrap_selected(&self) -> bool {
        let root = self.project.plan.root_id();
        self.ui
            .view
            .selected()
            .and_then(|id| self.project.plan.parent_of(id))
            .is_some_and(|parent| parent.id != root)
    }

    pub fn add_child(&mut self, parent: NodeId, name: &str, kind: ElementKind) {
        let name = if name.trim().is_empty() {
            kind.label()
        } else {
            name.trim()
        };
        let node = PlanNode::new(name, kind);
        match self.project.transact(|plan| plan.insert(parent, None, node)) {
            Ok(id) => {
                self.ui.view.expand(parent);
                self.ui.view.select(Some(id));
            }
            Err(err) => self.report(err),
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let parent = self.project.plan.parent_of(id).map(|p| p.id);
        match self.project.transact(|plan| plan.remove(id)) {
            Ok(node) => {
                info!(name = %node.name, "removed node");
                let parent = parent.filter(|p| *p != self.project.plan.root_id());
                self.ui.view.select(parent);
                self.ui.view.retain_existing(self.project.plan.root());
            }
            Err(err) => self.report(err),
        }
    }

    /// Inserts a copy of the selected subtree right after it.
    pub fn duplicate_selected(&mut self) {
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let Some((parent, index)) = self.position_of(id) else {
            return;
        };
        let Some(copy) = self.project.plan.node(id).map(PlanNode::duplicate) else {
            return;
        };
        match self
            .project
            .transact(|plan| plan.insert(parent, Some(index + 1), copy))
        {
            Ok(copy) => self.ui.view.select(Some(copy)),
            Err(err) => self.report(err),
        }
    }

    /// Puts a new controller where the selected node is and moves the node
    /// under it.
    pub fn wrap_selected(&mut self) {
        if !self.can_wrap_selected() {
            return;
        }
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let Some((parent, index)) = self.position_of(id) else {
            return;
        };
        let controller = PlanNode::new(ElementKind::Controller.label(), ElementKind::Controller);
        let result = self.project.transact(|plan| {
            let controller = plan.insert(parent, Some(index), controller)?;
            plan.move_node(id, controller, None)?;
            Ok(controller)
        });
        match result {
            Ok(controller) => {
                self.ui.view.expand(controller);
                self.ui.view.select(Some(controller));
            }
            Err(err) => self.report(err),
        }
    }

    /// Moves the selected node one place up or down among its siblings.
    pub fn shift_selected(&mut self, delta: isize) {
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let Some((parent, index)) = self.position_of(id) else {
            return;
        };
        let len = self
            .project
            .plan
            .node(parent)
            .map_or(0, |parent| parent.children.len());
        let Some(target) = index.checked_add_signed(delta).filter(|t| *t < len) else {
            return;
        };
        if let Err(err) = self
            .project
            .transact(|plan| plan.move_node(id, parent, Some(target)))
        {
            self.report(err);
        }
    }

    pub fn rename_selected(&mut self) {
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let name = self.ui.rename_buffer.trim().to_string();
        if name.is_empty() {
            return;
        }
        if let Err(err) = self.project.transact(|plan| plan.rename(id, name)) {
            self.report(err);
        }
    }

    pub fn set_selected_enabled(&mut self, enabled: bool) {
        if let Some(id) = self.ui.view.selected() {
            if let Err(err) = self.project.transact(|plan| plan.set_enabled(id, enabled)) {
                self.report(err);
            }
        }
    }

    pub fn set_selected_property(&mut self, key: &str, raw: &str) {
        let Some(id) = self.ui.view.selected() else {
            return;
        };
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        let value = PropertyValue::parse(raw);
        if let Err(err) = self
            .project
            .transact(|plan| plan.set_property(id, key, value))
        {
            self.report(err);
        }
    }

    pub fn remove_selected_property(&mut self, key: &str) {
        if let Some(id) = self.ui.view.selected() {
            if let Err(err) = self
                .project
                .transact(|plan| plan.remove_property(id, key))
            {
                self.report(err);
            }
        }
    }

    pub fn new_plan(&mut self) {
        self.project.new_plan();
        self.focus_first();
        self.ui.status = None;
    }

    pub fn load_plan(&mut self, nodes: Vec<PlanNode>) {
        let result = self.project.load_plan(nodes);
        self.focus_first();
        match result {
            Ok(()) => self.ui.status = None,
            Err(err) => self.report(err),
        }
    }

    /// Parent id and sibling index of `id`.
    fn position_of(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.project.plan.parent_of(id)?;
        let index = parent.children.iter().position(|c| c.id == id)?;
        Some((parent.id, index))
    }

    /// Fresh view state with the first top-level element expanded and
    /// selected.
    fn focus_first(&mut self) {
        self.ui.view = TreeViewState::default();
        if let Some(first) = self.project.plan.top_level().first() {
            self.ui.view.expand(first.id);
            self.ui.view.select(Some(first.id));
        }
    }

    fn report(&mut self, err: PlanError) {
        warn!(error = %err, "edit rejected");
        self.ui.status = Some(err.to_string());
    }
}
