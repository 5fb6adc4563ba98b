use std::collections::HashSet;

use crate::plan::{NodeId, PlanNode};

/// The parts of a tree view the undo history saves and restores around a
/// navigation step. Rows index the visible, flattened tree; the hidden
/// document root is not a row.
pub trait DocumentView {
    fn expanded_rows(&self, root: &PlanNode) -> Vec<usize>;

    fn selected_row(&self, root: &PlanNode) -> Option<usize>;

    fn expand_row(&mut self, root: &PlanNode, row: usize);

    fn select_row(&mut self, root: &PlanNode, row: Option<usize>);

    /// The document content was swapped out; any per-node state is stale.
    fn content_replaced(&mut self) {}

    /// The selected node may be a different element now; redraw its editor.
    fn refresh_editor(&mut self, _root: &PlanNode) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Expansion and selection state of the plan tree, independent of any
/// widget toolkit.
#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    expanded: HashSet<NodeId>,
    selected: Option<NodeId>,
    editor_revision: u64,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_rows(&self, root: &PlanNode) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        for child in &root.children {
            self.collect_rows(child, 0, &mut rows);
        }
        rows
    }

    fn collect_rows(&self, node: &PlanNode, depth: usize, rows: &mut Vec<VisibleRow>) {
        let expanded = self.expanded.contains(&node.id);
        rows.push(VisibleRow {
            id: node.id,
            depth,
            has_children: !node.children.is_empty(),
            expanded,
        });
        if expanded {
            for child in &node.children {
                self.collect_rows(child, depth + 1, rows);
            }
        }
    }

    fn row_of(&self, root: &PlanNode, id: NodeId) -> Option<usize> {
        self.visible_rows(root).iter().position(|row| row.id == id)
    }

    fn node_at(&self, root: &PlanNode, row: usize) -> Option<NodeId> {
        self.visible_rows(root).get(row).map(|row| row.id)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: NodeId) {
        self.expanded.insert(id);
    }

    pub fn toggle(&mut self, id: NodeId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Expands every ancestor of `id` so it becomes visible.
    pub fn reveal(&mut self, root: &PlanNode, id: NodeId) {
        let mut current = id;
        while let Some(parent) = root.find_parent(current) {
            if parent.id == root.id {
                break;
            }
            self.expanded.insert(parent.id);
            current = parent.id;
        }
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    /// Bumped whenever the editor for the selected node should be rebuilt.
    pub fn editor_revision(&self) -> u64 {
        self.editor_revision
    }

    /// Drops expansion and selection of nodes that no longer exist.
    pub fn retain_existing(&mut self, root: &PlanNode) {
        self.expanded.retain(|id| root.find(*id).is_some());
        if self.selected.is_some_and(|id| root.find(id).is_none()) {
            self.selected = None;
        }
    }
}

impl DocumentView for TreeViewState {
    fn expanded_rows(&self, root: &PlanNode) -> Vec<usize> {
        self.visible_rows(root)
            .iter()
            .enumerate()
            .filter(|(_, row)| row.expanded)
            .map(|(index, _)| index)
            .collect()
    }

    fn selected_row(&self, root: &PlanNode) -> Option<usize> {
        self.selected.and_then(|id| self.row_of(root, id))
    }

    fn expand_row(&mut self, root: &PlanNode, row: usize) {
        if let Some(id) = self.node_at(root, row) {
            self.expanded.insert(id);
        }
    }

    fn select_row(&mut self, root: &PlanNode, row: Option<usize>) {
        self.selected = row.and_then(|row| self.node_at(root, row));
    }

    fn content_replaced(&mut self) {
        self.expanded.clear();
        self.selected = None;
    }

    fn refresh_editor(&mut self, _root: &PlanNode) {
        self.editor_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ElementKind, PlanTree};

    fn sample() -> PlanTree {
        let mut tree = PlanTree::with_test_plan("Plan");
        let plan = tree.top_level()[0].id;
        let users = tree
            .insert(plan, None, PlanNode::new("Users", ElementKind::ThreadGroup))
            .unwrap();
        tree.insert(users, None, PlanNode::new("Home", ElementKind::Sampler))
            .unwrap();
        tree.insert(plan, None, PlanNode::new("Results", ElementKind::Listener))
            .unwrap();
        tree
    }

    #[test]
    fn rows_follow_expansion() {
        let tree = sample();
        let mut view = TreeViewState::new();
        assert_eq!(view.visible_rows(tree.root()).len(), 1);

        view.expand_row(tree.root(), 0);
        assert_eq!(view.visible_rows(tree.root()).len(), 3);

        view.expand_row(tree.root(), 1);
        let rows = view.visible_rows(tree.root());
        let depths: Vec<_> = rows.iter().map(|row| row.depth).collect();
        assert_eq!(depths, [0, 1, 2, 1]);
        assert_eq!(view.expanded_rows(tree.root()), [0, 1]);
    }

    #[test]
    fn selection_maps_to_rows() {
        let tree = sample();
        let mut view = TreeViewState::new();
        view.expand_row(tree.root(), 0);
        view.select_row(tree.root(), Some(2));
        assert_eq!(view.selected_row(tree.root()), Some(2));

        view.select_row(tree.root(), Some(9));
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn reveal_expands_ancestors() {
        let tree = sample();
        let home = tree.top_level()[0].children[0].children[0].id;
        let mut view = TreeViewState::new();
        view.reveal(tree.root(), home);
        view.select(Some(home));
        assert_eq!(view.selected_row(tree.root()), Some(2));
    }

    #[test]
    fn content_replaced_resets_state() {
        let tree = sample();
        let mut view = TreeViewState::new();
        view.expand_row(tree.root(), 0);
        view.select_row(tree.root(), Some(0));
        view.content_replaced();
        assert!(view.expanded_rows(tree.root()).is_empty());
        assert_eq!(view.selected(), None);
    }
}
