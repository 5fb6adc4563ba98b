use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::event::{TreeEvent, TreeModelListener};
use crate::history::HistoryLog;
use crate::plan::PlanTree;

/// Turns document mutations into history entries.
#[derive(Debug)]
pub struct ChangeObserver {
    log: Rc<RefCell<HistoryLog>>,
}

impl ChangeObserver {
    pub fn new(log: Rc<RefCell<HistoryLog>>) -> Self {
        Self { log }
    }

    fn record(&self, tree: &PlanTree, description: &str) {
        self.log.borrow_mut().add(tree, description);
    }
}

impl TreeModelListener for ChangeObserver {
    fn tree_nodes_changed(&mut self, tree: &PlanTree, event: &TreeEvent) {
        let name = event.subject_name();
        debug!(name, "nodes changed");
        self.record(tree, &format!("Node changed {name}"));
    }

    fn tree_nodes_inserted(&mut self, tree: &PlanTree, event: &TreeEvent) {
        let name = event.subject_name();
        debug!(name, "nodes inserted");
        self.record(tree, &format!("Add {name}"));
    }

    fn tree_nodes_removed(&mut self, tree: &PlanTree, event: &TreeEvent) {
        let name = event.subject_name();
        debug!(name, "nodes removed");
        self.record(tree, &format!("Remove {name}"));
    }

    fn tree_structure_changed(&mut self, tree: &PlanTree, _event: &TreeEvent) {
        debug!("node structure changed");
        self.record(tree, "Complex Change");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ElementKind, PlanNode, PropertyValue};
    use crate::snapshot::HistoryEntry;

    fn observed() -> (PlanTree, Rc<RefCell<HistoryLog>>) {
        let log = Rc::new(RefCell::new(HistoryLog::new(20)));
        let mut tree = PlanTree::with_test_plan("Plan");
        tree.add_listener(Rc::new(RefCell::new(ChangeObserver::new(log.clone()))));
        (tree, log)
    }

    #[test]
    fn describes_each_kind_of_edit() {
        let (mut tree, log) = observed();
        let plan = tree.top_level()[0].id;
        let users = tree
            .insert(plan, None, PlanNode::new("Users", ElementKind::ThreadGroup))
            .unwrap();
        tree.set_property(users, "threads", PropertyValue::Int(5))
            .unwrap();
        let home = tree
            .insert(users, None, PlanNode::new("Home", ElementKind::Sampler))
            .unwrap();
        tree.move_node(home, plan, None).unwrap();
        tree.remove(home).unwrap();

        let log = log.borrow();
        let descriptions: Vec<_> = log.entries().map(HistoryEntry::description).collect();
        assert_eq!(
            descriptions,
            [
                "Add Users",
                "Node changed Users",
                "Add Home",
                "Complex Change",
                "Remove Home",
            ]
        );
    }

    #[test]
    fn clearing_the_document_is_not_recorded() {
        let (mut tree, log) = observed();
        tree.clear();
        assert!(log.borrow().is_empty());
    }
}
