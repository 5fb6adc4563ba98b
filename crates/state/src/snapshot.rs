use crate::plan::PlanNode;

/// Frozen copy of a document's top-level elements.
///
/// Built with [`PlanNode::deep_copy`], so nothing is shared with the live
/// document and later edits to it never show through.
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    nodes: Vec<PlanNode>,
}

impl Snapshot {
    pub fn capture(root: &PlanNode) -> Self {
        Self {
            nodes: root.children.iter().map(PlanNode::deep_copy).collect(),
        }
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(PlanNode::subtree_len).sum()
    }

    /// Fresh copy of the stored nodes, ready to be loaded into a document.
    pub fn materialize(&self) -> Vec<PlanNode> {
        self.nodes.iter().map(PlanNode::deep_copy).collect()
    }
}

#[derive(Debug)]
pub struct HistoryEntry {
    snapshot: Snapshot,
    description: String,
}

impl HistoryEntry {
    pub fn new(snapshot: Snapshot, description: impl Into<String>) -> Self {
        Self {
            snapshot,
            description: description.into(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ElementKind, PlanTree, PropertyValue};

    #[test]
    fn later_edits_do_not_leak_into_snapshot() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let plan = tree.top_level()[0].id;
        tree.set_property(plan, "threads", PropertyValue::Int(1))
            .unwrap();
        let snapshot = Snapshot::capture(tree.root());

        tree.set_property(plan, "threads", PropertyValue::Int(50))
            .unwrap();
        tree.insert(plan, None, PlanNode::new("Users", ElementKind::ThreadGroup))
            .unwrap();

        assert_eq!(snapshot.node_count(), 1);
        assert_eq!(
            snapshot.nodes()[0].properties.get("threads"),
            Some(&PropertyValue::Int(1))
        );
    }

    #[test]
    fn materialize_yields_equal_independent_nodes() {
        let tree = PlanTree::with_test_plan("Plan");
        let snapshot = Snapshot::capture(tree.root());
        let mut nodes = snapshot.materialize();
        assert_eq!(nodes.as_slice(), snapshot.nodes());

        nodes[0].name = "Other".into();
        assert_eq!(snapshot.nodes()[0].name, "Plan");
    }
}
