//! Mutation notifications emitted by [`PlanTree`].

use crate::plan::{NodeId, PlanTree};

/// Identity of a node at the time an event was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    NodesChanged {
        node: NodeRef,
    },
    NodesInserted {
        parent: NodeRef,
        children: Vec<NodeRef>,
    },
    NodesRemoved {
        parent: NodeRef,
        children: Vec<NodeRef>,
    },
    /// A bulk edit that is not described node by node (moves, clears).
    StructureChanged {
        node: NodeRef,
    },
}

impl TreeEvent {
    /// Name of the node the edit is about: the changed node, or the first
    /// inserted/removed child.
    pub fn subject_name(&self) -> &str {
        match self {
            TreeEvent::NodesChanged { node } | TreeEvent::StructureChanged { node } => &node.name,
            TreeEvent::NodesInserted { parent, children }
            | TreeEvent::NodesRemoved { parent, children } => children
                .first()
                .map(|child| child.name.as_str())
                .unwrap_or(parent.name.as_str()),
        }
    }
}

/// Receives the four categories of document mutation. Every method
/// defaults to doing nothing.
pub trait TreeModelListener {
    fn tree_nodes_changed(&mut self, _tree: &PlanTree, _event: &TreeEvent) {}

    fn tree_nodes_inserted(&mut self, _tree: &PlanTree, _event: &TreeEvent) {}

    fn tree_nodes_removed(&mut self, _tree: &PlanTree, _event: &TreeEvent) {}

    fn tree_structure_changed(&mut self, _tree: &PlanTree, _event: &TreeEvent) {}
}

pub(crate) fn dispatch(listener: &mut dyn TreeModelListener, tree: &PlanTree, event: &TreeEvent) {
    match event {
        TreeEvent::NodesChanged { .. } => listener.tree_nodes_changed(tree, event),
        TreeEvent::NodesInserted { .. } => listener.tree_nodes_inserted(tree, event),
        TreeEvent::NodesRemoved { .. } => listener.tree_nodes_removed(tree, event),
        TreeEvent::StructureChanged { .. } => listener.tree_structure_changed(tree, event),
    }
}
