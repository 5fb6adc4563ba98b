use crate::error::PlanError;
use crate::plan::{ListenerId, NodeId, PlanNode, PlanTree, SharedListener};

/// What the undo history needs from the document it records: read access
/// to the root, listener registration and wholesale content replacement.
pub trait PlanDocument {
    fn root(&self) -> &PlanNode;

    fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    fn add_listener(&mut self, listener: SharedListener) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId) -> Option<SharedListener>;

    fn clear(&mut self);

    fn add_subtree(&mut self, parent: NodeId, nodes: Vec<PlanNode>) -> Result<(), PlanError>;
}

impl PlanDocument for PlanTree {
    fn root(&self) -> &PlanNode {
        PlanTree::root(self)
    }

    fn is_empty(&self) -> bool {
        PlanTree::is_empty(self)
    }

    fn add_listener(&mut self, listener: SharedListener) -> ListenerId {
        PlanTree::add_listener(self, listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> Option<SharedListener> {
        PlanTree::remove_listener(self, id)
    }

    fn clear(&mut self) {
        PlanTree::clear(self)
    }

    fn add_subtree(&mut self, parent: NodeId, nodes: Vec<PlanNode>) -> Result<(), PlanError> {
        PlanTree::add_subtree(self, parent, nodes)
    }
}
