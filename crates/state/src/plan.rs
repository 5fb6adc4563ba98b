use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlanError;
use crate::event::{self, NodeRef, TreeEvent, TreeModelListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    TestPlan,
    ThreadGroup,
    Controller,
    Sampler,
    ConfigElement,
    Timer,
    PreProcessor,
    PostProcessor,
    Assertion,
    Listener,
}

impl ElementKind {
    pub const ALL: &'static [ElementKind] = &[
        ElementKind::TestPlan,
        ElementKind::ThreadGroup,
        ElementKind::Controller,
        ElementKind::Sampler,
        ElementKind::ConfigElement,
        ElementKind::Timer,
        ElementKind::PreProcessor,
        ElementKind::PostProcessor,
        ElementKind::Assertion,
        ElementKind::Listener,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::TestPlan => "Test Plan",
            ElementKind::ThreadGroup => "Thread Group",
            ElementKind::Controller => "Logic Controller",
            ElementKind::Sampler => "Sampler",
            ElementKind::ConfigElement => "Config Element",
            ElementKind::Timer => "Timer",
            ElementKind::PreProcessor => "Pre Processor",
            ElementKind::PostProcessor => "Post Processor",
            ElementKind::Assertion => "Assertion",
            ElementKind::Listener => "Listener",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Parses user input: `true`/`false`, then integers, then plain text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return PropertyValue::Bool(true),
            "false" => return PropertyValue::Bool(false),
            _ => {}
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return PropertyValue::Int(value);
        }
        PropertyValue::Text(raw.to_string())
    }

    fn deep_copy(&self) -> Self {
        match self {
            PropertyValue::Text(text) => PropertyValue::Text(text.as_str().to_owned()),
            PropertyValue::Int(value) => PropertyValue::Int(*value),
            PropertyValue::Bool(value) => PropertyValue::Bool(*value),
            PropertyValue::List(items) => {
                PropertyValue::List(items.iter().map(PropertyValue::deep_copy).collect())
            }
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// One element of a test plan together with its subtree.
///
/// Nodes are deliberately not `Clone`: the only way to duplicate one is
/// [`PlanNode::deep_copy`], which rebuilds every node and property value.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: NodeId,
    pub name: String,
    pub kind: ElementKind,
    pub enabled: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            enabled: true,
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    /// Produces a structurally equal, fully independent copy of this subtree.
    /// Node ids are preserved.
    pub fn deep_copy(&self) -> PlanNode {
        PlanNode {
            id: self.id,
            name: self.name.as_str().to_owned(),
            kind: self.kind,
            enabled: self.enabled,
            properties: self
                .properties
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), value.deep_copy()))
                .collect(),
            children: self.children.iter().map(PlanNode::deep_copy).collect(),
        }
    }

    /// Deep copy with fresh ids throughout, for placing next to the
    /// original in the same document.
    pub fn duplicate(&self) -> PlanNode {
        let mut copy = self.deep_copy();
        copy.reassign_ids();
        copy
    }

    fn reassign_ids(&mut self) {
        self.id = NodeId::new();
        for child in &mut self.children {
            child.reassign_ids();
        }
    }

    /// Hash over the element's own content (kind, name, enabled flag and
    /// properties), ignoring children.
    pub fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind.hash(&mut hasher);
        self.name.hash(&mut hasher);
        self.enabled.hash(&mut hasher);
        self.properties.hash(&mut hasher);
        hasher.finish()
    }

    pub fn find(&self, id: NodeId) -> Option<&PlanNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut PlanNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    pub fn find_parent(&self, id: NodeId) -> Option<&PlanNode> {
        if self.children.iter().any(|child| child.id == id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_parent(id))
    }

    fn find_parent_mut(&mut self, id: NodeId) -> Option<&mut PlanNode> {
        if self.children.iter().any(|child| child.id == id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_parent_mut(id))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(PlanNode::subtree_len)
            .sum::<usize>()
    }

    fn node_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type SharedListener = Rc<RefCell<dyn TreeModelListener>>;

/// The live, mutable test-plan document.
///
/// The root node is a hidden container; its children are the top-level
/// plan elements. Every structural edit notifies the registered
/// [`TreeModelListener`]s synchronously once the edit has been applied.
pub struct PlanTree {
    root: PlanNode,
    listeners: Vec<(ListenerId, SharedListener)>,
    next_listener: u64,
}

impl Default for PlanTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanTree")
            .field("root", &self.root)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PlanTree {
    pub const ROOT_NAME: &'static str = "Root";

    pub fn new() -> Self {
        Self {
            root: PlanNode::new(Self::ROOT_NAME, ElementKind::TestPlan),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn with_test_plan(name: impl Into<String>) -> Self {
        let mut tree = Self::new();
        tree.root
            .children
            .push(PlanNode::new(name, ElementKind::TestPlan));
        tree
    }

    pub fn root(&self) -> &PlanNode {
        &self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    pub fn top_level(&self) -> &[PlanNode] {
        &self.root.children
    }

    /// A document with no top-level elements.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of nodes below the hidden root.
    pub fn node_count(&self) -> usize {
        self.root.subtree_len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<&PlanNode> {
        self.root.find(id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&PlanNode> {
        self.root.find_parent(id)
    }

    pub fn add_listener(&mut self, listener: SharedListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Option<SharedListener> {
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(index).1)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Inserts `node` below `parent`, at `index` or at the end.
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        node: PlanNode,
    ) -> Result<NodeId, PlanError> {
        let parent_node = self
            .root
            .find_mut(parent)
            .ok_or(PlanError::NodeNotFound(parent))?;
        let len = parent_node.children.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(PlanError::IndexOutOfBounds { index, len });
        }

        let id = node.id;
        let child = node.node_ref();
        parent_node.children.insert(index, node);
        let event = TreeEvent::NodesInserted {
            parent: parent_node.node_ref(),
            children: vec![child],
        };
        self.notify(&event);
        Ok(id)
    }

    /// Inserts every node of `nodes` at the end of `parent`, one
    /// notification per node.
    pub fn add_subtree(&mut self, parent: NodeId, nodes: Vec<PlanNode>) -> Result<(), PlanError> {
        if self.root.find(parent).is_none() {
            return Err(PlanError::NodeNotFound(parent));
        }
        for node in nodes {
            self.insert(parent, None, node)?;
        }
        Ok(())
    }

    /// Whether `remove(id)` would succeed. The document keeps at least one
    /// top-level element once it has one.
    pub fn can_remove(&self, id: NodeId) -> bool {
        id != self.root.id
            && self.root.find(id).is_some()
            && !(self.root.children.len() == 1 && self.root.children[0].id == id)
    }

    pub fn remove(&mut self, id: NodeId) -> Result<PlanNode, PlanError> {
        if id == self.root.id {
            return Err(PlanError::RootImmutable);
        }
        if self.root.children.len() == 1 && self.root.children[0].id == id {
            return Err(PlanError::LastTopLevel(id));
        }
        let parent = self
            .root
            .find_parent_mut(id)
            .ok_or(PlanError::NodeNotFound(id))?;
        let index = parent
            .children
            .iter()
            .position(|child| child.id == id)
            .ok_or(PlanError::NodeNotFound(id))?;
        let removed = parent.children.remove(index);
        let event = TreeEvent::NodesRemoved {
            parent: parent.node_ref(),
            children: vec![removed.node_ref()],
        };
        self.notify(&event);
        Ok(removed)
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), PlanError> {
        let name = name.into();
        self.edit_node(id, |node| node.name = name)
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<(), PlanError> {
        self.edit_node(id, |node| node.enabled = enabled)
    }

    pub fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: PropertyValue,
    ) -> Result<(), PlanError> {
        let key = key.into();
        self.edit_node(id, |node| {
            node.properties.insert(key, value);
        })
    }

    pub fn remove_property(&mut self, id: NodeId, key: &str) -> Result<(), PlanError> {
        self.edit_node(id, |node| {
            node.properties.remove(key);
        })
    }

    /// Applies `edit` to a node and signals a change only if the element's
    /// checksum moved.
    fn edit_node(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut PlanNode),
    ) -> Result<(), PlanError> {
        let node = self.root.find_mut(id).ok_or(PlanError::NodeNotFound(id))?;
        let before = node.checksum();
        edit(node);
        if node.checksum() == before {
            return Ok(());
        }
        let event = TreeEvent::NodesChanged {
            node: node.node_ref(),
        };
        self.notify(&event);
        Ok(())
    }

    /// Moves a node below `new_parent`. Reported as a single structural
    /// change rather than a remove/insert pair.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
    ) -> Result<(), PlanError> {
        if id == self.root.id {
            return Err(PlanError::RootImmutable);
        }
        let moving = self.root.find(id).ok_or(PlanError::NodeNotFound(id))?;
        if moving.find(new_parent).is_some() {
            return Err(PlanError::MoveIntoDescendant(id));
        }
        let target = self
            .root
            .find(new_parent)
            .ok_or(PlanError::NodeNotFound(new_parent))?;
        // Length of the target once the node has been detached from it.
        let len = if target.children.iter().any(|child| child.id == id) {
            target.children.len() - 1
        } else {
            target.children.len()
        };
        let index = index.unwrap_or(len);
        if index > len {
            return Err(PlanError::IndexOutOfBounds { index, len });
        }

        let old_parent = self
            .root
            .find_parent_mut(id)
            .ok_or(PlanError::NodeNotFound(id))?;
        let old_index = old_parent
            .children
            .iter()
            .position(|child| child.id == id)
            .ok_or(PlanError::NodeNotFound(id))?;
        let node = old_parent.children.remove(old_index);

        let target = self
            .root
            .find_mut(new_parent)
            .ok_or(PlanError::NodeNotFound(new_parent))?;
        target.children.insert(index, node);

        let event = TreeEvent::StructureChanged {
            node: self.root.node_ref(),
        };
        self.notify(&event);
        Ok(())
    }

    /// Removes every top-level element.
    pub fn clear(&mut self) {
        self.root.children.clear();
        let event = TreeEvent::StructureChanged {
            node: self.root.node_ref(),
        };
        self.notify(&event);
    }

    fn notify(&self, event: &TreeEvent) {
        for (_, listener) in &self.listeners {
            event::dispatch(&mut *listener.borrow_mut(), self, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<TreeEvent>,
    }

    impl TreeModelListener for Recorder {
        fn tree_nodes_changed(&mut self, _tree: &PlanTree, event: &TreeEvent) {
            self.events.push(event.clone());
        }
        fn tree_nodes_inserted(&mut self, _tree: &PlanTree, event: &TreeEvent) {
            self.events.push(event.clone());
        }
        fn tree_nodes_removed(&mut self, _tree: &PlanTree, event: &TreeEvent) {
            self.events.push(event.clone());
        }
        fn tree_structure_changed(&mut self, _tree: &PlanTree, event: &TreeEvent) {
            self.events.push(event.clone());
        }
    }

    fn recorded_tree() -> (PlanTree, Rc<RefCell<Recorder>>) {
        let mut tree = PlanTree::with_test_plan("Plan");
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        tree.add_listener(recorder.clone());
        (tree, recorder)
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = PlanNode::new("Users", ElementKind::ThreadGroup)
            .with_property("threads", PropertyValue::Int(10))
            .with_child(PlanNode::new("Home", ElementKind::Sampler));
        let mut copy = original.deep_copy();
        assert_eq!(copy, original);

        copy.name.push_str(" (edited)");
        copy.children[0]
            .properties
            .insert("path".into(), PropertyValue::Text("/".into()));
        assert_ne!(copy, original);
        assert!(original.children[0].properties.is_empty());
    }

    #[test]
    fn duplicate_gets_fresh_ids() {
        let original = PlanNode::new("Users", ElementKind::ThreadGroup)
            .with_property("threads", PropertyValue::Int(10))
            .with_child(PlanNode::new("Home", ElementKind::Sampler));
        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_ne!(copy.children[0].id, original.children[0].id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.properties, original.properties);
        assert_eq!(copy.checksum(), original.checksum());
    }

    #[test]
    fn insert_and_remove_notify_listeners() {
        let (mut tree, recorder) = recorded_tree();
        let plan = tree.top_level()[0].id;
        let group = tree
            .insert(plan, None, PlanNode::new("Users", ElementKind::ThreadGroup))
            .unwrap();
        tree.remove(group).unwrap();

        let events = &recorder.borrow().events;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], TreeEvent::NodesInserted { children, .. } if children[0].name == "Users"));
        assert!(matches!(&events[1], TreeEvent::NodesRemoved { parent, .. } if parent.id == plan));
    }

    #[test]
    fn unchanged_edits_are_silent() {
        let (mut tree, recorder) = recorded_tree();
        let plan = tree.top_level()[0].id;
        tree.rename(plan, "Plan").unwrap();
        tree.set_enabled(plan, true).unwrap();
        tree.remove_property(plan, "missing").unwrap();
        assert!(recorder.borrow().events.is_empty());

        tree.set_property(plan, "comment", PropertyValue::Text("x".into()))
            .unwrap();
        tree.set_property(plan, "comment", PropertyValue::Text("x".into()))
            .unwrap();
        assert_eq!(recorder.borrow().events.len(), 1);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let root = tree.root_id();
        assert_eq!(tree.remove(root), Err(PlanError::RootImmutable));
    }

    #[test]
    fn last_top_level_element_is_kept() {
        let (mut tree, recorder) = recorded_tree();
        let plan = tree.top_level()[0].id;
        assert!(!tree.can_remove(plan));
        assert_eq!(tree.remove(plan), Err(PlanError::LastTopLevel(plan)));
        assert_eq!(tree.top_level().len(), 1);
        assert!(recorder.borrow().events.is_empty());

        let second = tree
            .insert(tree.root_id(), None, PlanNode::new("Second", ElementKind::TestPlan))
            .unwrap();
        assert!(tree.can_remove(plan));
        tree.remove(plan).unwrap();
        assert!(!tree.can_remove(second));
    }

    #[test]
    fn insert_rejects_bad_index() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let plan = tree.top_level()[0].id;
        let err = tree
            .insert(plan, Some(3), PlanNode::new("x", ElementKind::Timer))
            .unwrap_err();
        assert_eq!(err, PlanError::IndexOutOfBounds { index: 3, len: 0 });
    }

    #[test]
    fn move_node_reports_structure_change() {
        let (mut tree, recorder) = recorded_tree();
        let plan = tree.top_level()[0].id;
        let a = tree
            .insert(plan, None, PlanNode::new("A", ElementKind::ThreadGroup))
            .unwrap();
        let b = tree
            .insert(plan, None, PlanNode::new("B", ElementKind::ThreadGroup))
            .unwrap();
        recorder.borrow_mut().events.clear();

        tree.move_node(b, a, None).unwrap();
        assert_eq!(tree.parent_of(b).map(|p| p.id), Some(a));
        assert!(matches!(
            recorder.borrow().events.as_slice(),
            [TreeEvent::StructureChanged { .. }]
        ));
    }

    #[test]
    fn move_into_own_subtree_is_rejected() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let plan = tree.top_level()[0].id;
        let a = tree
            .insert(plan, None, PlanNode::new("A", ElementKind::Controller))
            .unwrap();
        let b = tree
            .insert(a, None, PlanNode::new("B", ElementKind::Controller))
            .unwrap();
        assert_eq!(tree.move_node(a, b, None), Err(PlanError::MoveIntoDescendant(a)));
        assert_eq!(tree.parent_of(b).map(|p| p.id), Some(a));
    }

    #[test]
    fn removed_listener_is_not_notified() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = tree.add_listener(recorder.clone());
        assert!(tree.remove_listener(id).is_some());
        tree.clear();
        assert!(recorder.borrow().events.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn property_values_parse_from_input() {
        assert_eq!(PropertyValue::parse("true"), PropertyValue::Bool(true));
        assert_eq!(PropertyValue::parse(" 42 "), PropertyValue::Int(42));
        assert_eq!(
            PropertyValue::parse("/index.html"),
            PropertyValue::Text("/index.html".into())
        );
    }
}
