use plan_state::{
    ElementKind, HistoryConfig, NodeId, PlanNode, PlanTree, PropertyValue, UndoHistory,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { parent: usize, name: String },
    Remove(usize),
    Rename(usize, String),
    SetProperty(usize, String, i64),
    Toggle(usize),
    Move { node: usize, parent: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), "[A-Z][a-z]{0,6}")
            .prop_map(|(parent, name)| Edit::Insert { parent, name }),
        any::<usize>().prop_map(Edit::Remove),
        (any::<usize>(), "[A-Z][a-z]{0,6}").prop_map(|(node, name)| Edit::Rename(node, name)),
        (any::<usize>(), "[a-c]", -5i64..5)
            .prop_map(|(node, key, value)| Edit::SetProperty(node, key, value)),
        any::<usize>().prop_map(Edit::Toggle),
        (any::<usize>(), any::<usize>()).prop_map(|(node, parent)| Edit::Move { node, parent }),
    ]
}

fn all_ids(tree: &PlanTree) -> Vec<NodeId> {
    fn walk(node: &PlanNode, out: &mut Vec<NodeId>) {
        out.push(node.id);
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut ids = Vec::new();
    for node in tree.top_level() {
        walk(node, &mut ids);
    }
    ids
}

/// Applies `edit`, ignoring rejected edits. The top-level plan is never
/// removed or moved so the document stays non-empty.
fn apply(tree: &mut PlanTree, edit: &Edit) {
    let ids = all_ids(tree);
    let pick = |index: usize| ids[index % ids.len()];
    let top: Vec<NodeId> = tree.top_level().iter().map(|n| n.id).collect();
    let is_top = |id: NodeId| top.contains(&id);
    match edit {
        Edit::Insert { parent, name } => {
            let _ = tree.insert(pick(*parent), None, PlanNode::new(name, ElementKind::Sampler));
        }
        Edit::Remove(node) => {
            let id = pick(*node);
            if !is_top(id) {
                let _ = tree.remove(id);
            }
        }
        Edit::Rename(node, name) => {
            let _ = tree.rename(pick(*node), name.as_str());
        }
        Edit::SetProperty(node, key, value) => {
            let _ = tree.set_property(pick(*node), key, PropertyValue::Int(*value));
        }
        Edit::Toggle(node) => {
            let id = pick(*node);
            let enabled = tree.node(id).is_some_and(|n| n.enabled);
            let _ = tree.set_enabled(id, !enabled);
        }
        Edit::Move { node, parent } => {
            let id = pick(*node);
            if !is_top(id) {
                let _ = tree.move_node(id, pick(*parent), None);
            }
        }
    }
}

fn content(tree: &PlanTree) -> Vec<PlanNode> {
    tree.top_level().iter().map(PlanNode::deep_copy).collect()
}

fn session() -> (PlanTree, UndoHistory) {
    let mut tree = PlanTree::with_test_plan("Test Plan");
    let mut history = UndoHistory::new(&HistoryConfig { history_size: 64 });
    history.attach(&mut tree);
    history.record(&tree, "Initial Tree");
    (tree, history)
}

proptest! {
    #[test]
    fn undoing_every_edit_restores_the_start(edits in prop::collection::vec(edit(), 0..24)) {
        let (mut tree, mut history) = session();
        let start = content(&tree);
        for edit in &edits {
            apply(&mut tree, edit);
        }

        let k = history.log().position().unwrap_or_default();
        for _ in 0..k {
            prop_assert!(history.undo(&mut tree, None).unwrap());
        }
        prop_assert_eq!(content(&tree), start);
        prop_assert!(!history.can_undo());
    }

    #[test]
    fn undo_then_redo_returns_to_the_same_document(
        edits in prop::collection::vec(edit(), 1..24),
        back in 1usize..8,
    ) {
        let (mut tree, mut history) = session();
        for edit in &edits {
            apply(&mut tree, edit);
        }
        let latest = content(&tree);
        let len = history.log().len();

        let steps = back.min(history.log().position().unwrap_or_default());
        for _ in 0..steps {
            history.undo(&mut tree, None).unwrap();
        }
        for _ in 0..steps {
            history.redo(&mut tree, None).unwrap();
        }
        prop_assert_eq!(content(&tree), latest);
        prop_assert_eq!(history.log().len(), len);
    }

    #[test]
    fn cursor_stays_in_bounds(
        capacity in 1usize..6,
        edits in prop::collection::vec(edit(), 0..24),
        moves in prop::collection::vec(-3isize..=3, 0..12),
    ) {
        let mut tree = PlanTree::with_test_plan("Test Plan");
        let mut history = UndoHistory::new(&HistoryConfig { history_size: capacity });
        history.attach(&mut tree);
        history.record(&tree, "Initial Tree");
        for edit in &edits {
            apply(&mut tree, edit);
        }
        for offset in moves {
            let before = history.log().position();
            let moved = history.move_in_history(offset, &mut tree, None).unwrap();
            if !moved {
                prop_assert_eq!(history.log().position(), before);
            }
            let log = history.log();
            prop_assert!(log.len() <= capacity);
            prop_assert!(log.position().is_some_and(|p| p < log.len()));
        }
    }
}
