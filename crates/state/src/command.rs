use crate::document::PlanDocument;
use crate::error::HistoryError;
use crate::undo::UndoHistory;
use crate::view::DocumentView;

/// A user-level history action, independent of how it was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoCommand {
    Undo,
    Redo,
}

impl UndoCommand {
    pub fn label(self) -> &'static str {
        match self {
            UndoCommand::Undo => "Undo",
            UndoCommand::Redo => "Redo",
        }
    }

    pub fn offset(self) -> isize {
        match self {
            UndoCommand::Undo => -1,
            UndoCommand::Redo => 1,
        }
    }

    pub fn invert(self) -> Self {
        match self {
            UndoCommand::Undo => UndoCommand::Redo,
            UndoCommand::Redo => UndoCommand::Undo,
        }
    }

    pub fn is_available(self, history: &UndoHistory) -> bool {
        match self {
            UndoCommand::Undo => history.can_undo(),
            UndoCommand::Redo => history.can_redo(),
        }
    }

    pub fn apply<D: PlanDocument + ?Sized>(
        self,
        history: &mut UndoHistory,
        document: &mut D,
        view: Option<&mut dyn DocumentView>,
    ) -> Result<bool, HistoryError> {
        history.move_in_history(self.offset(), document, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::plan::PlanTree;

    #[test]
    fn invert_round_trips() {
        for command in [UndoCommand::Undo, UndoCommand::Redo] {
            assert_eq!(command.invert().invert(), command);
            assert_eq!(command.invert().offset(), -command.offset());
        }
    }

    #[test]
    fn apply_then_invert_restores_document() {
        let mut tree = PlanTree::with_test_plan("Plan");
        let mut history = UndoHistory::new(&HistoryConfig { history_size: 10 });
        history.attach(&mut tree);
        history.record(&tree, "Initial Tree");
        tree.rename(tree.top_level()[0].id, "Load Plan").unwrap();

        assert!(!UndoCommand::Redo.is_available(&history));
        assert!(UndoCommand::Undo.apply(&mut history, &mut tree, None).unwrap());
        assert_eq!(tree.top_level()[0].name, "Plan");

        let redo = UndoCommand::Undo.invert();
        assert!(redo.is_available(&history));
        assert!(redo.apply(&mut history, &mut tree, None).unwrap());
        assert_eq!(tree.top_level()[0].name, "Load Plan");
    }
}
