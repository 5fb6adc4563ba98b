use plan_state::project::AppState;
use plan_state::{HistoryStatus, UndoCommand};

use crate::constants;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    New,
    Load,
    Save,
    History(UndoCommand),
}

pub fn toolbar(ui: &mut egui::Ui, state: &mut AppState, status: HistoryStatus) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        if ui
            .add_sized(constants::TOOLBAR_BTN_SIZE, egui::Button::new("New"))
            .clicked()
        {
            action = ToolbarAction::New;
        }
        ui.add(
            egui::TextEdit::singleline(&mut state.ui.plan_path)
                .desired_width(constants::PATH_FIELD_WIDTH)
                .hint_text("plan.json"),
        );
        if ui
            .add_sized(constants::TOOLBAR_BTN_SIZE, egui::Button::new("Load"))
            .clicked()
        {
            action = ToolbarAction::Load;
        }
        if ui
            .add_sized(constants::TOOLBAR_BTN_SIZE, egui::Button::new("Save"))
            .clicked()
        {
            action = ToolbarAction::Save;
        }

        ui.separator();

        for (command, enabled, shortcut) in [
            (UndoCommand::Undo, status.can_undo, "Ctrl+Z"),
            (UndoCommand::Redo, status.can_redo, "Ctrl+Shift+Z"),
        ] {
            let button = egui::Button::new(command.label());
            if ui
                .add_enabled(enabled, button)
                .on_hover_text(shortcut)
                .clicked()
            {
                action = ToolbarAction::History(command);
            }
        }

        if ui
            .selectable_label(state.ui.show_history, "History")
            .clicked()
        {
            state.ui.show_history = !state.ui.show_history;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(message) = &state.ui.status {
                ui.colored_label(theme::ERROR_TEXT, message.as_str());
            } else if !state.project.history.is_enabled() {
                ui.colored_label(theme::TEXT_DIM, "Undo disabled (history size 0)");
            } else if let Some(position) = status.position {
                ui.colored_label(
                    theme::TEXT_DIM,
                    format!("History {}/{}", position + 1, status.len),
                );
            }
        });
    });

    action
}
