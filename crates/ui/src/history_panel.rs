use plan_state::project::AppState;

use crate::theme;

/// Lists the recorded entries, oldest first. Clicking an entry navigates to
/// it; entries past the cursor are the redo branch and are dimmed.
pub fn history_panel(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("History");
    ui.separator();

    let (entries, position) = {
        let log = state.project.history.log();
        if !log.is_enabled() {
            ui.colored_label(theme::TEXT_DIM, "Undo history is disabled");
            return;
        }
        let entries: Vec<(String, usize)> = log
            .entries()
            .map(|entry| (entry.description().to_string(), entry.snapshot().node_count()))
            .collect();
        (entries, log.position())
    };

    if entries.is_empty() {
        ui.colored_label(theme::TEXT_DIM, "Nothing recorded yet");
        return;
    }

    let mut target = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for (index, (description, nodes)) in entries.iter().enumerate() {
                let current = position == Some(index);
                let mut text = egui::RichText::new(format!("{}. {description}", index + 1));
                if position.is_some_and(|p| index > p) {
                    text = text.color(theme::FUTURE_ENTRY);
                }
                let response = ui
                    .selectable_label(current, text)
                    .on_hover_text(format!("{nodes} elements"));
                if response.clicked() && !current {
                    target = Some(index);
                }
            }
        });

    if let Some(index) = target {
        state.jump_to(index);
    }
}
