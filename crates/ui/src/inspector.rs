use plan_state::project::AppState;

use crate::theme;

pub fn inspector_panel(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Inspector");
    ui.separator();
    show_plan_summary(ui, state);
    ui.separator();

    let Some(node) = state.selected_node() else {
        state.ui.inspected = None;
        ui.colored_label(theme::TEXT_DIM, "Select an element in the plan");
        return;
    };

    let id = node.id;
    let name = node.name.clone();
    let kind = node.kind;
    let mut enabled = node.enabled;
    let properties: Vec<(String, String)> = node
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect();
    let child_count = node.children.len();

    // Refill the edit buffers when the selection or its content was
    // replaced underneath us (new selection, undo or redo).
    let key = (id, state.ui.view.editor_revision());
    if state.ui.inspected != Some(key) {
        state.ui.rename_buffer = name;
        state.ui.new_property_key.clear();
        state.ui.new_property_value.clear();
        state.ui.inspected = Some(key);
    }

    ui.label(egui::RichText::new(kind.label()).strong());
    ui.colored_label(theme::TEXT_DIM, format!("Children: {child_count}"));
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        let response = ui.text_edit_singleline(&mut state.ui.rename_buffer);
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Rename").clicked() || submitted {
            state.rename_selected();
        }
    });
    if ui.checkbox(&mut enabled, "Enabled").changed() {
        state.set_selected_enabled(enabled);
    }

    ui.separator();
    ui.label("Properties");
    if properties.is_empty() {
        ui.colored_label(theme::TEXT_DIM, "No properties");
    }
    let mut removed = None;
    egui::Grid::new("node_properties")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui| {
            for (key, value) in &properties {
                ui.label(key.as_str());
                ui.colored_label(theme::TEXT_DIM, value.as_str());
                if ui.small_button("x").on_hover_text("Remove").clicked() {
                    removed = Some(key.clone());
                }
                ui.end_row();
            }
        });
    if let Some(key) = removed {
        state.remove_selected_property(&key);
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.ui.new_property_key)
                .desired_width(80.0)
                .hint_text("key"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut state.ui.new_property_value)
                .desired_width(100.0)
                .hint_text("value"),
        );
        if ui.button("Set").clicked() {
            let key = std::mem::take(&mut state.ui.new_property_key);
            let value = std::mem::take(&mut state.ui.new_property_value);
            state.set_selected_property(&key, &value);
        }
    });
}

fn show_plan_summary(ui: &mut egui::Ui, state: &AppState) {
    ui.label("Plan");
    ui.colored_label(
        theme::TEXT_DIM,
        format!("Elements: {}", state.project.plan.node_count()),
    );
    let log = state.project.history.log();
    ui.colored_label(
        theme::TEXT_DIM,
        format!("History: {} of {} entries", log.len(), log.capacity()),
    );
}
