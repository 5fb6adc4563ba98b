use plan_state::project::AppState;
use plan_state::ElementKind;

use crate::constants;
use crate::theme;

enum RowClick {
    Toggle(plan_state::NodeId),
    Select(plan_state::NodeId),
}

pub fn tree_panel(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Test Plan");
    ui.separator();

    edit_controls(ui, state);
    ui.separator();

    let rows = state.ui.view.visible_rows(state.project.plan.root());
    if rows.is_empty() {
        ui.colored_label(theme::TEXT_DIM, "Empty plan. Press New to start.");
        return;
    }

    let selected = state.ui.view.selected();
    let mut click = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for row in &rows {
                let Some(node) = state.project.plan.node(row.id) else {
                    continue;
                };
                ui.horizontal(|ui| {
                    ui.add_space(row.depth as f32 * constants::INDENT_WIDTH);
                    if row.has_children {
                        let arrow = if row.expanded { "\u{25BE}" } else { "\u{25B8}" };
                        if ui
                            .add_sized(constants::TOGGLE_SIZE, egui::Button::new(arrow).frame(false))
                            .clicked()
                        {
                            click = Some(RowClick::Toggle(row.id));
                        }
                    } else {
                        ui.add_space(constants::TOGGLE_SIZE.x);
                    }

                    let mut text = egui::RichText::new(&node.name);
                    if !node.enabled {
                        text = text.color(theme::NODE_DISABLED).italics();
                    }
                    if ui
                        .selectable_label(selected == Some(row.id), text)
                        .clicked()
                    {
                        click = Some(RowClick::Select(row.id));
                    }
                    ui.colored_label(theme::kind_color(node.kind), node.kind.label());
                });
            }
        });

    match click {
        Some(RowClick::Toggle(id)) => state.ui.view.toggle(id),
        Some(RowClick::Select(id)) => state.ui.view.select(Some(id)),
        None => {}
    }
}

fn edit_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("new_node_kind")
            .selected_text(state.ui.new_node_kind.label())
            .show_ui(ui, |ui| {
                for &kind in ElementKind::ALL {
                    ui.selectable_value(&mut state.ui.new_node_kind, kind, kind.label());
                }
            });
        ui.add(
            egui::TextEdit::singleline(&mut state.ui.new_node_name)
                .desired_width(120.0)
                .hint_text("Name"),
        );
    });

    let has_selection = state.ui.view.selected().is_some();
    ui.horizontal(|ui| {
        if ui.button("Add").on_hover_text("Add under the selection").clicked() {
            let parent = state
                .ui
                .view
                .selected()
                .unwrap_or_else(|| state.project.plan.root_id());
            let name = std::mem::take(&mut state.ui.new_node_name);
            let kind = state.ui.new_node_kind;
            state.add_child(parent, &name, kind);
        }
        if ui
            .add_enabled(state.can_remove_selected(), egui::Button::new("Remove"))
            .on_hover_text("Delete")
            .clicked()
        {
            state.remove_selected();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Duplicate"))
            .clicked()
        {
            state.duplicate_selected();
        }
        if ui
            .add_enabled(state.can_wrap_selected(), egui::Button::new("Wrap"))
            .on_hover_text("Move into a new controller")
            .clicked()
        {
            state.wrap_selected();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("\u{2191}"))
            .on_hover_text("Move up")
            .clicked()
        {
            state.shift_selected(-1);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("\u{2193}"))
            .on_hover_text("Move down")
            .clicked()
        {
            state.shift_selected(1);
        }
    });
}
