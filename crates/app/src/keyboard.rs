use plan_state::project::AppState;

pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Text fields keep their own undo and delete handling.
    if ctx.wants_keyboard_input() {
        return;
    }
    ctx.input(|i| {
        if i.key_pressed(egui::Key::Delete) && state.can_remove_selected() {
            state.remove_selected();
        }
        if i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z) {
            state.undo();
        }
        if i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z) {
            state.redo();
        }
    });
}
