use egui::vec2;

pub const INDENT_WIDTH: f32 = 16.0;
pub const TOGGLE_SIZE: egui::Vec2 = vec2(18.0, 18.0);
pub const TREE_PANEL_WIDTH: f32 = 300.0;
pub const HISTORY_PANEL_WIDTH: f32 = 220.0;
pub const TOOLBAR_BTN_SIZE: egui::Vec2 = vec2(64.0, 24.0);
pub const PATH_FIELD_WIDTH: f32 = 220.0;
