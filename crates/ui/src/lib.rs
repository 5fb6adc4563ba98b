pub mod constants;
pub mod history_panel;
pub mod inspector;
pub mod theme;
pub mod toolbar;
pub mod tree_view;
