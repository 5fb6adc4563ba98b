pub mod error;
pub mod keyboard;
pub mod logging;
pub mod persistence;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use plan_state::project::AppState;
use plan_state::{AppConfig, HistoryStatus};
use plan_ui::constants;
use plan_ui::toolbar::ToolbarAction;
use tracing::{info, warn};

use crate::error::AppError;
use crate::keyboard::handle_keyboard;

/// Reads the editor configuration from `path`; a missing file yields the
/// defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    Ok(AppConfig::load(path)?)
}

pub struct PlanEditorApp {
    state: AppState,
    history_status: Rc<Cell<HistoryStatus>>,
}

impl PlanEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, plan_path: Option<PathBuf>) -> Self {
        plan_ui::theme::apply_theme(&cc.egui_ctx);
        Self::with_config(config, plan_path)
    }

    /// Builds the editor without a window; `plan_path` is loaded when given.
    pub fn with_config(config: AppConfig, plan_path: Option<PathBuf>) -> Self {
        info!(history_size = config.undo.history_size, "starting plan editor");
        let mut state = AppState::new(&config.undo);

        let history_status = Rc::new(Cell::new(state.project.history.status()));
        let sink = history_status.clone();
        state
            .project
            .history
            .register_listener(move |status: HistoryStatus| sink.set(status));

        let mut app = Self {
            state,
            history_status,
        };
        if let Some(path) = plan_path {
            app.state.ui.plan_path = path.display().to_string();
            app.load(&path);
        }
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.history_status.get()
    }

    pub fn load(&mut self, path: &Path) {
        match persistence::load_plan(path) {
            Ok(nodes) => self.state.load_plan(nodes),
            Err(err) => self.report(err),
        }
    }

    pub fn save(&mut self, path: &Path) {
        match persistence::save_plan(path, &self.state.project.plan) {
            Ok(()) => self.state.ui.status = None,
            Err(err) => self.report(err),
        }
    }

    fn apply(&mut self, action: ToolbarAction) {
        let path = PathBuf::from(self.state.ui.plan_path.trim());
        match action {
            ToolbarAction::None => {}
            ToolbarAction::New => self.state.new_plan(),
            ToolbarAction::Load => self.load(&path),
            ToolbarAction::Save => self.save(&path),
            ToolbarAction::History(command) => self.state.run(command),
        }
    }

    fn report(&mut self, err: AppError) {
        warn!(error = %err, "plan file operation failed");
        self.state.ui.status = Some(err.to_string());
    }
}

impl eframe::App for PlanEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        handle_keyboard(ctx, &mut self.state);

        let status = self.history_status.get();
        let mut action = ToolbarAction::None;
        egui::TopBottomPanel::top("toolbar")
            .exact_height(34.0)
            .show(ctx, |ui| {
                action = plan_ui::toolbar::toolbar(ui, &mut self.state, status);
            });
        self.apply(action);

        egui::SidePanel::left("plan_tree")
            .width_range(180.0..=800.0)
            .default_width(constants::TREE_PANEL_WIDTH)
            .show(ctx, |ui| {
                plan_ui::tree_view::tree_panel(ui, &mut self.state);
            });

        if self.state.ui.show_history {
            egui::SidePanel::right("history")
                .width_range(140.0..=600.0)
                .default_width(constants::HISTORY_PANEL_WIDTH)
                .show(ctx, |ui| {
                    plan_ui::history_panel::history_panel(ui, &mut self.state);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            plan_ui::inspector::inspector_panel(ui, &mut self.state);
        });
    }
}
