use std::path::{Path, PathBuf};

use plan_state::config::DEFAULT_CONFIG_FILE;
use plan_state::AppConfig;

fn main() -> eframe::Result {
    plan_app::logging::init_logging();

    let config = plan_app::load_config(Path::new(DEFAULT_CONFIG_FILE)).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default config");
        AppConfig::default()
    });
    let plan_path = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Plan Editor"),
        vsync: true,
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Plan Editor",
        options,
        Box::new(move |cc| Ok(Box::new(plan_app::PlanEditorApp::new(cc, config, plan_path)))),
    )
}
