use egui::{Color32, CornerRadius, Stroke, Style, Visuals};
use plan_state::ElementKind;

pub const SLATE_900: Color32 = Color32::from_rgb(24, 28, 32);
pub const SLATE_800: Color32 = Color32::from_rgb(32, 38, 44);
pub const SLATE_700: Color32 = Color32::from_rgb(46, 54, 62);
pub const SLATE_600: Color32 = Color32::from_rgb(62, 72, 82);
pub const TEAL: Color32 = Color32::from_rgb(38, 166, 154);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(220, 226, 230);
pub const TEXT_DIM: Color32 = Color32::from_rgb(134, 146, 156);
pub const NODE_DISABLED: Color32 = Color32::from_rgb(98, 106, 114);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(239, 108, 84);
/// Redo-side entries of the history list.
pub const FUTURE_ENTRY: Color32 = Color32::from_rgb(112, 128, 140);

pub const ROUNDING: CornerRadius = CornerRadius::same(2);

/// Tint for the element kind shown next to each tree row.
pub fn kind_color(kind: ElementKind) -> Color32 {
    match kind {
        ElementKind::TestPlan => TEXT_PRIMARY,
        ElementKind::ThreadGroup => Color32::from_rgb(121, 180, 232),
        ElementKind::Controller => Color32::from_rgb(186, 160, 226),
        ElementKind::Sampler => TEAL,
        ElementKind::Assertion => Color32::from_rgb(230, 190, 98),
        ElementKind::Listener => Color32::from_rgb(150, 200, 120),
        ElementKind::ConfigElement
        | ElementKind::Timer
        | ElementKind::PreProcessor
        | ElementKind::PostProcessor => TEXT_DIM,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = SLATE_800;
    visuals.window_fill = SLATE_900;
    visuals.extreme_bg_color = SLATE_900;
    visuals.faint_bg_color = SLATE_700;
    visuals.striped = true;

    let widgets = &mut visuals.widgets;
    for (state, fill, text) in [
        (&mut widgets.noninteractive, SLATE_800, TEXT_DIM),
        (&mut widgets.inactive, SLATE_700, TEXT_PRIMARY),
        (&mut widgets.hovered, SLATE_600, Color32::WHITE),
        (&mut widgets.active, TEAL, SLATE_900),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.fg_stroke = Stroke::new(1.0, text);
        state.corner_radius = ROUNDING;
    }

    visuals.selection.bg_fill = TEAL.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, TEAL);

    let mut style = Style {
        visuals,
        ..Style::default()
    };
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(8);
    ctx.set_style(style);
}
