use chrono::{DateTime, Local};
use egui_macroquad::egui;
use flappy_evo::simulation::evolution::Trainer;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::snapshot::Snapshot;
use flappy_evo::simulation::storage::DEFAULT_WINNER_PATH;

#[allow(clippy::struct_excessive_bools)]
pub struct UIState {
    pub stats_panel_width: f32,
    pub config_path: String,
    pub winner_path: String,
    pub status_message: Option<String>,
    pub load_config_requested: bool,
    pub save_config_requested: bool,
    pub save_requested: bool,
    pub skip_requested: bool,
    pub back_requested: bool,
    pub ticks_per_frame: usize,
    pub rendering_enabled: bool,
    pub show_sensors: bool,
    pub training_started: Option<DateTime<Local>>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 300.0,
            config_path: "params.json".to_string(),
            winner_path: DEFAULT_WINNER_PATH.to_string(),
            status_message: None,
            load_config_requested: false,
            save_config_requested: false,
            save_requested: false,
            skip_requested: false,
            back_requested: false,
            ticks_per_frame: 1,
            rendering_enabled: true,
            show_sensors: true,
            training_started: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

/// Training data shown next to the playfield.
pub struct TrainingView<'a> {
    pub trainer: &'a Trainer,
    pub snapshot: Option<&'a Snapshot>,
    pub finished: bool,
}

pub fn draw_ui(state: &mut UIState, view: &TrainingView<'_>, params: &Params) {
    egui_macroquad::ui(|egui_ctx| {
        // Configure brighter text and UI
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        visuals.widgets.inactive.fg_stroke.color = egui::Color32::from_rgb(200, 200, 200);
        visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
        visuals.widgets.active.fg_stroke.color = egui::Color32::WHITE;
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, view, params);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
