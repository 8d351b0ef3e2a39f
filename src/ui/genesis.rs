use egui_macroquad::egui;
use flappy_evo::simulation::collision::CollisionKind;
use flappy_evo::simulation::params::Params;
use macroquad::prelude::*;

use super::ui::UIState;

/// What the configuration screen asked to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Play,
    Train,
    Replay,
}

pub fn draw_genesis_screen(params: &mut Params, state: &mut UIState) -> Option<Launch> {
    clear_background(LIGHTGRAY);

    let mut launch = None;

    egui_macroquad::ui(|egui_ctx| {
        egui::CentralPanel::default().show(egui_ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Flappy Evo - Configuration");
                ui.add_space(10.0);

                ui.collapsing("Physics", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.impulse_velocity, -20.0..=-2.0)
                            .text("Impulse Velocity"),
                    );
                    ui.add(egui::Slider::new(&mut params.gravity, 0.5..=8.0).text("Gravity"));
                    ui.add(
                        egui::Slider::new(&mut params.terminal_displacement, 4.0..=40.0)
                            .text("Terminal Displacement"),
                    );
                    ui.add(egui::Slider::new(&mut params.tick_rate, 10..=120).text("Ticks / Second"));
                });

                ui.collapsing("Obstacles", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.obstacle_gap, 100.0..=350.0).text("Gap Size"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.obstacle_speed, 1.0..=15.0).text("Speed"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.gap_top_min, 0.0..=300.0)
                            .text("Lowest Gap Top"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.gap_top_max, 100.0..=600.0)
                            .text("Highest Gap Top"),
                    );
                    ui.horizontal(|ui| {
                        ui.label("Collision:");
                        ui.radio_value(&mut params.collision, CollisionKind::PixelMask, "Pixel Mask");
                        ui.radio_value(
                            &mut params.collision,
                            CollisionKind::BoundingBox,
                            "Bounding Box",
                        );
                    });
                    ui.checkbox(&mut params.clamp_to_ground, "Pin to ground in single player");
                });

                ui.collapsing("Fitness", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.alive_reward, 0.0..=1.0).text("Alive Reward"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.pass_reward, 0.0..=20.0).text("Pass Reward"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.collision_penalty, 0.0..=10.0)
                            .text("Collision Penalty"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.bounds_penalty, 0.0..=10.0)
                            .text("Bounds Penalty"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.score_ceiling, 1..=200).text("Score Ceiling"),
                    );
                });

                ui.collapsing("Training", |ui| {
                    ui.add(
                        egui::Slider::new(&mut params.population_size, 2..=500).text("Population"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.generations, 1..=200).text("Generations"),
                    );
                    ui.add(egui::Slider::new(&mut params.elite_count, 0..=20).text("Elites"));
                    ui.add(
                        egui::Slider::new(&mut params.parent_fraction, 0.01..=1.0)
                            .text("Parent Fraction"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.mutation_min, 0.0001..=0.1)
                            .text("Min Mutation")
                            .logarithmic(true),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.mutation_max, 0.001..=1.0)
                            .text("Max Mutation")
                            .logarithmic(true),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.jump_threshold, -1.0..=1.0)
                            .text("Jump Threshold"),
                    );
                    let deep = params.layer_sizes.len() > 2;
                    if let Some(hidden) = params.layer_sizes.get_mut(1) {
                        if deep {
                            ui.add(egui::Slider::new(hidden, 1..=32).text("Hidden Neurons"));
                        }
                    }
                });

                ui.collapsing("Files", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Config:");
                        ui.text_edit_singleline(&mut state.config_path);
                    });
                    ui.horizontal(|ui| {
                        if ui.button("📂 Load").clicked() {
                            state.load_config_requested = true;
                        }
                        if ui.button("💾 Save").clicked() {
                            state.save_config_requested = true;
                        }
                    });
                    ui.horizontal(|ui| {
                        ui.label("Winner:");
                        ui.text_edit_singleline(&mut state.winner_path);
                    });
                });

                ui.add_space(20.0);
                ui.separator();
                ui.add_space(10.0);

                if let Some(ref msg) = state.status_message {
                    ui.label(msg);
                    ui.add_space(10.0);
                }

                ui.horizontal(|ui| {
                    if ui.button("▶ Play").clicked() {
                        launch = Some(Launch::Play);
                    }
                    if ui.button("🧬 Train").clicked() {
                        launch = Some(Launch::Train);
                    }
                    if ui.button("🏆 Replay Winner").clicked() {
                        launch = Some(Launch::Replay);
                    }
                });
                ui.label("Space or left click to flap, Escape to come back here");
            });
        });
    });

    egui_macroquad::draw();

    launch
}
