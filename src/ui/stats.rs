use chrono::Local;
use egui_macroquad::egui;
use egui_plot::{Line, Plot, PlotPoints};
use flappy_evo::simulation::evolution::GenerationStats;
use flappy_evo::simulation::params::Params;

use super::ui::{TrainingView, UIState};

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    view: &TrainingView<'_>,
    params: &Params,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.heading("Training Stats");
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("💾 Save Champion").clicked() {
                    state.save_requested = true;
                }
                if ui.button("⏭ End Generation").clicked() {
                    state.skip_requested = true;
                }
                if ui.button("⬅ Back").clicked() {
                    state.back_requested = true;
                }
            });

            ui.horizontal(|ui| {
                let button_text = if state.rendering_enabled {
                    "🎨 Rendering: ON"
                } else {
                    "🎨 Rendering: OFF"
                };
                if ui.button(button_text).clicked() {
                    state.rendering_enabled = !state.rendering_enabled;
                }
                ui.checkbox(&mut state.show_sensors, "Sensor lines");
            });

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(
                egui::Slider::new(&mut state.ticks_per_frame, 1..=500)
                    .text("ticks / frame")
                    .logarithmic(true),
            );

            if let Some(started) = state.training_started {
                let elapsed = Local::now().signed_duration_since(started);
                ui.label(format!("Started: {}", started.format("%H:%M:%S")));
                ui.label(format!(
                    "Elapsed: {}m {:02}s",
                    elapsed.num_minutes(),
                    elapsed.num_seconds() % 60
                ));
            }

            ui.separator();

            let trainer = view.trainer;
            if view.finished {
                ui.label(format!("Training finished after {} generations", trainer.completed()));
            } else {
                ui.label(format!(
                    "Generation: {}/{}",
                    trainer.completed() + 1,
                    params.generations
                ));
            }

            if let Some(snapshot) = view.snapshot {
                ui.label(format!(
                    "Alive: {}/{}",
                    snapshot.live_agents,
                    snapshot.agents.len()
                ));
                ui.label(format!("Score: {}", snapshot.score));
                ui.label(format!("Tick: {}", snapshot.tick));
            }

            if let Some(champion) = trainer.champion() {
                ui.label(format!(
                    "Champion: fitness={:.1} (generation {})",
                    champion.fitness, champion.generation
                ));
            }

            if let Some(last) = trainer.history().last() {
                ui.collapsing("Last Generation", |ui| {
                    ui.label(format!("Best: {:.2}", last.best_fitness));
                    ui.label(format!("Mean: {:.2}", last.mean_fitness));
                    ui.label(format!("Worst: {:.2}", last.worst_fitness));
                    ui.label(format!("Score: {}", last.score));
                    ui.label(format!("Ticks: {}", last.ticks));
                    ui.label(format!("Ended: {:?}", last.stop));
                });
            }

            ui.separator();

            ui.heading("Fitness Per Generation");
            draw_fitness_plot(ui, trainer.history());
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, history: &[GenerationStats]) {
    if history.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    Plot::new("fitness_plot")
        .height(200.0)
        .show_axes([true, true])
        .legend(egui_plot::Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nGeneration: {:.0}\nFitness: {:.1}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            let best: PlotPoints = history
                .iter()
                .map(|s| [s.generation as f64, s.best_fitness as f64])
                .collect();
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(255, 100, 100))
                    .name("Best"),
            );

            let mean: PlotPoints = history
                .iter()
                .map(|s| [s.generation as f64, s.mean_fitness as f64])
                .collect();
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}
