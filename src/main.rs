use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::evaluation::Evaluation;
use flappy_evo::simulation::evolution::Trainer;
use flappy_evo::simulation::game::{Game, Phase};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::snapshot::Snapshot;
use flappy_evo::simulation::storage::SavedController;
use macroquad::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod graphics;
mod ui;

use graphics::Viewport;
use ui::{Launch, TrainingView, UIState};

/// Catch-up limit for the tick clock after a stalled frame.
const MAX_TICKS_PER_FRAME: usize = 5;
/// Speed-up applied while rendering is off.
const HEADLESS_MULTIPLIER: usize = 20;

/// Fixed-rate tick pacing on top of the variable frame rate.
#[derive(Debug, Default)]
struct Clock {
    accumulator: f32,
}

impl Clock {
    fn ticks_due(&mut self, params: &Params) -> usize {
        let tick = params.tick_seconds();
        self.accumulator += get_frame_time();
        let due = (self.accumulator / tick).floor() as usize;
        if due > MAX_TICKS_PER_FRAME {
            self.accumulator = 0.0;
            return MAX_TICKS_PER_FRAME;
        }
        self.accumulator -= due as f32 * tick;
        due
    }
}

struct Training {
    trainer: Trainer,
    evaluation: Option<Evaluation<Brain>>,
    snapshot: Option<Snapshot>,
}

enum Screen {
    Genesis,
    Play {
        game: Game,
        clock: Clock,
    },
    Replay {
        game: Game,
        saved: SavedController,
        clock: Clock,
    },
    Train(Training),
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Flappy Evo".to_owned(),
        window_width: 820,
        window_height: 750,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut ui_state = UIState::new();
    let mut params = Params::default();

    if let Some(path) = std::env::args().nth(1) {
        match Params::load_from_file(&path) {
            Ok(loaded) => {
                info!(path = %path, "configuration loaded");
                params = loaded;
                ui_state.config_path = path;
            }
            Err(e) => {
                error!(error = %e, "configuration rejected, using defaults");
                ui_state.set_status(format!("Configuration rejected: {e}"));
            }
        }
    }

    let mut screen = Screen::Genesis;

    info!("Starting flappy evo");

    loop {
        if is_key_pressed(KeyCode::Escape) && !matches!(screen, Screen::Genesis) {
            screen = Screen::Genesis;
        }

        let mut next_screen = None;

        match &mut screen {
            Screen::Genesis => {
                handle_config_files(&mut params, &mut ui_state);
                if let Some(launch) = ui::draw_genesis_screen(&mut params, &mut ui_state) {
                    next_screen = launch_screen(launch, &params, &mut ui_state);
                }
            }
            Screen::Play { game, clock } => {
                if is_key_pressed(KeyCode::Space) || is_mouse_button_pressed(MouseButton::Left) {
                    game.press_jump(&params);
                }
                for _ in 0..clock.ticks_due(&params) {
                    game.tick(&params);
                }
                draw_session(game, &params, &ui_state);
            }
            Screen::Replay { game, saved, clock } => {
                if game.phase() == Phase::GameOver
                    && (is_key_pressed(KeyCode::Space)
                        || is_mouse_button_pressed(MouseButton::Left))
                {
                    game.restart(&params);
                }
                for _ in 0..clock.ticks_due(&params) {
                    game.tick_controlled(&params, &saved.brain);
                }
                draw_session(game, &params, &ui_state);
            }
            Screen::Train(training) => {
                advance_training(training, &params, &mut ui_state);
                draw_training(training, &params, &mut ui_state);
                if ui_state.back_requested {
                    ui_state.back_requested = false;
                    next_screen = Some(Screen::Genesis);
                }
            }
        }

        if let Some(next) = next_screen {
            screen = next;
        }

        next_frame().await;
    }
}

fn handle_config_files(params: &mut Params, ui_state: &mut UIState) {
    if ui_state.load_config_requested {
        ui_state.load_config_requested = false;
        match Params::load_from_file(&ui_state.config_path) {
            Ok(loaded) => {
                *params = loaded;
                ui_state.set_status(format!("Loaded {}", ui_state.config_path));
            }
            Err(e) => {
                error!(error = %e, "configuration load failed");
                ui_state.set_status(format!("Load failed: {e}"));
            }
        }
    }

    if ui_state.save_config_requested {
        ui_state.save_config_requested = false;
        match params.save_to_file(&ui_state.config_path) {
            Ok(()) => ui_state.set_status(format!("Saved {}", ui_state.config_path)),
            Err(e) => {
                error!(error = %e, "configuration save failed");
                ui_state.set_status(format!("Save failed: {e}"));
            }
        }
    }
}

fn launch_screen(launch: Launch, params: &Params, ui_state: &mut UIState) -> Option<Screen> {
    if let Err(e) = params.validate() {
        warn!(error = %e, "refusing to start with invalid parameters");
        ui_state.set_status(format!("Invalid parameters: {e}"));
        return None;
    }

    let seed: u64 = ::rand::random();
    ui_state.status_message = None;

    match launch {
        Launch::Play => Some(Screen::Play {
            game: Game::new(params, seed),
            clock: Clock::default(),
        }),
        Launch::Replay => match SavedController::load_from_file(&ui_state.winner_path) {
            Ok(saved) => Some(Screen::Replay {
                game: Game::new(params, seed),
                saved,
                clock: Clock::default(),
            }),
            Err(e) => {
                error!(error = %e, "cannot replay winner");
                ui_state.set_status(format!("Cannot replay: {e}"));
                None
            }
        },
        Launch::Train => {
            let mut trainer = Trainer::new(params, seed);
            let evaluation = trainer.begin_generation(params);
            ui_state.training_started = Some(chrono::Local::now());
            info!(
                population = params.population_size,
                generations = params.generations,
                seed,
                "training started"
            );
            Some(Screen::Train(Training {
                trainer,
                evaluation: Some(evaluation),
                snapshot: None,
            }))
        }
    }
}

fn advance_training(training: &mut Training, params: &Params, ui_state: &mut UIState) {
    let budget = if ui_state.rendering_enabled {
        ui_state.ticks_per_frame
    } else {
        ui_state.ticks_per_frame * HEADLESS_MULTIPLIER
    };

    for _ in 0..budget {
        let Some(evaluation) = training.evaluation.as_mut() else {
            break;
        };
        if ui_state.skip_requested {
            ui_state.skip_requested = false;
            evaluation.cancel();
        }
        if evaluation.tick(params).is_some() {
            continue;
        }

        let Some(finished) = training.evaluation.take() else {
            break;
        };
        training.trainer.end_generation(params, finished.finish());

        if training.trainer.completed() >= params.generations {
            save_champion(&training.trainer, ui_state);
            break;
        }
        training.evaluation = Some(training.trainer.begin_generation(params));
    }

    if ui_state.save_requested {
        ui_state.save_requested = false;
        save_champion(&training.trainer, ui_state);
    }

    training.snapshot = training
        .evaluation
        .as_ref()
        .map(|evaluation| evaluation.snapshot(params));
}

fn save_champion(trainer: &Trainer, ui_state: &mut UIState) {
    let Some(champion) = trainer.champion() else {
        ui_state.set_status("No champion yet");
        return;
    };
    match SavedController::from_champion(champion).save_to_file(&ui_state.winner_path) {
        Ok(()) => ui_state.set_status(format!(
            "Saved champion (fitness {:.1}) to {}",
            champion.fitness, ui_state.winner_path
        )),
        Err(e) => {
            error!(error = %e, "saving champion failed");
            ui_state.set_status(format!("Save failed: {e}"));
        }
    }
}

fn draw_session(game: &Game, params: &Params, ui_state: &UIState) {
    clear_background(DARKGRAY);
    let viewport = Viewport::fit(params, screen_width());
    let snapshot = game.snapshot(params);

    graphics::draw_scene(&snapshot, params, &viewport, ui_state.show_sensors);
    graphics::draw_hud(&snapshot, params, &viewport);

    if game.phase() == Phase::GameOver {
        graphics::draw_game_over(game.score(), game.best_score(), params, &viewport);
    }
}

fn draw_training(training: &Training, params: &Params, ui_state: &mut UIState) {
    clear_background(DARKGRAY);
    let viewport = Viewport::fit(params, screen_width() - ui_state.stats_panel_width);

    if ui_state.rendering_enabled {
        if let Some(snapshot) = &training.snapshot {
            graphics::draw_scene(snapshot, params, &viewport, ui_state.show_sensors);
            graphics::draw_hud(snapshot, params, &viewport);
        }
    } else {
        draw_text("Rendering disabled", 20.0, 40.0, 28.0, WHITE);
    }

    let view = TrainingView {
        trainer: &training.trainer,
        snapshot: training.snapshot.as_ref(),
        finished: training.evaluation.is_none(),
    };
    ui::draw_ui(ui_state, &view, params);
    ui::process_egui();
}
