use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::snapshot::{AgentView, ObstacleView, Snapshot};
use macroquad::prelude::*;

const SKY: Color = Color::new(0.44, 0.77, 0.81, 1.0);
const GROUND: Color = Color::new(0.87, 0.82, 0.58, 1.0);
const GROUND_EDGE: Color = Color::new(0.45, 0.75, 0.18, 1.0);
const PIPE: Color = Color::new(0.45, 0.75, 0.18, 1.0);
const PIPE_RIM: Color = Color::new(0.33, 0.55, 0.13, 1.0);
const BIRD: Color = Color::new(0.98, 0.80, 0.15, 1.0);
const WING: Color = Color::new(0.95, 0.55, 0.10, 1.0);

/// Maps playfield coordinates onto the left part of the window.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f32,
}

impl Viewport {
    /// Largest scale at which the playfield fits into `available_width`.
    pub fn fit(params: &Params, available_width: f32) -> Self {
        let scale_x = available_width / params.window_width;
        let scale_y = screen_height() / params.window_height;
        Self {
            scale: scale_x.min(scale_y).max(0.1),
        }
    }

    pub fn width(&self, params: &Params) -> f32 {
        params.window_width * self.scale
    }
}

trait ToScreen {
    type Output;
    fn to_screen(&self, viewport: &Viewport) -> Self::Output;
}

impl ToScreen for (f32, f32) {
    type Output = Vec2;
    fn to_screen(&self, viewport: &Viewport) -> Vec2 {
        vec2(self.0 * viewport.scale, self.1 * viewport.scale)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, viewport: &Viewport) -> f32 {
        self * viewport.scale
    }
}

pub fn draw_scene(snapshot: &Snapshot, params: &Params, viewport: &Viewport, show_sensors: bool) {
    let width = viewport.width(params);
    draw_rectangle(
        0.0,
        0.0,
        width,
        params.window_height.to_screen(viewport),
        SKY,
    );

    for obstacle in &snapshot.obstacles {
        draw_obstacle(obstacle, params, viewport);
    }

    draw_ground(snapshot, params, viewport);

    // the population view only shows the birds still in the air
    let solo = snapshot.agents.len() == 1;
    for agent in snapshot.agents.iter().filter(|a| a.alive || solo) {
        if show_sensors && agent.alive {
            draw_sensor_lines(agent, params, viewport);
        }
        draw_agent(agent, params, viewport);
    }
}

fn draw_obstacle(obstacle: &ObstacleView, params: &Params, viewport: &Viewport) {
    let width = params.obstacle_width.to_screen(viewport);
    let rim = 6.0_f32.to_screen(viewport);

    let top_start = (obstacle.gap_top - params.barrier_height).max(0.0);
    let top = (obstacle.x, top_start).to_screen(viewport);
    let top_height = (obstacle.gap_top - top_start).to_screen(viewport);
    draw_rectangle(top.x, top.y, width, top_height, PIPE);
    draw_rectangle(top.x, top.y + top_height - rim * 3.0, width, rim * 3.0, PIPE_RIM);

    let bottom_end = (obstacle.gap_bottom + params.barrier_height).min(params.ground_y);
    let bottom = (obstacle.x, obstacle.gap_bottom).to_screen(viewport);
    let bottom_height = (bottom_end - obstacle.gap_bottom).max(0.0).to_screen(viewport);
    draw_rectangle(bottom.x, bottom.y, width, bottom_height, PIPE);
    draw_rectangle(bottom.x, bottom.y, width, rim * 3.0, PIPE_RIM);
}

fn draw_ground(snapshot: &Snapshot, params: &Params, viewport: &Viewport) {
    let height = (params.window_height - snapshot.ground_y).to_screen(viewport);
    let tile_width = params.ground_tile_width.to_screen(viewport);
    let playfield = viewport.width(params);

    for tile_x in [snapshot.ground_tiles.0, snapshot.ground_tiles.1] {
        let pos = (tile_x, snapshot.ground_y).to_screen(viewport);
        // the tiles may extend past the playfield, keep the stats panel clear
        let visible = (playfield - pos.x).clamp(0.0, tile_width);
        let start = pos.x.max(0.0);
        let end = (pos.x + visible).max(start);
        draw_rectangle(start, pos.y, end - start, height, GROUND);
        draw_rectangle(start, pos.y, end - start, 4.0_f32.to_screen(viewport), GROUND_EDGE);
    }
}

fn draw_agent(agent: &AgentView, params: &Params, viewport: &Viewport) {
    let w = params.agent_width.to_screen(viewport);
    let h = params.agent_height.to_screen(viewport);
    let pos = (agent.x, agent.y).to_screen(viewport);
    let center = pos + vec2(w / 2.0, h / 2.0);
    // positive tilt points the beak up, screen rotation is clockwise
    let rotation = -agent.tilt.to_radians();
    let color = if agent.alive { BIRD } else { GRAY };

    draw_rectangle_ex(
        center.x,
        center.y,
        w * 0.8,
        h * 0.8,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color,
        },
    );

    // wing position follows the flap frame
    let wing_lift = (1.0 - agent.flap_frame as f32) * h * 0.2;
    draw_rectangle_ex(
        center.x - w * 0.15,
        center.y + wing_lift,
        w * 0.35,
        h * 0.25,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color: WING,
        },
    );

    let eye = center + Vec2::from_angle(rotation).rotate(vec2(w * 0.2, -h * 0.15));
    draw_circle(eye.x, eye.y, h * 0.08, BLACK);
}

fn draw_sensor_lines(agent: &AgentView, params: &Params, viewport: &Viewport) {
    let (Some((gap_top, gap_bottom)), Some(target_x)) = (agent.target_gap, agent.target_x) else {
        return;
    };
    let from = (agent.x + params.agent_width, agent.y).to_screen(viewport);
    let top = (target_x, gap_top).to_screen(viewport);
    let bottom = (target_x, gap_bottom).to_screen(viewport);

    draw_line(from.x, from.y, top.x, top.y, 3.0, WHITE);
    draw_line(from.x, from.y, bottom.x, bottom.y, 3.0, WHITE);
}

pub fn draw_hud(snapshot: &Snapshot, params: &Params, viewport: &Viewport) {
    let font_size = 36.0_f32.to_screen(viewport).max(16.0);
    let right = viewport.width(params) - 10.0;

    let score_text = format!("Score: {}", snapshot.score);
    let size = measure_text(&score_text, None, font_size as u16, 1.0);
    draw_text(&score_text, right - size.width, font_size, font_size, WHITE);

    if let Some(generation) = snapshot.generation {
        let gen_text = format!("Gen: {generation}");
        draw_text(&gen_text, 10.0, font_size, font_size, WHITE);

        let alive_text = format!("Alive: {}", snapshot.live_agents);
        draw_text(&alive_text, 10.0, font_size * 2.0, font_size, WHITE);
    }
}

pub fn draw_game_over(score: u32, best: u32, params: &Params, viewport: &Viewport) {
    let width = viewport.width(params);
    let height = params.window_height.to_screen(viewport);
    draw_rectangle(0.0, 0.0, width, height, Color::from_rgba(0, 0, 0, 120));

    let lines = [
        ("Game Over".to_string(), 48.0),
        (format!("Score: {score}   Best: {best}"), 28.0),
        ("Press Space to play again".to_string(), 22.0),
    ];
    let mut y = height / 2.0 - 40.0;
    for (text, font_size) in lines {
        let size = measure_text(&text, None, font_size as u16, 1.0);
        draw_text(&text, width / 2.0 - size.width / 2.0, y, font_size, WHITE);
        y += font_size + 12.0;
    }
}
