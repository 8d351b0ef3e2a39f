#![allow(missing_docs)]

use flappy_evo::simulation::brain::{Brain, Controller};
use flappy_evo::simulation::collision::CollisionKind;
use flappy_evo::simulation::evaluation::{
    Evaluation, Fate, GenomeId, StopReason, evaluate_generation,
};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::world::Sensors;
use ndarray::{Array1, array};
use std::cell::Cell;

/// Gaps pinned to 240..440 and a short generation (stops once two obstacles
/// have been passed, on tick 164).
fn create_test_params() -> Params {
    Params {
        gap_top_min: 240.0,
        gap_top_max: 241.0,
        collision: CollisionKind::BoundingBox,
        score_ceiling: 1,
        ..Params::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Script {
    /// Jumps whenever it sinks below the given height.
    Hover(f32),
    /// Never jumps.
    Idle,
    /// Always jumps.
    Climb,
}

impl Controller for Script {
    fn decide(&self, sensors: &Sensors) -> Array1<f32> {
        let jump = match *self {
            Script::Hover(limit) => sensors.y > limit,
            Script::Idle => false,
            Script::Climb => true,
        };
        array![if jump { 1.0 } else { -1.0 }]
    }
}

/// Hovers below `limit`, with an extra jump on tick `extra_jump` and no
/// jumps at all from tick `stop_at` on.
#[derive(Debug)]
struct Timed {
    limit: f32,
    extra_jump: Option<u64>,
    stop_at: Option<u64>,
    tick: Cell<u64>,
}

impl Timed {
    fn new(limit: f32, extra_jump: Option<u64>, stop_at: Option<u64>) -> Self {
        Self {
            limit,
            extra_jump,
            stop_at,
            tick: Cell::new(0),
        }
    }
}

impl Controller for Timed {
    fn decide(&self, sensors: &Sensors) -> Array1<f32> {
        let tick = self.tick.get() + 1;
        self.tick.set(tick);
        let jump = if self.stop_at.is_some_and(|stop| tick >= stop) {
            false
        } else {
            self.extra_jump == Some(tick) || sensors.y > self.limit
        };
        array![if jump { 1.0 } else { -1.0 }]
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected}, got {actual}"
    );
}

fn scenario() -> Vec<(GenomeId, Script)> {
    vec![
        (0, Script::Hover(360.0)),
        (1, Script::Hover(360.0)),
        // sits in the bottom barrier's band and hits the first obstacle
        (2, Script::Hover(500.0)),
        (3, Script::Idle),
        (4, Script::Climb),
    ]
}

#[test]
fn test_generation_scenario() {
    let params = create_test_params();
    let outcome = evaluate_generation(&params, 1, scenario(), 17);

    assert_eq!(outcome.generation, 1);
    assert_eq!(outcome.stop, StopReason::ScoreCeiling);
    assert_eq!(outcome.score, 2);
    assert_eq!(outcome.ticks, 164);

    let fates: Vec<Fate> = outcome.scored.iter().map(|s| s.fate).collect();
    assert_eq!(
        fates,
        vec![
            Fate::Survived,
            Fate::Survived,
            Fate::Collided,
            Fate::OutOfBounds,
            Fate::OutOfBounds,
        ]
    );

    let ticks: Vec<u64> = outcome.scored.iter().map(|s| s.ticks_alive).collect();
    assert_eq!(ticks, vec![164, 164, 68, 24, 27]);

    // 164 ticks alive plus two passages
    assert_close(outcome.scored[0].fitness, 26.4);
    assert_close(outcome.scored[1].fitness, 26.4);
    // 68 ticks alive minus the collision penalty
    assert_close(outcome.scored[2].fitness, 5.8);
    // leaving the playfield costs nothing by default
    assert_close(outcome.scored[3].fitness, 2.4);
    assert_close(outcome.scored[4].fitness, 2.7);

    let ids: Vec<GenomeId> = outcome.scored.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(outcome.scored[2].controller, Script::Hover(500.0));

    assert_close(outcome.best_fitness().expect("non-empty"), 26.4);
    assert_close(
        outcome.mean_fitness().expect("non-empty"),
        (26.4 + 26.4 + 5.8 + 2.4 + 2.7) / 5.0,
    );
}

#[test]
fn test_pass_reward_goes_to_live_agents_only() {
    let params = create_test_params();
    let mut evaluation = Evaluation::new(&params, 1, scenario(), 17);

    let mut before = evaluation.fitness();
    loop {
        let report = evaluation.tick(&params).expect("still running");
        let after = evaluation.fitness();
        if report.scored() {
            assert_eq!(report.tick, 82);
            assert_close(after[0].1 - before[0].1, 5.1);
            assert_close(after[1].1 - before[1].1, 5.1);
            // the others are long dead
            for (now, then) in after[2..].iter().zip(&before[2..]) {
                assert_close(now.1 - then.1, 0.0);
            }
            break;
        }
        before = after;
    }
    assert_eq!(evaluation.active_count(), 2);
}

#[test]
fn test_bounds_penalty_is_configurable() {
    let params = Params {
        bounds_penalty: 3.0,
        ..create_test_params()
    };
    let outcome = evaluate_generation(&params, 1, vec![(0, Script::Idle)], 1);

    assert_eq!(outcome.stop, StopReason::Extinct);
    assert_eq!(outcome.scored[0].fate, Fate::OutOfBounds);
    assert_close(outcome.scored[0].fitness, 2.4 - 3.0);
}

#[test]
fn test_extinction_stops_generation() {
    let params = create_test_params();
    let mut evaluation = Evaluation::new(&params, 3, vec![(0, Script::Idle), (1, Script::Idle)], 5);

    let mut ticks = 0;
    while evaluation.tick(&params).is_some() {
        ticks += 1;
    }
    assert_eq!(ticks, 24);
    assert_eq!(evaluation.stop_reason(), Some(StopReason::Extinct));
    assert!(evaluation.is_finished());
    assert_eq!(evaluation.active_count(), 0);
    // no further ticks once finished
    assert!(evaluation.tick(&params).is_none());
    assert_eq!(evaluation.world().tick_count(), 24);
}

#[test]
fn test_cancel_between_ticks() {
    let params = create_test_params();
    let mut evaluation = Evaluation::new(&params, 2, scenario(), 9);
    for _ in 0..10 {
        evaluation.tick(&params);
    }
    evaluation.cancel();
    assert!(evaluation.tick(&params).is_none());

    let outcome = evaluation.finish();
    assert_eq!(outcome.stop, StopReason::Cancelled);
    assert_eq!(outcome.ticks, 10);
    assert!(outcome.scored.iter().all(|s| s.fate == Fate::Survived));
    assert!(outcome.scored.iter().all(|s| s.ticks_alive == 10));
}

#[test]
fn test_empty_population() {
    let params = create_test_params();
    let mut evaluation: Evaluation<Script> = Evaluation::new(&params, 1, Vec::new(), 1);
    assert!(evaluation.tick(&params).is_none());
    assert_eq!(evaluation.stop_reason(), Some(StopReason::Extinct));

    let outcome = evaluation.finish();
    assert!(outcome.scored.is_empty());
    assert!(outcome.best_fitness().is_none());
    assert!(outcome.mean_fitness().is_none());
}

#[test]
fn test_observer_sees_every_tick() {
    let params = create_test_params();
    let evaluation = Evaluation::new(&params, 4, scenario(), 17);

    let mut seen = Vec::new();
    let outcome = evaluation.run_with(&params, |snapshot| {
        assert_eq!(snapshot.generation, Some(4));
        seen.push((snapshot.tick, snapshot.live_agents));
    });

    assert_eq!(seen.len() as u64, outcome.ticks);
    assert_eq!(seen.first(), Some(&(1, 5)));
    assert_eq!(seen.last(), Some(&(164, 2)));
}

#[test]
fn test_random_brains_finish() {
    let params = create_test_params();
    let candidates: Vec<(GenomeId, Brain)> = (0..20)
        .map(|id| (id, Brain::new(&params.layer_sizes, params.weight_scale)))
        .collect();

    let outcome = evaluate_generation(&params, 1, candidates, 3);
    assert_eq!(outcome.scored.len(), 20);
    assert!(matches!(
        outcome.stop,
        StopReason::Extinct | StopReason::ScoreCeiling
    ));
    assert!(outcome.scored.iter().all(|s| s.fate != Fate::Active));
}

#[test]
fn test_deaths_on_scoring_tick() {
    // the gap reaches below the ground line, so an agent can leave the
    // playfield while the passed obstacle still overlaps it
    let params = Params {
        gap_top_min: 500.0,
        gap_top_max: 501.0,
        bounds_penalty: 3.0,
        ..create_test_params()
    };
    let candidates = vec![
        (0, Timed::new(600.0, None, None)),
        // climbs into the top barrier on tick 82
        (1, Timed::new(600.0, Some(77), None)),
        // stops flapping and reaches the ground on tick 82
        (2, Timed::new(605.0, None, Some(70))),
    ];
    let mut evaluation = Evaluation::new(&params, 1, candidates, 11);

    for _ in 0..81 {
        let report = evaluation.tick(&params).expect("still running");
        assert!(!report.scored());
        assert!(report.deaths().next().is_none());
    }
    assert_eq!(evaluation.active_count(), 3);

    let before = evaluation.fitness();
    let report = evaluation.tick(&params).expect("still running");
    let after = evaluation.fitness();

    assert_eq!(report.tick, 82);
    assert!(report.scored());
    assert_eq!(report.deaths().collect::<Vec<_>>(), vec![1, 2]);

    // alive reward plus pass reward
    assert_close(after[0].1 - before[0].1, 5.1);
    // the collision comes before the passage, so no pass reward
    assert_close(after[1].1 - before[1].1, 0.1 - 1.0);
    // the bounds death comes after it, so the pass reward is kept
    assert_close(after[2].1 - before[2].1, 0.1 + 5.0 - 3.0);

    assert_eq!(
        evaluation.fates(),
        vec![Fate::Active, Fate::Collided, Fate::OutOfBounds]
    );
    assert_eq!(evaluation.active_count(), 1);
}
