#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::brain::{Brain, Controller, Mlp};
use flappy_evo::simulation::evaluation::{Fate, Scored};
use flappy_evo::simulation::evolution::{Trainer, breed};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::world::Sensors;
use ndarray::{Array1, Array2, array};

fn create_test_params() -> Params {
    Params {
        population_size: 12,
        generations: 3,
        score_ceiling: 1,
        elite_count: 2,
        ..Params::default()
    }
}

fn ranked(brains: Vec<Brain>) -> Vec<Scored<Brain>> {
    let count = brains.len();
    brains
        .into_iter()
        .enumerate()
        .map(|(id, controller)| Scored {
            id,
            controller,
            fitness: (count - id) as f32,
            fate: Fate::OutOfBounds,
            ticks_alive: 10,
        })
        .collect()
}

fn sensors() -> Sensors {
    Sensors {
        y: 300.0,
        to_gap_top: 50.0,
        to_gap_bottom: 150.0,
    }
}

#[test]
fn test_brain_shape() {
    let brain = Brain::new(&[3, 6, 1], 1.0);
    assert_eq!(brain.layer_sizes(), vec![3, 6, 1]);
    assert_eq!(brain.input_size(), Some(3));
    assert_eq!(brain.output_size(), Some(1));
    assert!(brain.is_consistent());
    assert_eq!(brain.parameter_count(), 3 * 6 + 6 + 6 + 1);
    assert_eq!(brain.to_flat_vector().len(), brain.parameter_count());

    let output = brain.decide(&sensors());
    assert_eq!(output.len(), 1);
    assert!(output[0].abs() <= 1.0);
}

#[test]
fn test_brain_jump_threshold() {
    // output = tanh(bias) since all weights are zero
    let layer = Mlp::from_parts(Array2::zeros((1, 3)), array![1.0]);
    let brain = Brain::from_layers(vec![layer]);
    assert!(brain.jumps(&sensors(), 0.5));
    assert!(!brain.jumps(&sensors(), 0.8));

    let silent = Brain::from_layers(vec![Mlp::from_parts(
        Array2::zeros((1, 3)),
        array![-1.0],
    )]);
    assert!(!silent.jumps(&sensors(), 0.5));
}

#[test]
fn test_inconsistent_brain_detected() {
    let brain = Brain::from_layers(vec![
        Mlp::from_parts(Array2::zeros((4, 3)), Array1::zeros(4)),
        Mlp::from_parts(Array2::zeros((1, 5)), Array1::zeros(1)),
    ]);
    assert!(!brain.is_consistent());
    assert!(!Brain::from_layers(Vec::new()).is_consistent());
}

#[test]
fn test_crossover_and_mutation() {
    let a = Brain::new(&[3, 6, 1], 1.0);
    let b = Brain::new(&[3, 6, 1], 1.0);

    assert_eq!(Brain::crossover_weighted(&a, &b, 1.0), a);
    assert_eq!(Brain::crossover_weighted(&a, &b, 0.0), b);

    let mid = Brain::crossover_weighted(&a, &b, 0.5);
    for ((m, x), y) in mid
        .to_flat_vector()
        .iter()
        .zip(a.to_flat_vector())
        .zip(b.to_flat_vector())
    {
        assert!((m - (x + y) / 2.0).abs() < 1e-6);
    }

    let mut unchanged = a.clone();
    unchanged.mutate(0.0);
    assert_eq!(unchanged, a);

    let mut mutated = a.clone();
    mutated.mutate(0.1);
    assert_ne!(mutated, a);
    for (m, x) in mutated.to_flat_vector().iter().zip(a.to_flat_vector()) {
        assert!((m - x).abs() <= 0.1 + 1e-6);
    }
}

#[test]
fn test_breed_keeps_size_and_elites() {
    let params = create_test_params();
    let brains: Vec<Brain> = (0..params.population_size)
        .map(|_| Brain::new(&params.layer_sizes, 1.0))
        .collect();
    let ranked = ranked(brains.clone());

    let next = breed(&ranked, &params);
    assert_eq!(next.len(), params.population_size);
    assert_eq!(next[0], brains[0]);
    assert_eq!(next[1], brains[1]);
    assert!(next.iter().all(|b| b.layer_sizes() == params.layer_sizes));
}

#[test]
fn test_breed_from_nothing_starts_fresh() {
    let params = create_test_params();
    let next = breed(&[], &params);
    assert_eq!(next.len(), params.population_size);
    assert!(next.iter().all(Brain::is_consistent));
}

#[test]
fn test_trainer_runs_generations() {
    let params = create_test_params();
    let mut trainer = Trainer::new(&params, 21);
    assert_eq!(trainer.population().len(), params.population_size);
    assert!(trainer.champion().is_none());

    let champion = trainer.train(&params).cloned().expect("champion");
    assert_eq!(trainer.completed(), params.generations);
    assert_eq!(trainer.population().len(), params.population_size);

    let history = trainer.history();
    assert_eq!(history.len(), params.generations);
    let generations: Vec<usize> = history.iter().map(|s| s.generation).collect();
    assert_eq!(generations, vec![1, 2, 3]);
    for stats in history {
        assert_eq!(stats.population, params.population_size);
        assert!(stats.best_fitness >= stats.mean_fitness - 1e-4);
        assert!(stats.mean_fitness >= stats.worst_fitness - 1e-4);
    }

    // the champion is the best across all generations
    let best = history
        .iter()
        .map(|s| s.best_fitness)
        .fold(f32::MIN, f32::max);
    assert_eq!(champion.fitness, best);
}

#[test]
fn test_begin_and_end_generation() {
    let params = create_test_params();
    let mut trainer = Trainer::new(&params, 4);

    let evaluation = trainer.begin_generation(&params);
    assert_eq!(evaluation.generation(), 1);
    assert_eq!(evaluation.active_count(), params.population_size);

    let outcome = evaluation.run(&params);
    let stats = trainer.end_generation(&params, outcome).clone();
    assert_eq!(stats.generation, 1);
    assert_eq!(trainer.completed(), 1);
    assert_eq!(trainer.population().len(), params.population_size);
    assert_eq!(trainer.begin_generation(&params).generation(), 2);
}
