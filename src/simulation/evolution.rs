//! Generational genetic optimizer over [`Brain`] controllers.
//!
//! Each generation is scored by an [`Evaluation`]. The next population keeps
//! the best `elite_count` brains unchanged and fills the rest with mutated
//! weighted crossovers of parents drawn from the top `parent_fraction`.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::brain::Brain;
use super::evaluation::{Evaluation, GenerationOutcome, Scored, StopReason};
use super::params::Params;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Highest fitness.
    pub best_fitness: f32,
    /// Mean fitness.
    pub mean_fitness: f32,
    /// Lowest fitness.
    pub worst_fitness: f32,
    /// Score reached by the shared run.
    pub score: u32,
    /// Ticks run.
    pub ticks: u64,
    /// Population size.
    pub population: usize,
    /// Why the generation ended.
    pub stop: StopReason,
}

/// Best controller seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Champion {
    /// The controller.
    pub brain: Brain,
    /// Fitness it reached.
    pub fitness: f32,
    /// Generation it was evaluated in.
    pub generation: usize,
}

/// Drives evaluation and breeding, one generation at a time.
#[derive(Debug, Clone)]
pub struct Trainer {
    population: Vec<Brain>,
    completed: usize,
    seed: u64,
    champion: Option<Champion>,
    history: Vec<GenerationStats>,
}

impl Trainer {
    /// Starts from a random population.
    pub fn new(params: &Params, seed: u64) -> Self {
        let population = (0..params.population_size)
            .map(|_| Brain::new(&params.layer_sizes, params.weight_scale))
            .collect();
        Self::from_population(population, seed)
    }

    /// Starts from a given population.
    pub fn from_population(population: Vec<Brain>, seed: u64) -> Self {
        Self {
            population,
            completed: 0,
            seed,
            champion: None,
            history: Vec::new(),
        }
    }

    /// Number of generations evaluated so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Current population, awaiting evaluation.
    pub fn population(&self) -> &[Brain] {
        &self.population
    }

    /// Best controller seen so far.
    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Statistics of all evaluated generations.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Hands the current population to a new evaluation.
    ///
    /// The obstacle seed differs per generation but is derived from the
    /// trainer seed, so a training run is reproducible up to mutation noise.
    pub fn begin_generation(&mut self, params: &Params) -> Evaluation<Brain> {
        let generation = self.completed + 1;
        let candidates = std::mem::take(&mut self.population)
            .into_iter()
            .enumerate()
            .collect();
        Evaluation::new(
            params,
            generation,
            candidates,
            self.seed.wrapping_add(generation as u64),
        )
    }

    /// Records the outcome of a generation and breeds the next population.
    pub fn end_generation(
        &mut self,
        params: &Params,
        outcome: GenerationOutcome<Brain>,
    ) -> &GenerationStats {
        let mut scored = outcome.scored;
        scored.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let fitness: Vec<f32> = scored.iter().map(|s| s.fitness).collect();
        let stats = GenerationStats {
            generation: outcome.generation,
            best_fitness: fitness.first().copied().unwrap_or_default(),
            mean_fitness: if fitness.is_empty() {
                0.0
            } else {
                fitness.iter().sum::<f32>() / fitness.len() as f32
            },
            worst_fitness: fitness.last().copied().unwrap_or_default(),
            score: outcome.score,
            ticks: outcome.ticks,
            population: fitness.len(),
            stop: outcome.stop,
        };

        if let Some(best) = scored.first() {
            let improved = self
                .champion
                .as_ref()
                .is_none_or(|c| best.fitness > c.fitness);
            if improved {
                self.champion = Some(Champion {
                    brain: best.controller.clone(),
                    fitness: best.fitness,
                    generation: outcome.generation,
                });
            }
        }

        info!(
            generation = stats.generation,
            best = stats.best_fitness,
            mean = stats.mean_fitness,
            score = stats.score,
            population = stats.population,
            "generation complete"
        );

        self.population = breed(&scored, params);
        self.completed = outcome.generation;
        self.history.push(stats);
        &self.history[self.history.len() - 1]
    }

    /// Evaluates and breeds one generation.
    pub fn run_generation(&mut self, params: &Params) -> &GenerationStats {
        let outcome = self.begin_generation(params).run(params);
        self.end_generation(params, outcome)
    }

    /// Runs `params.generations` generations and returns the champion.
    pub fn train(&mut self, params: &Params) -> Option<&Champion> {
        for _ in 0..params.generations {
            self.run_generation(params);
        }
        self.champion()
    }
}

/// Builds the next population from brains sorted by descending fitness.
pub fn breed(ranked: &[Scored<Brain>], params: &Params) -> Vec<Brain> {
    if ranked.is_empty() {
        warn!("nothing to breed from, starting a fresh population");
        return (0..params.population_size)
            .map(|_| Brain::new(&params.layer_sizes, params.weight_scale))
            .collect();
    }

    let elite_count = params.elite_count.min(ranked.len());
    let parent_count = ((ranked.len() as f32 * params.parent_fraction).ceil() as usize)
        .clamp(1, ranked.len());

    let mut next: Vec<Brain> = ranked[..elite_count]
        .iter()
        .map(|s| s.controller.clone())
        .collect();

    let offspring: Vec<Brain> = (elite_count..params.population_size)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::rng();
            let parent_1 = &ranked[rng.random_range(0..parent_count)].controller;
            let parent_2 = &ranked[rng.random_range(0..parent_count)].controller;
            let mut child = Brain::crossover_weighted(parent_1, parent_2, rng.random::<f32>());
            child.mutate(sample_mutation_scale(params));
            child
        })
        .collect();

    next.extend(offspring);
    next
}

/// Samples a mutation scale using logarithmic random distribution.
fn sample_mutation_scale(params: &Params) -> f32 {
    let log_min = params.mutation_min.ln();
    let log_max = params.mutation_max.ln();
    if log_max <= log_min {
        return params.mutation_min;
    }
    rand::rng().random_range(log_min..log_max).exp()
}
