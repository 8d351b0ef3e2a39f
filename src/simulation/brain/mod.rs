//! Neural network controllers.
//!
//! A [`Brain`] is a small multi-layer perceptron mapping the three sensor
//! values to a jump signal. It supports the genetic operators the trainer
//! needs (mutation and weighted crossover).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::world::Sensors;

pub mod mlp;

pub use mlp::Mlp;

/// Anything that can turn a sensor reading into an output vector.
///
/// Index 0 of the output is the jump signal.
pub trait Controller {
    /// Runs the controller on one sensor reading.
    fn decide(&self, sensors: &Sensors) -> Array1<f32>;

    /// Whether the jump signal exceeds `threshold`.
    fn jumps(&self, sensors: &Sensors, threshold: f32) -> bool {
        self.decide(sensors)
            .get(0)
            .is_some_and(|&signal| signal > threshold)
    }
}

/// Multi-layer perceptron with tanh activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a new brain with random weights in `[-scale, scale)`.
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Mlp::new_random(pair[0], pair[1], scale))
            .collect();

        Self { layers }
    }

    /// Builds a brain from explicit layers.
    pub fn from_layers(layers: Vec<Mlp>) -> Self {
        Self { layers }
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Creates a new brain by weighted averaging two parent brains.
    /// `weight1` is the weight for `parent1`, `1.0 - weight1` for `parent2`.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Mlp::crossover_weighted(layer1, layer2, weight1))
            .collect();
        Self { layers }
    }

    /// Mutates all parameters in the brain.
    pub fn mutate(&mut self, mutation_scale: f32) {
        for layer in &mut self.layers {
            layer.mutate(mutation_scale);
        }
    }

    /// Number of inputs the first layer expects.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.weights.ncols())
    }

    /// Number of outputs the last layer produces.
    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.weights.nrows())
    }

    /// Layer dimensions, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.input_size().into_iter().collect();
        sizes.extend(self.layers.iter().map(|l| l.weights.nrows()));
        sizes
    }

    /// Whether consecutive layers agree on their dimensions.
    pub fn is_consistent(&self) -> bool {
        !self.layers.is_empty()
            && self.layers.iter().all(|l| l.weights.nrows() == l.biases.len())
            && self
                .layers
                .windows(2)
                .all(|pair| pair[0].weights.nrows() == pair[1].weights.ncols())
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.parameter_count());
        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }
}

impl Controller for Brain {
    fn decide(&self, sensors: &Sensors) -> Array1<f32> {
        self.think(&Array1::from(sensors.to_array().to_vec()))
    }
}

impl<C: Controller + ?Sized> Controller for &C {
    fn decide(&self, sensors: &Sensors) -> Array1<f32> {
        (**self).decide(sensors)
    }
}
