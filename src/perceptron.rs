//! Single computational units.
//!
//! A [`Perceptron`] holds a weight vector and a bias, and caches the last input it
//! saw together with the activation it produced. Backpropagation reads those
//! caches instead of recomputing the forward pass.
//!
//! Three flavours share the [`Unit`] interface:
//!
//! - ordinary units (`Perceptron::new` / `Perceptron::with_weights`): sigmoid activation
//! - input units (`Perceptron::input`): one input, weight `1.0`, bias `0.0`, identity
//! - [`UpdatingPerceptron`]: a short-lived wrapper used during one backpropagation pass

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{Activation, Error, Gradient, Result};

/// Capabilities shared by every unit variant.
pub trait Unit {
    fn activation(&self) -> Activation;

    fn weights(&self) -> &[f64];

    fn bias(&self) -> f64;

    /// The sample passed to the most recent `predict`, if any.
    fn last_input(&self) -> Option<&[f64]>;

    /// The activation produced by the most recent `predict`, if any.
    fn last_output(&self) -> Option<f64>;

    /// Evaluate `sample`, caching it and the resulting activation.
    fn predict(&mut self, sample: &[f64]) -> Result<f64>;

    /// Replace the weight vector wholesale. The length must not change.
    fn update(&mut self, weights: Vec<f64>) -> Result<()>;

    /// The activation function applied to a weighted sum.
    #[inline]
    fn transform(&self, value: f64) -> f64 {
        self.activation().forward(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    activation: Activation,
    bias: f64,
    weights: Vec<f64>,
    last_input: Option<Vec<f64>>,
    last_output: Option<f64>,
}

impl Perceptron {
    /// A sigmoid unit with He-initialized weights: each weight is drawn from
    /// `N(0, sqrt(2 / input_size))`.
    pub fn new<R: Rng + ?Sized>(input_size: usize, bias: f64, rng: &mut R) -> Result<Self> {
        if input_size == 0 {
            return Err(Error::InvalidConfig("input_size must be > 0".to_owned()));
        }

        let std = (2.0 / input_size as f64).sqrt();
        let normal = Normal::new(0.0, std).map_err(|err| {
            Error::InvalidConfig(format!("cannot sample weights with std {std}: {err}"))
        })?;
        let weights = (0..input_size).map(|_| normal.sample(rng)).collect();

        Ok(Self::from_parts(Activation::Sigmoid, bias, weights))
    }

    /// A sigmoid unit with explicit weights.
    pub fn with_weights(input_size: usize, bias: f64, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != input_size {
            return Err(Error::InvalidShape(format!(
                "number of weights ({}) must be the same as input size ({input_size})",
                weights.len()
            )));
        }
        Ok(Self::from_parts(Activation::Sigmoid, bias, weights))
    }

    /// An input unit: relays its single feature unchanged.
    pub fn input() -> Self {
        Self::from_parts(Activation::Identity, 0.0, vec![1.0])
    }

    fn from_parts(activation: Activation, bias: f64, weights: Vec<f64>) -> Self {
        Self {
            activation,
            bias,
            weights,
            last_input: None,
            last_output: None,
        }
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.weights.len()
    }
}

impl Unit for Perceptron {
    #[inline]
    fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    fn last_input(&self) -> Option<&[f64]> {
        self.last_input.as_deref()
    }

    #[inline]
    fn last_output(&self) -> Option<f64> {
        self.last_output
    }

    fn predict(&mut self, sample: &[f64]) -> Result<f64> {
        if sample.len() != self.weights.len() {
            return Err(Error::InvalidShape(format!(
                "sample size ({}) must match given input size ({})",
                sample.len(),
                self.weights.len()
            )));
        }

        let weighted: f64 = sample
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| x * w)
            .sum();
        let y = self.transform(self.bias + weighted);

        self.last_input = Some(sample.to_vec());
        self.last_output = Some(y);
        Ok(y)
    }

    fn update(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.weights.len() {
            return Err(Error::InvalidShape(format!(
                "old ({}) and new ({}) weights must have the same size",
                self.weights.len(),
                weights.len()
            )));
        }
        self.weights = weights;
        Ok(())
    }
}

/// A unit whose weights are being recomputed by backpropagation.
///
/// Holds a snapshot of the live unit taken at construction (weights, bias and
/// caches) plus the gradients recorded so far. Reads see the snapshot; `update`
/// writes through to the live unit.
#[derive(Debug)]
pub struct UpdatingPerceptron<'a> {
    snapshot: Perceptron,
    live: &'a mut Perceptron,
    gradients: Vec<Gradient>,
}

impl<'a> UpdatingPerceptron<'a> {
    pub fn new(live: &'a mut Perceptron) -> Self {
        Self {
            snapshot: live.clone(),
            gradients: Vec::with_capacity(live.input_size()),
            live,
        }
    }

    /// Record the gradient of the next upstream connection.
    ///
    /// The `i`-th call belongs to `weights()[i]`.
    #[inline]
    pub fn put(&mut self, gradient: Gradient) {
        self.gradients.push(gradient);
    }

    #[inline]
    pub fn gradients(&self) -> &[Gradient] {
        &self.gradients
    }
}

impl Unit for UpdatingPerceptron<'_> {
    #[inline]
    fn activation(&self) -> Activation {
        self.snapshot.activation
    }

    #[inline]
    fn weights(&self) -> &[f64] {
        &self.snapshot.weights
    }

    #[inline]
    fn bias(&self) -> f64 {
        self.snapshot.bias
    }

    #[inline]
    fn last_input(&self) -> Option<&[f64]> {
        self.snapshot.last_input()
    }

    #[inline]
    fn last_output(&self) -> Option<f64> {
        self.snapshot.last_output
    }

    fn predict(&mut self, sample: &[f64]) -> Result<f64> {
        self.snapshot.predict(sample)
    }

    fn update(&mut self, weights: Vec<f64>) -> Result<()> {
        self.live.update(weights)
    }
}
