//! Binary MLP classifier.
//!
//! The network is a list of layers of [`Perceptron`]s:
//!
//! - layer 0: one input unit per feature (identity, weight 1)
//! - `hidden_layer_count` hidden layers of `hidden_layer_size` sigmoid units
//! - one output layer with a single sigmoid unit
//!
//! Every unit of a layer receives the full output vector of the previous layer.
//! Training is online: one forward pass and one backpropagation step per sample.
//! See `train.rs` for `fit` / `predict`.

use rand::Rng;

use crate::perceptron::{Perceptron, Unit, UpdatingPerceptron};
use crate::{Error, Gradient, MlpParams, Result};

/// The units of one layer, in connection order.
pub type Layer = Vec<Perceptron>;

#[derive(Debug, Clone)]
pub struct MlpClassifier<L> {
    pub(crate) params: MlpParams,
    pub(crate) layers: Option<Vec<Layer>>,
    /// `class_map[0]` is trained towards activation 0, `class_map[1]` towards 1.
    pub(crate) class_map: Option<[L; 2]>,
}

impl<L> MlpClassifier<L> {
    pub fn new(params: MlpParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            layers: None,
            class_map: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &MlpParams {
        &self.params
    }

    /// The layers built by `fit`, or `None` before the first successful `fit`.
    #[inline]
    pub fn layers(&self) -> Option<&[Layer]> {
        self.layers.as_deref()
    }

    /// Number of units per layer, input layer first.
    pub fn layer_widths(&self) -> Option<Vec<usize>> {
        self.layers
            .as_ref()
            .map(|layers| layers.iter().map(Vec::len).collect())
    }

    /// The `(negative, positive)` labels seen by `fit`.
    #[inline]
    pub fn class_map(&self) -> Option<(&L, &L)> {
        self.class_map.as_ref().map(|[neg, pos]| (neg, pos))
    }

    /// Forward pass for a single sample.
    ///
    /// Refreshes the cached input/output of every unit and returns the output
    /// layer's activations (one value for this binary design).
    pub fn transform(&mut self, sample: &[f64]) -> Result<Vec<f64>> {
        let layers = self.layers.as_mut().ok_or(Error::NotFitted("transform"))?;
        forward(layers, sample)
    }
}

/// Build a fresh topology for `n_features` inputs.
pub(crate) fn build_layers<R: Rng + ?Sized>(
    params: &MlpParams,
    n_features: usize,
    rng: &mut R,
) -> Result<Vec<Layer>> {
    let mut layers = Vec::with_capacity(params.hidden_layer_count + 2);
    layers.push((0..n_features).map(|_| Perceptron::input()).collect::<Layer>());

    let mut in_dim = n_features;
    for _ in 0..params.hidden_layer_count {
        let layer = (0..params.hidden_layer_size)
            .map(|_| Perceptron::new(in_dim, 0.0, rng))
            .collect::<Result<Layer>>()?;
        layers.push(layer);
        in_dim = params.hidden_layer_size;
    }

    layers.push(vec![Perceptron::new(in_dim, 0.0, rng)?]);
    Ok(layers)
}

pub(crate) fn forward(layers: &mut [Layer], sample: &[f64]) -> Result<Vec<f64>> {
    let Some((input_layer, rest)) = layers.split_first_mut() else {
        return Err(Error::NotFitted("transform"));
    };
    if sample.len() != input_layer.len() {
        return Err(Error::InvalidShape(format!(
            "sample size ({}) must match the number of input units ({})",
            sample.len(),
            input_layer.len()
        )));
    }

    let mut output = input_layer
        .iter_mut()
        .zip(sample)
        .map(|(unit, &feature)| unit.predict(&[feature]))
        .collect::<Result<Vec<f64>>>()?;

    for layer in rest {
        output = layer
            .iter_mut()
            .map(|unit| unit.predict(&output))
            .collect::<Result<Vec<f64>>>()?;
    }

    Ok(output)
}

/// One online backpropagation step.
///
/// `target` is the desired output activation (0.0 or 1.0). Returns the
/// half squared error `(target - output)^2 / 2` of the forward pass that the
/// gradients were computed from.
pub(crate) fn update_weights(
    layers: &mut [Layer],
    sample: &[f64],
    target: f64,
    learning_rate: f64,
) -> Result<f64> {
    let output = forward(layers, sample)?;
    let error: f64 = output
        .iter()
        .map(|&a| 0.5 * (target - a) * (target - a))
        .sum();

    let mut wrapped: Vec<Vec<UpdatingPerceptron<'_>>> = layers
        .iter_mut()
        .map(|layer| layer.iter_mut().map(UpdatingPerceptron::new).collect())
        .collect();

    // The input layer has nothing to train.
    let last = wrapped.len() - 1;
    for idx in (1..wrapped.len()).rev() {
        let (before, rest) = wrapped.split_at_mut(idx);
        let (current, after) = rest.split_at_mut(1);
        let previous = &before[idx - 1];
        let current = &mut current[0];

        if idx == last {
            update_output_layer(previous, current, target, learning_rate)?;
        } else {
            update_hidden_layer(previous, current, &after[0], learning_rate)?;
        }
    }

    Ok(error)
}

fn update_output_layer(
    previous: &[UpdatingPerceptron<'_>],
    current: &mut [UpdatingPerceptron<'_>],
    target: f64,
    learning_rate: f64,
) -> Result<()> {
    for unit in current.iter_mut() {
        let a_i = cached_output(&*unit)?;
        let slope_i = unit.activation().grad_from_output(a_i);

        // dE/da for E = (t - a)^2 / 2.
        let d_activation = -(target - a_i);

        let mut deltas = Vec::with_capacity(previous.len());
        for prev in previous {
            let a_j = cached_output(prev)?;
            let gradient = Gradient::new(d_activation, a_j * slope_i * d_activation);
            unit.put(gradient);
            deltas.push(gradient.delta(learning_rate));
        }

        apply_deltas(unit, &deltas)?;
    }
    Ok(())
}

fn update_hidden_layer(
    previous: &[UpdatingPerceptron<'_>],
    current: &mut [UpdatingPerceptron<'_>],
    next: &[UpdatingPerceptron<'_>],
    learning_rate: f64,
) -> Result<()> {
    for (i, unit) in current.iter_mut().enumerate() {
        let a_i = cached_output(&*unit)?;
        let slope_i = unit.activation().grad_from_output(a_i);

        // Error flowing back into unit i from every unit k of the next layer,
        // through the weight k holds on its connection from i.
        let mut d_activation = 0.0;
        for next_unit in next {
            let a_k = cached_output(next_unit)?;
            let (w_ki, d_activation_k) = connection(next_unit, i)?;
            d_activation += w_ki * next_unit.activation().grad_from_output(a_k) * d_activation_k;
        }

        let mut deltas = Vec::with_capacity(previous.len());
        for prev in previous {
            let a_j = cached_output(prev)?;
            let gradient = Gradient::new(d_activation, a_j * slope_i * d_activation);
            unit.put(gradient);
            deltas.push(gradient.delta(learning_rate));
        }

        apply_deltas(unit, &deltas)?;
    }
    Ok(())
}

/// Weight and recorded ∂E/∂a of `unit`'s `i`-th upstream connection.
fn connection(unit: &UpdatingPerceptron<'_>, i: usize) -> Result<(f64, f64)> {
    let weight = unit.weights().get(i).copied();
    let gradient = unit.gradients().get(i);
    match (weight, gradient) {
        (Some(w), Some(g)) => Ok((w, g.d_activation.unwrap_or(0.0))),
        _ => Err(Error::InvalidShape(format!(
            "downstream unit has {} weights and {} gradients, connection {i} is missing",
            unit.weights().len(),
            unit.gradients().len()
        ))),
    }
}

fn cached_output(unit: &impl Unit) -> Result<f64> {
    unit.last_output().ok_or_else(|| {
        Error::InvalidData("unit has no cached output; run a forward pass first".to_owned())
    })
}

fn apply_deltas(unit: &mut UpdatingPerceptron<'_>, deltas: &[f64]) -> Result<()> {
    let weights = unit
        .weights()
        .iter()
        .zip(deltas)
        .map(|(w, dw)| w + dw)
        .collect();
    unit.update(weights)
}
