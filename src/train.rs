use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::linalg::{self, Vector};
use crate::mlp::{self, MlpClassifier};
use crate::{Classifier, Error, Result};

/// Hyperparameters of an [`MlpClassifier`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlpParams {
    /// Number of hidden layers. The network has `hidden_layer_count + 2` layers.
    pub hidden_layer_count: usize,
    /// Units per hidden layer.
    pub hidden_layer_size: usize,
    pub learning_rate: f64,
    /// Passes over the training set.
    pub epoch_count: usize,
    /// Seed for weight initialization in [`MlpClassifier::fit`].
    pub seed: u64,
}

impl Default for MlpParams {
    fn default() -> Self {
        Self {
            hidden_layer_count: 1,
            hidden_layer_size: 4,
            learning_rate: 0.3,
            epoch_count: 100,
            seed: 0,
        }
    }
}

impl MlpParams {
    pub fn validate(&self) -> Result<()> {
        if self.hidden_layer_count > 0 && self.hidden_layer_size == 0 {
            return Err(Error::InvalidConfig(
                "hidden_layer_size must be > 0 when there are hidden layers".to_owned(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Mean half squared error over the last epoch, measured before each update.
    pub final_loss: f64,
    pub epochs: usize,
}

impl<L: Clone + Ord> MlpClassifier<L> {
    /// Build a fresh network and train it online on `(x, y)`.
    ///
    /// Weights are He-initialized from `params.seed`. Calling `fit` again
    /// discards the previous network.
    pub fn fit(&mut self, x: &[Vector], y: &[L]) -> Result<FitReport> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.fit_with_rng(x, y, &mut rng)
    }

    /// Like [`fit`](Self::fit), drawing initial weights from `rng`.
    ///
    /// `y` must contain exactly two distinct labels; the smaller one is trained
    /// towards activation 0 and the larger one towards activation 1.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        x: &[Vector],
        y: &[L],
        rng: &mut R,
    ) -> Result<FitReport> {
        linalg::check_dimension_match(x, y, false)?;

        let classes: BTreeSet<&L> = y.iter().collect();
        if classes.len() > 2 {
            return Err(Error::TooManyClasses(classes.len()));
        }
        let mut classes = classes.into_iter().cloned();
        let class_map = match (classes.next(), classes.next()) {
            (Some(neg), Some(pos)) => [neg, pos],
            _ => {
                return Err(Error::InvalidData(
                    "y must contain two distinct classes".to_owned(),
                ))
            }
        };

        let n_features = x[0].len();
        let layers = mlp::build_layers(&self.params, n_features, rng)?;
        let targets: Vec<f64> = y
            .iter()
            .map(|label| if *label == class_map[1] { 1.0 } else { 0.0 })
            .collect();

        log::info!(
            "fitting mlp: widths {:?}, {} samples, {} epochs, learning rate {}",
            layers.iter().map(Vec::len).collect::<Vec<_>>(),
            x.len(),
            self.params.epoch_count,
            self.params.learning_rate
        );

        self.class_map = Some(class_map);
        let layers = self.layers.insert(layers);

        let mut epoch_loss = 0.0;
        for epoch in 0..self.params.epoch_count {
            epoch_loss = 0.0;
            for (sample, &target) in x.iter().zip(&targets) {
                epoch_loss +=
                    mlp::update_weights(layers, sample, target, self.params.learning_rate)?;
            }
            epoch_loss /= x.len() as f64;
            log::debug!(
                "epoch {}/{}: loss {:.6}",
                epoch + 1,
                self.params.epoch_count,
                epoch_loss
            );
        }

        log::info!("mlp fitted: final loss {epoch_loss:.6}");
        Ok(FitReport {
            final_loss: epoch_loss,
            epochs: self.params.epoch_count,
        })
    }

    /// Predict the label of a single sample.
    pub fn predict_one(&mut self, sample: &[f64]) -> Result<L> {
        let Some([neg, pos]) = self.class_map.as_ref() else {
            return Err(Error::NotFitted("predict"));
        };
        let (neg, pos) = (neg.clone(), pos.clone());

        let values = self.transform(sample)?;
        let [value] = values.as_slice() else {
            return Err(Error::InvalidShape(format!(
                "expected a single output value, got {}",
                values.len()
            )));
        };

        // Nearest of {0, 1}; a tie goes to 0.
        Ok(if (value - 0.0).abs() <= (value - 1.0).abs() {
            neg
        } else {
            pos
        })
    }

    /// Predict one label per row of `x`.
    pub fn predict(&mut self, x: &[Vector]) -> Result<Vec<L>> {
        if self.class_map.is_none() {
            return Err(Error::NotFitted("predict"));
        }
        x.iter().map(|sample| self.predict_one(sample)).collect()
    }
}

impl<L: Clone + Ord> Classifier<L> for MlpClassifier<L> {
    fn fit(&mut self, x: &[Vector], y: &[L]) -> Result<()> {
        MlpClassifier::fit(self, x, y).map(|_| ())
    }

    fn predict(&mut self, x: &[Vector]) -> Result<Vec<L>> {
        MlpClassifier::predict(self, x)
    }
}
