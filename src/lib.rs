//! Small from-scratch learning models.
//!
//! `scratch-learn` implements a handful of classic models with nothing but scalar
//! arithmetic over `Vec<f64>`. It is meant to be read: every model is a few hundred
//! lines and keeps its intermediate state inspectable.
//!
//! - [`MlpClassifier`]: binary multi-layer perceptron trained online by
//!   backpropagation, built from individual [`Perceptron`] units.
//! - [`KNearestClassifier`]: k-nearest-neighbours vote with pluggable distance.
//! - [`KMeans`]: k-means / k-medians clustering with optional fixed centroids.
//! - [`model_selection`]: train/test split and k-fold cross-validation over any
//!   [`Classifier`].
//!
//! # Data layout
//!
//! - Scalars are `f64`.
//! - A sample is a [`Vector`] (`Vec<f64>`); a dataset is a slice of samples plus
//!   a slice of labels of the same length.
//! - Labels are generic (`L: Clone + Ord`), so integers and strings both work.
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`]. Inputs are validated before any
//! state is mutated, so a failed `fit` leaves a model as it was.
//!
//! # Randomness
//!
//! Models that need randomness take a `seed` in their parameters, or an explicit
//! `rand::Rng` through their `*_with_rng` variants. There is no global generator.

//! # Quick start
//!
//! ```rust
//! use scratch_learn::{MlpClassifier, MlpParams};
//!
//! # fn main() -> scratch_learn::Result<()> {
//! let x = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let y = ["off", "on", "on", "on"];
//!
//! let mut clf = MlpClassifier::new(MlpParams {
//!     hidden_layer_count: 1,
//!     hidden_layer_size: 4,
//!     learning_rate: 0.7,
//!     epoch_count: 1_000,
//!     seed: 0,
//! })?;
//! let report = clf.fit(&x, &y)?;
//! assert_eq!(report.epochs, 1_000);
//!
//! let labels = clf.predict(&x)?;
//! assert_eq!(labels.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod classifier;
pub mod data;
pub mod error;
pub mod gradient;
pub mod kmeans;
pub mod knn;
pub mod linalg;
pub mod metrics;
pub mod mlp;
pub mod model_selection;
pub mod perceptron;
pub mod train;

pub use activation::Activation;
pub use classifier::Classifier;
pub use data::Dataset;
pub use error::{Error, Result};
pub use gradient::Gradient;
pub use kmeans::{Cluster, KMeans, KMeansParams, Strategy};
pub use knn::KNearestClassifier;
pub use linalg::{Matrix, Metric, Vector};
pub use metrics::ConfusionMatrix;
pub use mlp::{Layer, MlpClassifier};
pub use model_selection::{k_fold, train_test_split, Shuffle, Split};
pub use perceptron::{Perceptron, Unit, UpdatingPerceptron};
pub use train::{FitReport, MlpParams};
