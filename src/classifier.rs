use crate::linalg::Vector;
use crate::metrics::ConfusionMatrix;
use crate::Result;

/// A supervised model that can be fitted and queried with rows of features.
///
/// This is all the cross-validation helpers in [`crate::model_selection`] need.
pub trait Classifier<L> {
    fn fit(&mut self, x: &[Vector], y: &[L]) -> Result<()>;

    /// One label per row of `x`. Fails with `NotFitted` before `fit`.
    fn predict(&mut self, x: &[Vector]) -> Result<Vec<L>>;

    /// Fraction of rows of `x` whose predicted label equals the one in `y`.
    fn score(&mut self, x: &[Vector], y: &[L]) -> Result<f64>
    where
        L: Clone + Ord,
    {
        let y_pred = self.predict(x)?;
        ConfusionMatrix::new(y, &y_pred, None)?.accuracy()
    }
}
