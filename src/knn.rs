//! k-nearest-neighbours classification.

use std::fmt;

use crate::linalg::{self, Metric, Vector};
use crate::model_selection::{self, Shuffle};
use crate::{Classifier, Error, Result};

/// Majority vote among the `k` training samples closest to a query.
#[derive(Clone)]
pub struct KNearestClassifier<L> {
    k: usize,
    metric: Metric,
    fitted: Option<(Vec<Vector>, Vec<L>)>,
}

impl<L: fmt::Debug> fmt::Debug for KNearestClassifier<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KNearestClassifier")
            .field("k", &self.k)
            .field("fitted", &self.fitted.as_ref().map(|(x, _)| x.len()))
            .finish_non_exhaustive()
    }
}

impl<L> Default for KNearestClassifier<L> {
    fn default() -> Self {
        Self {
            k: 5,
            metric: linalg::euclidean,
            fitted: None,
        }
    }
}

impl<L> KNearestClassifier<L> {
    pub fn new(k: usize, metric: Metric) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfig("k must be > 0".to_owned()));
        }
        Ok(Self {
            k,
            metric,
            fitted: None,
        })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn metric(&self) -> Metric {
        self.metric
    }
}

impl<L: Clone + Ord> KNearestClassifier<L> {
    /// Remember the training samples. Nothing is computed until prediction.
    pub fn fit(&mut self, x: &[Vector], y: &[L]) -> Result<()> {
        linalg::check_dimension_match(x, y, false)?;
        self.fitted = Some((x.to_vec(), y.to_vec()));
        Ok(())
    }

    /// Predict the label of a single sample.
    ///
    /// Neighbours at equal distance keep their training order. When two labels
    /// get the same number of votes, the one with the nearest neighbour wins.
    pub fn predict_one(&self, sample: &[f64]) -> Result<L> {
        let Some((x, y)) = &self.fitted else {
            return Err(Error::NotFitted("predict"));
        };
        if sample.len() != x[0].len() {
            return Err(Error::InvalidShape(format!(
                "sample has {} features, expected {}",
                sample.len(),
                x[0].len()
            )));
        }

        let mut neighbours: Vec<(f64, &L)> = x
            .iter()
            .zip(y)
            .map(|(row, label)| ((self.metric)(sample, row), label))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));

        // (label, votes) in order of first appearance.
        let mut votes: Vec<(&L, usize)> = Vec::new();
        for &(_, label) in neighbours.iter().take(self.k) {
            match votes.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => votes.push((label, 1)),
            }
        }

        let mut winner = votes[0];
        for &candidate in &votes[1..] {
            if candidate.1 > winner.1 {
                winner = candidate;
            }
        }
        Ok(winner.0.clone())
    }

    /// Predict one label per row of `x`.
    pub fn predict(&self, x: &[Vector]) -> Result<Vec<L>> {
        if self.fitted.is_none() {
            return Err(Error::NotFitted("predict"));
        }
        x.iter().map(|sample| self.predict_one(sample)).collect()
    }

    /// Accuracy on `(x, y)`.
    pub fn score(&self, x: &[Vector], y: &[L]) -> Result<f64> {
        if self.fitted.is_none() {
            return Err(Error::NotFitted("score"));
        }
        let y_pred = self.predict(x)?;
        crate::metrics::accuracy(y, &y_pred)
    }

    /// Pick the `k` among `ks` with the best mean k-fold accuracy.
    ///
    /// Returns that `k` along with the mean accuracy of every candidate, in the
    /// order given. The first candidate wins ties.
    pub fn best(
        x: &[Vector],
        y: &[L],
        ks: &[usize],
        n_folds: usize,
        metric: Metric,
        shuffle: Shuffle,
    ) -> Result<(usize, Vec<(usize, f64)>)> {
        if ks.len() < 2 {
            return Err(Error::InvalidConfig(
                "you must pass more than one k to evaluate".to_owned(),
            ));
        }

        let mut report = Vec::with_capacity(ks.len());
        for &k in ks {
            let mut clf = Self::new(k, metric)?;
            let accuracies = model_selection::k_fold(&mut clf, x, y, n_folds, shuffle)?;
            let mean = accuracies.iter().sum::<f64>() / accuracies.len() as f64;
            log::debug!("k = {k}: mean accuracy {mean:.4}");
            report.push((k, mean));
        }

        let mut best = report[0];
        for &entry in &report[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        log::info!("best k = {} (mean accuracy {:.4})", best.0, best.1);
        Ok((best.0, report))
    }
}

impl<L: Clone + Ord> Classifier<L> for KNearestClassifier<L> {
    fn fit(&mut self, x: &[Vector], y: &[L]) -> Result<()> {
        KNearestClassifier::fit(self, x, y)
    }

    fn predict(&mut self, x: &[Vector]) -> Result<Vec<L>> {
        KNearestClassifier::predict(self, x)
    }

    fn score(&mut self, x: &[Vector], y: &[L]) -> Result<f64> {
        KNearestClassifier::score(self, x, y)
    }
}
