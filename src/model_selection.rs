//! Train/test splitting and k-fold cross-validation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::linalg::{self, Vector};
use crate::metrics::ConfusionMatrix;
use crate::{Classifier, Error, Result};

/// Sample order used by the splitting helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shuffle {
    /// Keep the input order.
    #[default]
    None,
    /// Shuffle with a `StdRng` seeded from the given value.
    Seeded(u64),
}

impl Shuffle {
    fn rng(self) -> Option<StdRng> {
        match self {
            Self::None => None,
            Self::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        }
    }
}

fn permutation(n: usize, rng: Option<&mut StdRng>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    if let Some(rng) = rng {
        order.shuffle(rng);
    }
    order
}

/// Split `items` into `n` contiguous parts whose lengths differ by at most one.
///
/// The first `len % n` parts get the extra item, as `numpy.array_split` does.
pub fn array_split<T>(items: &[T], n: usize) -> Result<Vec<&[T]>> {
    if n == 0 {
        return Err(Error::InvalidConfig("n must be > 0".to_owned()));
    }
    if n > items.len() {
        return Err(Error::InvalidConfig(format!(
            "n ({n}) must be less or equal than the length of the slice ({})",
            items.len()
        )));
    }

    let (k, m) = (items.len() / n, items.len() % n);
    Ok((0..n)
        .map(|i| {
            let start = i * k + i.min(m);
            let end = (i + 1) * k + (i + 1).min(m);
            &items[start..end]
        })
        .collect())
}

/// The four sets produced by [`train_test_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split<L> {
    pub x_train: Vec<Vector>,
    pub y_train: Vec<L>,
    pub x_test: Vec<Vector>,
    pub y_test: Vec<L>,
}

fn gather<L: Clone>(x: &[Vector], y: &[L], indices: &[usize]) -> (Vec<Vector>, Vec<L>) {
    indices.iter().map(|&i| (x[i].clone(), y[i].clone())).unzip()
}

/// Split samples into a training and a test set.
///
/// After ordering the samples according to `shuffle`, the first
/// `floor(n * (1 - test_ratio))` of them go to the training set.
pub fn train_test_split<L: Clone>(
    x: &[Vector],
    y: &[L],
    test_ratio: f64,
    shuffle: Shuffle,
) -> Result<Split<L>> {
    let n = linalg::check_dimension_match(x, y, true)?;
    if !(0.0..=1.0).contains(&test_ratio) {
        return Err(Error::InvalidConfig(format!(
            "test_ratio must be in [0, 1], got {test_ratio}"
        )));
    }

    let order = permutation(n, shuffle.rng().as_mut());
    let train_size = (n as f64 * (1.0 - test_ratio)) as usize;
    let (train, test) = order.split_at(train_size.min(n));

    let (x_train, y_train) = gather(x, y, train);
    let (x_test, y_test) = gather(x, y, test);
    Ok(Split {
        x_train,
        y_train,
        x_test,
        y_test,
    })
}

/// Estimate the accuracy of `clf` with `n_folds` rounds of cross-validation.
///
/// Each round orders the samples according to `shuffle`, splits them into
/// `n_folds` folds with [`array_split`], fits on all folds but the first and
/// measures the accuracy on the first one. Returns one accuracy per round.
pub fn k_fold<L, C>(
    clf: &mut C,
    x: &[Vector],
    y: &[L],
    n_folds: usize,
    shuffle: Shuffle,
) -> Result<Vec<f64>>
where
    L: Clone + Ord,
    C: Classifier<L> + ?Sized,
{
    let n = linalg::check_dimension_match(x, y, false)?;
    if n_folds < 2 {
        return Err(Error::InvalidConfig(format!(
            "n_folds ({n_folds}) must be greater than one"
        )));
    }
    if n_folds > n {
        return Err(Error::InvalidConfig(format!(
            "n_folds ({n_folds}) must be less or equal than the number of samples ({n})"
        )));
    }

    let mut rng = shuffle.rng();
    let mut accuracies = Vec::with_capacity(n_folds);
    for round in 0..n_folds {
        let order = permutation(n, rng.as_mut());
        let folds = array_split(&order, n_folds)?;
        let (test, train) = folds
            .split_first()
            .ok_or_else(|| Error::InvalidConfig("no folds to evaluate".to_owned()))?;
        let train: Vec<usize> = train.iter().flat_map(|fold| fold.iter().copied()).collect();

        let (x_train, y_train) = gather(x, y, &train);
        let (x_test, y_test) = gather(x, y, test);

        clf.fit(&x_train, &y_train)?;
        let y_pred = clf.predict(&x_test)?;
        let accuracy = ConfusionMatrix::new(&y_test, &y_pred, None)?.accuracy()?;
        log::debug!("k-fold round {}/{n_folds}: accuracy {accuracy:.4}", round + 1);
        accuracies.push(accuracy);
    }

    Ok(accuracies)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Returns canned predictions, one batch per call to `predict`.
    struct Replay(VecDeque<Vec<i32>>);

    impl Replay {
        fn new(batches: &[&[i32]]) -> Self {
            Self(batches.iter().map(|b| b.to_vec()).collect())
        }
    }

    impl Classifier<i32> for Replay {
        fn fit(&mut self, _x: &[Vector], _y: &[i32]) -> Result<()> {
            Ok(())
        }

        fn predict(&mut self, _x: &[Vector]) -> Result<Vec<i32>> {
            self.0.pop_front().ok_or(Error::NotFitted("predict"))
        }
    }

    fn rows(values: &[&[f64]]) -> Vec<Vector> {
        values.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn array_split_cases() {
        let items = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(
            array_split(&items, 3).unwrap(),
            vec![&[1, 2, 3, 4][..], &[5, 6, 7], &[8, 9, 10]]
        );
        assert_eq!(
            array_split(&items, 4).unwrap(),
            vec![&[1, 2, 3][..], &[4, 5, 6], &[7, 8], &[9, 10]]
        );
        assert_eq!(array_split(&items, 1).unwrap(), vec![&items[..]]);
        assert_eq!(array_split(&items, 10).unwrap().len(), 10);

        assert!(array_split(&items, 11).is_err());
        assert!(array_split(&items, 0).is_err());
        assert!(array_split::<i32>(&[], 1).is_err());
    }

    #[test]
    fn train_test_split_keeps_order_without_shuffle() {
        let x = rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0], &[10.0, 11.0, 12.0]]);
        let y = [0, 1, 2, 3];

        let split = train_test_split(&x, &y, 0.5, Shuffle::None).unwrap();
        assert_eq!(split.x_train, x[..2].to_vec());
        assert_eq!(split.y_train, vec![0, 1]);
        assert_eq!(split.x_test, x[2..].to_vec());
        assert_eq!(split.y_test, vec![2, 3]);

        let split = train_test_split(&x, &y, 0.25, Shuffle::None).unwrap();
        assert_eq!(split.y_train, vec![0, 1, 2]);
        assert_eq!(split.y_test, vec![3]);

        let split = train_test_split(&x[..3], &y[..3], 0.33, Shuffle::None).unwrap();
        assert_eq!(split.y_train, vec![0, 1]);
        assert_eq!(split.y_test, vec![2]);
    }

    #[test]
    fn seeded_split_is_a_reproducible_permutation() {
        let x: Vec<Vector> = (0..20).map(|i| vec![i as f64]).collect();
        let y: Vec<usize> = (0..20).collect();

        let a = train_test_split(&x, &y, 0.3, Shuffle::Seeded(7)).unwrap();
        let b = train_test_split(&x, &y, 0.3, Shuffle::Seeded(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.y_train.len(), 14);
        assert_eq!(a.y_test.len(), 6);

        let mut all: Vec<usize> = a.y_train.iter().chain(&a.y_test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, y);
        for (row, label) in a.x_train.iter().zip(&a.y_train) {
            assert_eq!(row[0], *label as f64);
        }
    }

    #[test]
    fn train_test_split_rejects_bad_input() {
        let x = rows(&[&[1.0], &[2.0]]);
        assert!(train_test_split(&x, &[0], 0.5, Shuffle::None).is_err());
        assert!(train_test_split(&x, &[0, 1], 1.5, Shuffle::None).is_err());
    }

    #[test]
    fn k_fold_validates_arguments() {
        let mut clf = Replay::new(&[]);
        assert!(matches!(
            k_fold::<i32, _>(&mut clf, &[], &[], 5, Shuffle::None),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            k_fold(&mut clf, &rows(&[&[1.0, 2.0], &[3.0, 4.0]]), &[1, 2], 3, Shuffle::None),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            k_fold(&mut clf, &rows(&[&[1.0, 2.0, 3.0]]), &[1], 1, Shuffle::None),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn k_fold_scores_the_held_out_fold() {
        let x = rows(&[
            &[1.0, 2.0, 3.0],
            &[1.0, 4.0, 7.0],
            &[4.0, 5.0, 6.0],
            &[2.0, 5.0, 8.0],
            &[7.0, 8.0, 9.0],
            &[3.0, 6.0, 9.0],
            &[1.0, 4.0, 6.0],
            &[1.0, 5.0, 8.0],
        ]);
        let y = [0, 1, 0, 1, 0, 1, 0, 1];
        let mut clf = Replay::new(&[&[0, 1, 0, 1], &[1, 0, 0, 1]]);
        assert_eq!(
            k_fold(&mut clf, &x, &y, 2, Shuffle::None).unwrap(),
            vec![1.0, 0.5]
        );

        let x: Vec<Vector> = (0..12).map(|i| vec![i as f64, 0.0]).collect();
        let y: Vec<i32> = (0..12).map(|i| i % 2).collect();
        let mut clf = Replay::new(&[&[0, 0, 1, 0], &[0, 1, 1, 0], &[0, 1, 0, 0]]);
        assert_eq!(
            k_fold(&mut clf, &x, &y, 3, Shuffle::None).unwrap(),
            vec![0.25, 0.5, 0.75]
        );
    }
}
