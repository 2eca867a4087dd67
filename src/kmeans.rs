//! k-means / k-medians clustering.
//!
//! Centroids start at the first `n_fixed_points` samples plus a random choice
//! (without replacement) among the remaining ones. Fixed centroids never move.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::linalg::{self, Vector};
use crate::{Error, Result};

/// How a centroid is recomputed from its cluster members.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Per-dimension mean (k-means).
    #[default]
    Mean,
    /// Per-dimension median (k-medians).
    Median,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            other => Err(Error::InvalidConfig(format!(
                "invalid clustering strategy: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mean => "mean",
            Self::Median => "median",
        })
    }
}

impl Strategy {
    fn combine(self, values: &mut [f64]) -> f64 {
        match self {
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Median => {
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 1 {
                    values[mid]
                } else {
                    (values[mid - 1] + values[mid]) / 2.0
                }
            }
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub n_clusters: usize,
    /// Upper bound on assignment/update rounds. Fitting stops earlier once the
    /// assignment no longer changes.
    pub n_iterations: usize,
    pub strategy: Strategy,
    /// The first `n_fixed_points` samples are used as centroids that never move.
    pub n_fixed_points: usize,
    /// Seed for the initial centroids in [`KMeans::fit`].
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            n_iterations: 500,
            strategy: Strategy::Mean,
            n_fixed_points: 0,
            seed: 0,
        }
    }
}

impl KMeansParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidConfig("n_clusters must be > 0".to_owned()));
        }
        if self.n_iterations == 0 {
            return Err(Error::InvalidConfig("n_iterations must be > 0".to_owned()));
        }
        if self.n_fixed_points > self.n_clusters {
            return Err(Error::InvalidConfig(format!(
                "the number of fixed samples ({}) exceeds the number of clusters ({})",
                self.n_fixed_points, self.n_clusters
            )));
        }
        Ok(())
    }
}

/// A centroid and the samples assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    center: Vector,
    members: Vec<Vector>,
}

impl Cluster {
    pub fn new(center: Vector) -> Self {
        Self {
            center,
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, sample: Vector) {
        self.members.push(sample);
    }

    #[inline]
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    #[inline]
    pub fn members(&self) -> &[Vector] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of the euclidean distances from the center to every member.
    pub fn distance(&self) -> f64 {
        self.members
            .iter()
            .map(|m| linalg::euclidean(&self.center, m))
            .sum()
    }

    /// Per-dimension mean or median of the members.
    fn centroid(&self, strategy: Strategy) -> Vector {
        let mut column = Vec::with_capacity(self.members.len());
        (0..self.center.len())
            .map(|d| {
                column.clear();
                column.extend(self.members.iter().map(|m| m[d]));
                strategy.combine(&mut column)
            })
            .collect()
    }
}

/// Index of the centroid nearest to `sample`. The first one wins ties.
fn nearest(centroids: &[Vector], sample: &[f64]) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = linalg::euclidean(sample, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

#[derive(Debug, Clone)]
pub struct KMeans {
    params: KMeansParams,
    clusters: Option<Vec<Cluster>>,
    labels: Option<Vec<usize>>,
}

impl KMeans {
    pub fn new(params: KMeansParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            clusters: None,
            labels: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &KMeansParams {
        &self.params
    }

    /// Cluster index of every training sample, from the last assignment.
    pub fn labels(&self) -> Option<&[usize]> {
        self.labels.as_deref()
    }

    /// Centroids used by the last assignment.
    pub fn cluster_centers(&self) -> Option<Vec<&[f64]>> {
        self.clusters
            .as_ref()
            .map(|clusters| clusters.iter().map(Cluster::center).collect())
    }

    pub fn clusters(&self) -> Option<&[Cluster]> {
        self.clusters.as_deref()
    }

    /// Sum of [`Cluster::distance`] over all clusters.
    pub fn total_distance(&self) -> Option<f64> {
        self.clusters
            .as_ref()
            .map(|clusters| clusters.iter().map(Cluster::distance).sum())
    }

    /// Cluster `x`, drawing the initial centroids with `params.seed`.
    pub fn fit(&mut self, x: &[Vector]) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.fit_with_rng(x, &mut rng)
    }

    pub fn fit_with_rng<R: Rng + ?Sized>(&mut self, x: &[Vector], rng: &mut R) -> Result<()> {
        linalg::check_rows(x)?;
        let KMeansParams {
            n_clusters,
            n_iterations,
            strategy,
            n_fixed_points,
            ..
        } = self.params;
        if x.len() < n_clusters {
            return Err(Error::InvalidData(format!(
                "need at least {n_clusters} samples to form {n_clusters} clusters, got {}",
                x.len()
            )));
        }

        let mut centroids: Vec<Vector> = x[..n_fixed_points].to_vec();
        centroids.extend(
            x[n_fixed_points..]
                .choose_multiple(rng, n_clusters - n_fixed_points)
                .cloned(),
        );

        log::info!(
            "fitting {}-{strategy}: {} samples, {n_fixed_points} fixed centroids",
            n_clusters,
            x.len()
        );

        let mut labels: Vec<usize> = Vec::new();
        let mut clusters: Vec<Cluster> = Vec::new();
        for iteration in 0..n_iterations {
            let assignment: Vec<usize> = x.iter().map(|s| nearest(&centroids, s)).collect();
            let stable = assignment == labels;

            clusters = centroids.iter().cloned().map(Cluster::new).collect();
            for (sample, &label) in x.iter().zip(&assignment) {
                clusters[label].add(sample.clone());
            }
            labels = assignment;
            if stable {
                log::trace!("iteration {iteration}: assignment is stable");
                break;
            }

            for (centroid, cluster) in centroids
                .iter_mut()
                .zip(&clusters)
                .skip(n_fixed_points)
            {
                if cluster.len() > 1 {
                    *centroid = cluster.centroid(strategy);
                }
            }
            log::trace!(
                "iteration {iteration}: cluster sizes {:?}",
                clusters.iter().map(Cluster::len).collect::<Vec<_>>()
            );
        }

        log::info!(
            "clustering done: total distance {:.6}",
            clusters.iter().map(Cluster::distance).sum::<f64>()
        );
        self.clusters = Some(clusters);
        self.labels = Some(labels);
        Ok(())
    }

    /// Index of the cluster whose center is nearest to `sample`.
    pub fn predict_one(&self, sample: &[f64]) -> Result<usize> {
        let Some(clusters) = &self.clusters else {
            return Err(Error::NotFitted("predict"));
        };
        let width = clusters[0].center().len();
        if sample.len() != width {
            return Err(Error::InvalidShape(format!(
                "sample has {} features, expected {width}",
                sample.len()
            )));
        }

        let mut best = (0, f64::INFINITY);
        for (i, cluster) in clusters.iter().enumerate() {
            let d = linalg::euclidean(sample, cluster.center());
            if d < best.1 {
                best = (i, d);
            }
        }
        Ok(best.0)
    }

    pub fn predict(&self, x: &[Vector]) -> Result<Vec<usize>> {
        if self.clusters.is_none() {
            return Err(Error::NotFitted("predict"));
        }
        x.iter().map(|sample| self.predict_one(sample)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[[f64; 2]]) -> Vec<Vector> {
        values.iter().map(|r| r.to_vec()).collect()
    }

    fn two_blobs() -> Vec<Vector> {
        rows(&[
            [0.0, 0.0],
            [100.0, 120.0],
            [1.0, 0.0],
            [101.0, 120.0],
            [0.0, 1.0],
            [100.0, 121.0],
            [1.0, 1.0],
            [101.0, 121.0],
        ])
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("mean".parse::<Strategy>().unwrap(), Strategy::Mean);
        assert_eq!("median".parse::<Strategy>().unwrap(), Strategy::Median);
        assert!(matches!(
            "".parse::<Strategy>(),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(Strategy::Median.to_string(), "median");
    }

    #[test]
    fn params_validation() {
        assert!(KMeansParams::default().validate().is_ok());
        assert!(KMeans::new(KMeansParams {
            n_clusters: 4,
            n_fixed_points: 5,
            ..KMeansParams::default()
        })
        .is_err());
        assert!(KMeans::new(KMeansParams {
            n_clusters: 0,
            ..KMeansParams::default()
        })
        .is_err());
    }

    #[test]
    fn combine_mean_and_median() {
        assert_eq!(Strategy::Mean.combine(&mut [1.0, 2.0, 6.0]), 3.0);
        assert_eq!(Strategy::Median.combine(&mut [6.0, 1.0, 2.0]), 2.0);
        assert_eq!(Strategy::Median.combine(&mut [4.0, 1.0, 2.0, 100.0]), 3.0);
    }

    #[test]
    fn cluster_total_distance() {
        let mut cluster = Cluster::new(vec![0.0, 0.0]);
        assert!(cluster.is_empty());
        assert_eq!(cluster.distance(), 0.0);

        cluster.add(vec![0.0, 0.0]);
        assert_eq!(cluster.distance(), 0.0);
        cluster.add(vec![3.0, 4.0]);
        assert_eq!(cluster.distance(), 5.0);
        cluster.add(vec![5.0, 12.0]);
        assert_eq!(cluster.distance(), 18.0);
        assert_eq!(cluster.len(), 3);
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        let km = KMeans::new(KMeansParams::default()).unwrap();
        assert_eq!(
            km.predict(&rows(&[[1.0, 2.0], [3.0, 4.0]])),
            Err(Error::NotFitted("predict"))
        );
        assert!(km.labels().is_none());
        assert!(km.cluster_centers().is_none());
    }

    #[test]
    fn every_sample_its_own_cluster() {
        let mut km = KMeans::new(KMeansParams::default()).unwrap();
        km.fit(&rows(&[[1.0, 1.0], [5.0, 5.0], [10.0, 10.0]])).unwrap();

        let labels = km.predict(&rows(&[[1.0, 1.0], [5.0, 5.0], [10.0, 10.0]])).unwrap();
        let (c0, c1, c2) = (labels[0], labels[1], labels[2]);
        let mut distinct = labels.clone();
        distinct.sort_unstable();
        assert_eq!(distinct, vec![0, 1, 2]);
        assert_eq!(km.labels(), Some(&labels[..]));

        assert_eq!(km.predict_one(&[0.0, 0.0]).unwrap(), c0);
        assert_eq!(km.predict_one(&[4.0, 4.0]).unwrap(), c1);
        assert_eq!(km.predict_one(&[11.0, 11.0]).unwrap(), c2);
        assert!(matches!(
            km.predict_one(&[1.0]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn recovers_two_blobs_with_either_strategy() {
        for strategy in [Strategy::Mean, Strategy::Median] {
            for seed in 0..10 {
                let mut km = KMeans::new(KMeansParams {
                    n_clusters: 2,
                    strategy,
                    seed,
                    ..KMeansParams::default()
                })
                .unwrap();
                km.fit(&two_blobs()).unwrap();

                let mut centers: Vec<Vec<f64>> = km
                    .cluster_centers()
                    .unwrap()
                    .into_iter()
                    .map(<[f64]>::to_vec)
                    .collect();
                centers.sort_by(|a, b| a[0].total_cmp(&b[0]));
                assert_eq!(centers, vec![vec![0.5, 0.5], vec![100.5, 120.5]]);

                let labels = km.labels().unwrap();
                for pair in labels.chunks(2) {
                    assert_ne!(pair[0], pair[1]);
                }
                let total = km.total_distance().unwrap();
                assert!((total - 8.0 * 0.5_f64.sqrt()).abs() < 1e-9, "total {total}");
            }
        }
    }

    #[test]
    fn fixed_centroids_do_not_move() {
        let x = rows(&[
            [5.0, 7.0],
            [0.0, 0.0],
            [1.0, 1.0],
            [50.0, 50.0],
            [51.0, 51.0],
        ]);
        let mut km = KMeans::new(KMeansParams {
            n_clusters: 2,
            n_fixed_points: 2,
            ..KMeansParams::default()
        })
        .unwrap();
        km.fit(&x).unwrap();
        assert_eq!(
            km.cluster_centers().unwrap(),
            vec![&[5.0, 7.0][..], &[0.0, 0.0][..]]
        );
        assert_eq!(km.labels().unwrap(), &[0, 1, 1, 0, 0]);
    }

    #[test]
    fn fit_needs_enough_samples() {
        let mut km = KMeans::new(KMeansParams::default()).unwrap();
        assert!(matches!(
            km.fit(&rows(&[[1.0, 1.0], [2.0, 2.0]])),
            Err(Error::InvalidData(_))
        ));
        assert!(km.labels().is_none());
    }

    #[test]
    fn same_seed_same_clustering() {
        let x: Vec<Vector> = (0..30)
            .map(|i| vec![(i * 7 % 11) as f64, (i * 5 % 13) as f64])
            .collect();
        let params = KMeansParams {
            seed: 3,
            ..KMeansParams::default()
        };
        let mut a = KMeans::new(params).unwrap();
        let mut b = KMeans::new(params).unwrap();
        a.fit(&x).unwrap();
        b.fit(&x).unwrap();
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.cluster_centers(), b.cluster_centers());
    }
}
