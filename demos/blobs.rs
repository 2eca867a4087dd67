use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use scratch_learn::linalg::{self, Vector};
use scratch_learn::{
    k_fold, train_test_split, KMeans, KMeansParams, KNearestClassifier, Shuffle, Strategy,
};

/// `n` points per center, with gaussian noise of standard deviation `spread`.
fn blobs(
    centers: &[[f64; 2]],
    n: usize,
    spread: f64,
    seed: u64,
) -> anyhow::Result<(Vec<Vector>, Vec<usize>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, spread)?;
    let mut xs = Vec::with_capacity(centers.len() * n);
    let mut ys = Vec::with_capacity(centers.len() * n);
    for (label, c) in centers.iter().enumerate() {
        for _ in 0..n {
            xs.push(vec![c[0] + noise.sample(&mut rng), c[1] + noise.sample(&mut rng)]);
            ys.push(label);
        }
    }
    Ok((xs, ys))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let centers = [[0.0, 0.0], [6.0, 6.0], [-6.0, 6.0]];
    let (xs, ys) = blobs(&centers, 40, 1.0, 0)?;

    // Classification.
    let split = train_test_split(&xs, &ys, 0.3, Shuffle::Seeded(0))?;
    let mut knn = KNearestClassifier::new(5, linalg::manhattan)?;
    knn.fit(&split.x_train, &split.y_train)?;
    println!("knn held-out accuracy={:.3}", knn.score(&split.x_test, &split.y_test)?);

    let folds = k_fold(&mut knn, &xs, &ys, 5, Shuffle::Seeded(1))?;
    println!("knn 5-fold accuracies={folds:.3?}");

    // Clustering, ignoring the labels.
    for strategy in [Strategy::Mean, Strategy::Median] {
        let mut km = KMeans::new(KMeansParams {
            n_clusters: centers.len(),
            strategy,
            seed: 3,
            ..KMeansParams::default()
        })?;
        km.fit(&xs)?;
        println!(
            "k-{strategy}: centers={:.2?} total_distance={:.2}",
            km.cluster_centers().unwrap_or_default(),
            km.total_distance().unwrap_or_default()
        );
    }

    Ok(())
}
