use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process;

use anyhow::{bail, Context, Result};
use log::info;

use scratch_learn::{
    k_fold, train_test_split, Dataset, KMeans, KMeansParams, KNearestClassifier, MlpClassifier,
    MlpParams, Shuffle,
};

/// Iris layout: petal length and width as features, species as label.
const FEATURE_COLUMNS: [usize; 2] = [2, 3];
const LABEL_COLUMN: usize = 4;
const TEST_RATIO: f64 = 0.33;
const N_FOLDS: usize = 5;

fn parse_u64(args: &[String], key: &str, default: u64) -> Result<u64> {
    match args.iter().position(|a| a == key) {
        Some(i) => {
            let value = args
                .get(i + 1)
                .with_context(|| format!("{key} needs a value"))?;
            value
                .parse()
                .with_context(|| format!("failed to parse {key} value {value:?} as u64"))
        }
        None => Ok(default),
    }
}

fn mean_and_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

fn load(path: &str) -> Result<Dataset<String>> {
    let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
    let ds = Dataset::read_delimited(BufReader::new(file), ',', &FEATURE_COLUMNS, LABEL_COLUMN)
        .with_context(|| format!("failed to read {path}"))?;
    info!("loaded {} samples from {path}", ds.len());
    Ok(ds)
}

fn run_mlp(ds: Dataset<String>, seed: u64) -> Result<()> {
    // The network is binary: keep the first two species in file order.
    let (x, y) = ds.into_parts();
    let mut kept: Vec<String> = Vec::new();
    for label in &y {
        if !kept.contains(label) && kept.len() < 2 {
            kept.push(label.clone());
        }
    }
    let (x, y): (Vec<_>, Vec<_>) = x
        .into_iter()
        .zip(y)
        .filter(|(_, label)| kept.contains(label))
        .unzip();
    info!("training on classes {kept:?} ({} samples)", y.len());

    let split = train_test_split(&x, &y, TEST_RATIO, Shuffle::Seeded(seed))?;
    let mut clf = MlpClassifier::new(MlpParams {
        hidden_layer_count: 2,
        hidden_layer_size: 4,
        learning_rate: 0.4,
        epoch_count: 1_000,
        seed,
    })?;
    let report = clf.fit(&split.x_train, &split.y_train)?;
    println!("final training loss: {:.6}", report.final_loss);

    if let (Some(sample), Some(label)) = (split.x_test.first(), split.y_test.first()) {
        println!(
            "sample {sample:?} is {label}, classified as {}",
            clf.predict_one(sample)?
        );
    }

    let y_pred = clf.predict(&split.x_test)?;
    let accuracy = scratch_learn::metrics::accuracy(&split.y_test, &y_pred)?;
    println!("held-out accuracy: {:.2}%", accuracy * 100.0);

    let accuracies = k_fold(&mut clf, &x, &y, N_FOLDS, Shuffle::Seeded(seed))?;
    let (mean, stdev) = mean_and_stdev(&accuracies);
    println!(
        "{N_FOLDS}-fold accuracy: {:.2}% (+/- {:.2}%)",
        mean * 100.0,
        stdev * 100.0
    );
    Ok(())
}

fn run_knn(ds: Dataset<String>, seed: u64) -> Result<()> {
    let (x, y) = ds.into_parts();
    let split = train_test_split(&x, &y, TEST_RATIO, Shuffle::Seeded(seed))?;

    let mut clf = KNearestClassifier::default();
    clf.fit(&split.x_train, &split.y_train)?;

    if let (Some(sample), Some(label)) = (split.x_test.first(), split.y_test.first()) {
        println!(
            "sample {sample:?} is {label}, classified as {}",
            clf.predict_one(sample)?
        );
    }
    println!(
        "held-out accuracy: {:.2}%",
        clf.score(&split.x_test, &split.y_test)? * 100.0
    );

    let accuracies = k_fold(&mut clf, &x, &y, N_FOLDS, Shuffle::Seeded(seed))?;
    let (mean, stdev) = mean_and_stdev(&accuracies);
    println!(
        "{N_FOLDS}-fold accuracy: {:.2}% (+/- {:.2}%)",
        mean * 100.0,
        stdev * 100.0
    );

    let (best, report) = KNearestClassifier::best(
        &x,
        &y,
        &[1, 3, 5, 7, 9],
        N_FOLDS,
        scratch_learn::linalg::euclidean,
        Shuffle::Seeded(seed),
    )?;
    for (k, acc) in report {
        println!("  k = {k}: {:.2}%", acc * 100.0);
    }
    println!("best k: {best}");
    Ok(())
}

fn run_kmeans(ds: Dataset<String>, seed: u64) -> Result<()> {
    let (x, y) = ds.into_parts();
    let mut km = KMeans::new(KMeansParams {
        n_clusters: 3,
        seed,
        ..KMeansParams::default()
    })?;
    km.fit(&x)?;

    let (Some(centers), Some(labels)) = (km.cluster_centers(), km.labels()) else {
        bail!("k-means produced no clusters");
    };
    println!("clusters found:");
    for (i, center) in centers.iter().enumerate() {
        let members: Vec<&String> = labels
            .iter()
            .zip(&y)
            .filter(|(&c, _)| c == i)
            .map(|(_, label)| label)
            .collect();

        // Most frequent species in the cluster.
        let mut majority = (None, 0);
        for label in &members {
            let count = members.iter().filter(|m| *m == label).count();
            if count > majority.1 {
                majority = (Some(*label), count);
            }
        }

        println!("  cluster {}", i + 1);
        println!("    centroid: {center:?}");
        println!("    points: {}", members.len());
        if let (Some(label), count) = majority {
            println!(
                "    majority: {label} ({:.2}%)",
                100.0 * count as f64 / members.len() as f64
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <mlp|knn|kmeans> <csv-path> [--seed N]",
            args.first().map_or("scratch-learn", String::as_str)
        );
        process::exit(1);
    }

    let seed = parse_u64(&args, "--seed", 0)?;
    let ds = load(&args[2])?;

    match args[1].as_str() {
        "mlp" => run_mlp(ds, seed),
        "knn" => run_knn(ds, seed),
        "kmeans" => run_kmeans(ds, seed),
        other => bail!("unknown model {other:?}; use 'mlp', 'knn' or 'kmeans'"),
    }
}
