#[cfg(not(feature = "serde"))]
fn main() {
    println!("enable the `serde` feature: cargo run --example params_json --features serde");
}

#[cfg(feature = "serde")]
fn main() -> anyhow::Result<()> {
    use scratch_learn::{KMeans, KMeansParams, MlpClassifier, MlpParams, Strategy};

    // Missing fields fall back to their defaults.
    let mlp: MlpParams = serde_json::from_str(r#"{ "hidden_layer_count": 2, "learning_rate": 0.4 }"#)?;
    let km: KMeansParams =
        serde_json::from_str(r#"{ "n_clusters": 2, "strategy": "median", "seed": 7 }"#)?;
    assert_eq!(km.strategy, Strategy::Median);

    let xs = vec![
        vec![0.0, 0.0],
        vec![0.2, 0.1],
        vec![5.0, 5.0],
        vec![5.1, 4.9],
    ];

    let mut clf = MlpClassifier::new(mlp)?;
    let report = clf.fit(&xs, &["low", "low", "high", "high"])?;
    println!("mlp {} -> final loss {:.6}", serde_json::to_string(clf.params())?, report.final_loss);

    let mut kmeans = KMeans::new(km)?;
    kmeans.fit(&xs)?;
    println!(
        "kmeans {} -> labels {:?}",
        serde_json::to_string(kmeans.params())?,
        kmeans.labels().unwrap_or_default()
    );
    Ok(())
}
