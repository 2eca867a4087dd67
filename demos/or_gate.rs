use scratch_learn::{MlpClassifier, MlpParams};

fn main() -> scratch_learn::Result<()> {
    env_logger::init();

    // Logical OR.
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let ys = [false, true, true, true];

    // 2 -> 4 -> 1 network, sigmoid units, no trained bias.
    let mut clf = MlpClassifier::new(MlpParams {
        hidden_layer_count: 1,
        hidden_layer_size: 4,
        learning_rate: 0.7,
        epoch_count: 1_000,
        seed: 0,
    })?;

    let report = clf.fit(&xs, &ys)?;
    println!(
        "final_loss_from_fit={} widths={:?}",
        report.final_loss,
        clf.layer_widths().unwrap_or_default()
    );

    for (x, y) in xs.iter().zip(ys) {
        let out = clf.transform(x)?;
        let label = clf.predict_one(x)?;
        println!("x={x:?} activation={:.4} predicted={label} expected={y}", out[0]);
    }

    Ok(())
}
