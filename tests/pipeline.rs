use scratch_learn::linalg::{self, Vector};
use scratch_learn::{
    k_fold, train_test_split, Classifier, Dataset, KMeans, KMeansParams, KNearestClassifier,
    MlpClassifier, MlpParams, Shuffle,
};

const CSV: &str = "\
1,5.1,1.4,0.2,setosa
2,4.9,1.4,0.2,setosa
3,4.7,1.3,0.2,setosa
4,4.6,1.5,0.2,setosa
5,5.0,1.4,0.2,setosa
6,5.4,1.7,0.4,setosa
7,7.0,4.7,1.4,versicolor
8,6.4,4.5,1.5,versicolor
9,6.9,4.9,1.5,versicolor
10,5.5,4.0,1.3,versicolor
11,6.5,4.6,1.5,versicolor
12,5.7,4.5,1.3,versicolor
";

fn iris() -> (Vec<Vector>, Vec<String>) {
    Dataset::read_delimited(CSV.as_bytes(), ',', &[2, 3], 4)
        .unwrap()
        .into_parts()
}

#[test]
fn knn_on_delimited_data() {
    let (x, y) = iris();
    assert_eq!(x.len(), 12);

    let split = train_test_split(&x, &y, 0.25, Shuffle::Seeded(4)).unwrap();
    assert_eq!(split.x_train.len(), 9);
    assert_eq!(split.x_test.len(), 3);

    let mut clf = KNearestClassifier::new(3, linalg::euclidean).unwrap();
    clf.fit(&split.x_train, &split.y_train).unwrap();
    assert_eq!(clf.score(&split.x_test, &split.y_test).unwrap(), 1.0);

    let accuracies = k_fold(&mut clf, &x, &y, 4, Shuffle::Seeded(5)).unwrap();
    assert_eq!(accuracies, vec![1.0; 4]);
}

#[test]
fn best_k_prefers_small_neighbourhoods_on_separable_data() {
    let (x, y) = iris();
    let (k, report) =
        KNearestClassifier::best(&x, &y, &[1, 3], 3, linalg::euclidean, Shuffle::Seeded(0))
            .unwrap();
    assert_eq!(k, 1);
    assert_eq!(report, vec![(1, 1.0), (3, 1.0)]);
}

#[test]
fn mlp_cross_validates_through_the_classifier_trait() {
    let (x, y) = iris();
    let mut clf = MlpClassifier::new(MlpParams {
        hidden_layer_count: 1,
        hidden_layer_size: 4,
        learning_rate: 0.5,
        epoch_count: 300,
        seed: 0,
    })
    .unwrap();

    let accuracies = k_fold(&mut clf, &x, &y, 3, Shuffle::Seeded(1)).unwrap();
    assert_eq!(accuracies.len(), 3);
    assert!(accuracies.iter().all(|a| (0.0..=1.0).contains(a)));

    let dyn_clf: &mut dyn Classifier<String> = &mut clf;
    assert_eq!(dyn_clf.predict(&x).unwrap().len(), 12);
}

#[test]
fn kmeans_separates_species() {
    let (x, y) = iris();
    let mut km = KMeans::new(KMeansParams {
        n_clusters: 2,
        ..KMeansParams::default()
    })
    .unwrap();
    km.fit(&x).unwrap();

    let labels = km.labels().unwrap();
    // Two samples share a cluster exactly when they share a species.
    for i in 0..x.len() {
        for j in 0..x.len() {
            assert_eq!(labels[i] == labels[j], y[i] == y[j], "samples {i} and {j}");
        }
    }

    let predicted = km.predict(&x).unwrap();
    assert_eq!(predicted, labels);
}
