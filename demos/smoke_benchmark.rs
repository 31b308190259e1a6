use drbench::{
    Classifier, Dataset, Error, Experiment, FitTimer, LoadedDataset, Matrix, Metric,
    ReducerRegistry, Result, Runner, StratifiedKFold, SweepEngine, Vector, telemetry,
};
use ndarray::Axis;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Nearest-centroid scorer: distance to the class-0 mean minus distance to
/// the class-1 mean.
#[derive(Default)]
struct NearestCentroid {
    centroids: Option<(Vector, Vector)>,
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        let class_mean = |class: f64| {
            let rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == class).collect();
            x.select(Axis(0), &rows)
                .mean_axis(Axis(0))
                .ok_or_else(|| Error::Collaborator(format!("no samples of class {}", class)))
        };
        self.centroids = Some((class_mean(0.0)?, class_mean(1.0)?));
        Ok(())
    }

    fn decision_function(&self, x: &Matrix) -> Result<Vector> {
        let (negative, positive) = self
            .centroids
            .as_ref()
            .ok_or_else(|| Error::Collaborator("Model not fitted. Call fit() first.".to_string()))?;

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let to_negative = (&row - negative).mapv(|v| v * v).sum();
                let to_positive = (&row - positive).mapv(|v| v * v).sum();
                to_negative - to_positive
            })
            .collect())
    }
}

fn gaussian_blobs() -> Result<LoadedDataset> {
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 1.0).map_err(|e| Error::Collaborator(e.to_string()))?;

    let labels = Vector::from_shape_fn(200, |i| (i % 2) as f64);
    let mut features = Matrix::random_using((200, 16), noise, &mut rng);
    // only every other feature carries signal
    for (mut row, &label) in features.rows_mut().into_iter().zip(labels.iter()) {
        for j in (0..row.len()).step_by(2) {
            row[j] += label;
        }
    }

    Ok(LoadedDataset {
        dataset: Dataset::new(features, labels)?,
        description: "two gaussian blobs, 200 x 16".to_string(),
        reduce: true,
    })
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    println!("=== Dimensionality Reduction Benchmark ===\n");

    let experiment = Experiment::builder("smoke_benchmark")
        .algorithms(["identity"])
        .dimensions(&[1, 2, 4, 8, 16])
        .build(gaussian_blobs)?;

    let engine = SweepEngine::new(ReducerRegistry::with_defaults(), NearestCentroid::default)
        .cross_validator(StratifiedKFold::new(5).shuffle(42))
        .fit_timer(FitTimer::new(3)?);

    let output_root = std::env::temp_dir().join("drbench");
    let report = Runner::new(engine, &output_root).run(&experiment)?;

    println!("Dataset: {}", report.description);
    println!("{:<12} {:>10} {:>14} {:>14}", "Dimensions", "ROC AUC", "Reduce (s)", "Fit (s)");
    println!("{}", "-".repeat(54));

    for results in report.outcome.results.iter() {
        println!("{}", results.algorithm);
        for (i, dimension) in report.outcome.dimensions.iter().enumerate() {
            println!(
                "{:<12} {:>10.4} {:>14.6} {:>14.6}",
                dimension,
                results.series(Metric::RocAuc)[i],
                results.series(Metric::AlgoDuration)[i],
                results.series(Metric::LrDuration)[i],
            );
        }
    }

    println!("\nArtifacts written to {}", report.output_dir.display());
    Ok(())
}
