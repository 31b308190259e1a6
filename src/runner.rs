use crate::dataset::{Dataset, LoadedDataset, ShuffledBlockSplitter, Subsampler, analyze};
use crate::error::{Error, Result};
use crate::experiment::Experiment;
use crate::preprocessing::{CategoricalEncoder, OneHotEncoder};
use crate::report::{CsvEmitter, OutputLayout, PlotEmitter, ReportEmitter, aggregate};
use crate::sweep::{SweepEngine, SweepOutcome};
use std::path::{Path, PathBuf};
use tracing::info;

/// Share of rows held out when subsampling.
pub const TEST_SET_FRACTION: f64 = 0.2;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub description: String,
    pub outcome: SweepOutcome,
    pub output_dir: PathBuf,
    pub artifacts: Vec<PathBuf>,
}

/// Executes experiments end to end: load, sweep, report.
pub struct Runner {
    engine: SweepEngine,
    output_root: PathBuf,
    subsampler: Box<dyn Subsampler>,
    encoder: Box<dyn CategoricalEncoder>,
    emitters: Vec<Box<dyn ReportEmitter>>,
}

impl Runner {
    /// Runner writing CSV logs and SVG figures under `output_root`.
    pub fn new<P: AsRef<Path>>(engine: SweepEngine, output_root: P) -> Self {
        Self {
            engine,
            output_root: output_root.as_ref().to_path_buf(),
            subsampler: Box::new(ShuffledBlockSplitter::default()),
            encoder: Box::new(OneHotEncoder::new()),
            emitters: vec![Box::new(CsvEmitter), Box::new(PlotEmitter::default())],
        }
    }

    pub fn subsampler<S: Subsampler + 'static>(mut self, subsampler: S) -> Self {
        self.subsampler = Box::new(subsampler);
        self
    }

    pub fn encoder<E: CategoricalEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// Replaces the default emitters.
    pub fn emitters(mut self, emitters: Vec<Box<dyn ReportEmitter>>) -> Self {
        self.emitters = emitters;
        self
    }

    /// Loads the experiment's data, subsampling and encoding as configured.
    pub fn load_data(&self, experiment: &Experiment) -> Result<LoadedDataset> {
        let mut loaded = experiment.provider().load()?;
        analyze(&loaded.dataset, "load")?;

        if let Some(size) = experiment.subsample() {
            let schedule = [size, (size + 0.1).min(1.0)];
            let blocks = self
                .subsampler
                .split_blocks(&loaded.dataset, &schedule, TEST_SET_FRACTION)?;
            loaded.dataset = blocks
                .into_iter()
                .next()
                .map(|block| block.train)
                .ok_or_else(|| Error::Collaborator("subsampler returned no blocks".to_string()))?;
            analyze(&loaded.dataset, "subsample")?;
        }

        if experiment.binary_encode() {
            info!("perform binary encode");
            analyze(&loaded.dataset, "before encode")?;

            let encoded = self.encoder.encode(&loaded.dataset.features)?;
            if encoded.nrows() != loaded.dataset.n_samples() {
                return Err(Error::shape(
                    "binary encoding",
                    encoded.nrows(),
                    loaded.dataset.n_samples(),
                ));
            }
            loaded.dataset = Dataset::new(encoded, loaded.dataset.labels)?;
            analyze(&loaded.dataset, "after encode")?;
        }

        Ok(loaded)
    }

    /// Runs the whole experiment. Nothing is written unless the sweep
    /// completes for every algorithm and dimension. An emitter that fails
    /// partway through leaves the artifacts of earlier metrics on disk.
    pub fn run(&self, experiment: &Experiment) -> Result<RunReport> {
        info!(experiment = experiment.name(), "starting experiment");

        let loaded = self.load_data(experiment)?;
        let outcome = self.engine.run(
            experiment.algorithms(),
            experiment.dimensions(),
            &loaded.dataset,
        )?;

        let series = aggregate(experiment.metrics(), &outcome)?;
        let layout = OutputLayout::prepare(&self.output_root, experiment.name())?;

        let mut artifacts = Vec::with_capacity(series.len() * self.emitters.len());
        for metric_series in &series {
            for emitter in &self.emitters {
                artifacts.push(emitter.emit(&layout, metric_series)?);
            }
        }

        info!(
            experiment = experiment.name(),
            artifacts = artifacts.len(),
            "experiment finished"
        );
        Ok(RunReport {
            description: loaded.description,
            outcome,
            output_dir: layout.dir().to_path_buf(),
            artifacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::reduction::ReducerRegistry;
    use crate::timing::FitTimer;
    use crate::{Matrix, Vector};
    use ndarray::Array2;
    use tempfile::TempDir;

    struct FirstColumn;

    impl Classifier for FirstColumn {
        fn fit(&mut self, _x: &Matrix, _y: &Vector) -> Result<()> {
            Ok(())
        }

        fn decision_function(&self, x: &Matrix) -> Result<Vector> {
            Ok(x.column(0).to_owned())
        }
    }

    fn categorical() -> Result<LoadedDataset> {
        let labels = Vector::from_shape_fn(40, |i| (i % 2) as f64);
        let features = Array2::from_shape_fn((40, 3), |(i, j)| ((i + j) % 3) as f64);
        Ok(LoadedDataset {
            dataset: Dataset::new(features, labels)?,
            description: "categorical".to_string(),
            reduce: true,
        })
    }

    fn runner(root: &Path) -> Runner {
        let engine = SweepEngine::new(ReducerRegistry::with_defaults(), || FirstColumn)
            .fit_timer(FitTimer::new(2).unwrap());
        Runner::new(engine, root)
    }

    #[test]
    fn test_binary_encoding_keeps_rows_and_widens() {
        let tmp = TempDir::new().unwrap();
        let experiment = Experiment::builder("encode")
            .algorithms(["identity"])
            .dimensions(&[1])
            .binary_encode(true)
            .build(categorical)
            .unwrap();

        let loaded = runner(tmp.path()).load_data(&experiment).unwrap();
        assert_eq!(loaded.dataset.n_samples(), 40);
        assert_eq!(loaded.dataset.n_features(), 9);
    }

    #[test]
    fn test_subsample_uses_first_training_block() {
        let tmp = TempDir::new().unwrap();
        let experiment = Experiment::builder("sub")
            .algorithms(["identity"])
            .dimensions(&[1])
            .subsample(0.5)
            .build(categorical)
            .unwrap();

        let loaded = runner(tmp.path()).load_data(&experiment).unwrap();
        // 40 rows, 8 held out, half of the remaining 32
        assert_eq!(loaded.dataset.n_samples(), 16);
        assert_eq!(loaded.dataset.labels.len(), 16);
    }

    #[test]
    fn test_failed_sweep_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let experiment = Experiment::builder("too_wide")
            .algorithms(["identity"])
            .dimensions(&[2, 10])
            .build(categorical)
            .unwrap();

        let err = runner(tmp.path()).run(&experiment).unwrap_err();
        assert!(matches!(err, Error::DimensionTooLarge { .. }));
        assert!(!tmp.path().join("too_wide").exists());
    }
}
