//! # drbench
//!
//! Benchmarks dimensionality-reduction algorithms. For every algorithm and
//! every target dimension of an experiment it records how long the reduction
//! took, the cross-validated ROC AUC of a classifier trained on the reduced
//! data, and the mean time to fit that classifier. The results are written
//! as one CSV log and one SVG figure per metric.
//!
//! Reducers, the classifier, the dataset and the report emitters are all
//! supplied through traits; the crate only ships the `identity` reducer, a
//! one-hot encoder, stratified k-fold ROC AUC scoring and CSV/SVG emitters.
//!
//! ```rust,no_run
//! use drbench::{
//!     Classifier, Dataset, Experiment, LoadedDataset, Matrix, ReducerRegistry, Result,
//!     Runner, SweepEngine, Vector,
//! };
//!
//! struct FirstFeature;
//!
//! impl Classifier for FirstFeature {
//!     fn fit(&mut self, _x: &Matrix, _y: &Vector) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn decision_function(&self, x: &Matrix) -> Result<Vector> {
//!         Ok(x.column(0).to_owned())
//!     }
//! }
//!
//! fn load() -> Result<LoadedDataset> {
//!     let labels = Vector::from_shape_fn(100, |i| (i % 2) as f64);
//!     let features = Matrix::from_shape_fn((100, 8), |(i, j)| labels[i] + j as f64);
//!     Ok(LoadedDataset {
//!         dataset: Dataset::new(features, labels)?,
//!         description: "synthetic".to_string(),
//!         reduce: true,
//!     })
//! }
//!
//! let experiment = Experiment::builder("smoke")
//!     .algorithms(["identity"])
//!     .dimensions(&[2, 4])
//!     .build(load)?;
//!
//! let engine = SweepEngine::new(ReducerRegistry::with_defaults(), || FirstFeature);
//! let report = Runner::new(engine, "experiments").run(&experiment)?;
//! println!("wrote {} artifacts", report.artifacts.len());
//! # Ok::<(), drbench::Error>(())
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod benchmark;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod model_selection;
pub mod preprocessing;
pub mod reduction;
pub mod report;
pub mod results;
pub mod runner;
pub mod sweep;
pub mod telemetry;
pub mod timing;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use benchmark::{ReductionBenchmark, StepOutcome};
pub use classifier::{Classifier, ClassifierFactory};
pub use dataset::{
    BlockSplit, Dataset, DatasetProvider, LoadedDataset, ShuffledBlockSplitter, Subsampler,
    analyze,
};
pub use error::{Error, Result};
pub use experiment::{Experiment, ExperimentBuilder, ExperimentConfig};
pub use metrics::roc_auc_score;
pub use model_selection::{CrossValidator, StratifiedKFold};
pub use preprocessing::{CategoricalEncoder, OneHotEncoder};
pub use reduction::{IdentityReducer, Reducer, ReducerRegistry, Reduction};
pub use report::{
    CsvEmitter, MetricSeries, OutputLayout, PlotEmitter, ReportEmitter, SeriesLine, aggregate,
};
pub use results::{AlgorithmResults, Metric, ResultMatrix};
pub use runner::{RunReport, Runner, TEST_SET_FRACTION};
pub use sweep::{SweepEngine, SweepOutcome};
pub use timing::{DEFAULT_FIT_TRIALS, FitTimer, timed};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        let mat = Matrix::zeros((3, 4));
        assert_eq!(vec.len(), 5);
        assert_eq!(mat.shape(), &[3, 4]);
    }
}
