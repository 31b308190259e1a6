//! The (algorithm × dimension) sweep.
//!
//! Pairs run strictly one after another on the calling thread: algorithms
//! in declared order on the outside, target dimensions in declared order on
//! the inside. That order is also the x-axis order of every series. The
//! first failure anywhere aborts the sweep.

use crate::benchmark::ReductionBenchmark;
use crate::classifier::ClassifierFactory;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::model_selection::{CrossValidator, StratifiedKFold};
use crate::reduction::ReducerRegistry;
use crate::results::{Metric, ResultMatrix};
use crate::timing::FitTimer;
use tracing::info;

/// Shared x-axis plus the filled result matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepOutcome {
    pub dimensions: Vec<usize>,
    pub results: ResultMatrix,
}

pub struct SweepEngine {
    registry: ReducerRegistry,
    classifier: Box<dyn ClassifierFactory>,
    validator: Box<dyn CrossValidator>,
    fit_timer: FitTimer,
}

impl SweepEngine {
    /// Engine with three-fold stratified ROC AUC scoring and the default
    /// fit trial count.
    pub fn new<F>(registry: ReducerRegistry, classifier: F) -> Self
    where
        F: ClassifierFactory + 'static,
    {
        Self {
            registry,
            classifier: Box::new(classifier),
            validator: Box::new(StratifiedKFold::default()),
            fit_timer: FitTimer::default(),
        }
    }

    pub fn cross_validator<V>(mut self, validator: V) -> Self
    where
        V: CrossValidator + 'static,
    {
        self.validator = Box::new(validator);
        self
    }

    pub fn fit_timer(mut self, fit_timer: FitTimer) -> Self {
        self.fit_timer = fit_timer;
        self
    }

    pub fn registry(&self) -> &ReducerRegistry {
        &self.registry
    }

    /// Rejects unknown algorithms and oversized dimensions before any work.
    fn preflight(&self, algorithms: &[String], dimensions: &[usize], dataset: &Dataset) -> Result<()> {
        for (i, algorithm) in algorithms.iter().enumerate() {
            if !self.registry.contains(algorithm) {
                return Err(Error::UnknownAlgorithm(algorithm.clone()));
            }
            if algorithms[..i].contains(algorithm) {
                return Err(Error::Config(format!(
                    "algorithm '{}' listed more than once",
                    algorithm
                )));
            }
            for &dimension in dimensions {
                if dimension > dataset.n_features() {
                    return Err(Error::DimensionTooLarge {
                        algorithm: algorithm.clone(),
                        requested: dimension,
                        available: dataset.n_features(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn run(
        &self,
        algorithms: &[String],
        dimensions: &[usize],
        dataset: &Dataset,
    ) -> Result<SweepOutcome> {
        self.preflight(algorithms, dimensions, dataset)?;

        let step = ReductionBenchmark::new(
            &self.registry,
            self.classifier.as_ref(),
            self.validator.as_ref(),
        );
        let mut results = ResultMatrix::new();

        for algorithm in algorithms {
            results.add_algorithm(algorithm);

            for &dimension in dimensions {
                info!("{} -> {} dimensions", algorithm, dimension);

                let outcome = step.run(algorithm, &dataset.features, &dataset.labels, dimension)?;
                let fit_duration = self.fit_timer.mean_fit_duration(
                    self.classifier.as_ref(),
                    &outcome.reduced,
                    &dataset.labels,
                )?;

                results.push(algorithm, Metric::RocAuc, outcome.score);
                results.push(algorithm, Metric::AlgoDuration, outcome.duration.as_secs_f64());
                results.push(algorithm, Metric::LrDuration, fit_duration.as_secs_f64());
            }
        }

        results.validate(dimensions.len())?;
        Ok(SweepOutcome {
            dimensions: dimensions.to_vec(),
            results,
        })
    }
}
