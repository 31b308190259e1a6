use crate::classifier::ClassifierFactory;
use crate::error::{Error, Result};
use crate::model_selection::CrossValidator;
use crate::reduction::ReducerRegistry;
use crate::{Matrix, Vector};
use std::time::Duration;
use tracing::debug;

/// Result of reducing once and scoring the classifier on the output.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// Duration reported by the reducer, not measured here.
    pub duration: Duration,
    pub reduced: Matrix,
    /// Mean of the cross-validation fold scores.
    pub score: f64,
}

/// Reduce with one algorithm to one dimension, then cross-validate a fresh
/// classifier on the reduced data.
pub struct ReductionBenchmark<'a> {
    registry: &'a ReducerRegistry,
    classifier: &'a dyn ClassifierFactory,
    validator: &'a dyn CrossValidator,
}

impl<'a> ReductionBenchmark<'a> {
    pub fn new(
        registry: &'a ReducerRegistry,
        classifier: &'a dyn ClassifierFactory,
        validator: &'a dyn CrossValidator,
    ) -> Self {
        Self {
            registry,
            classifier,
            validator,
        }
    }

    pub fn run(
        &self,
        algorithm: &str,
        data: &Matrix,
        labels: &Vector,
        dimension: usize,
    ) -> Result<StepOutcome> {
        let reduction = self
            .registry
            .reduce_by_key(algorithm, data, labels, dimension)?;

        let fold_scores = self
            .validator
            .cross_val_score(self.classifier, &reduction.data, labels)?;
        let score = fold_scores.mean().ok_or_else(|| {
            Error::Collaborator("cross-validator returned no fold scores".to_string())
        })?;

        debug!(
            algorithm,
            dimension,
            reduce_secs = reduction.duration.as_secs_f64(),
            score,
            "reduction step"
        );

        Ok(StepOutcome {
            duration: reduction.duration,
            reduced: reduction.data,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::model_selection::StratifiedKFold;
    use ndarray::Array2;
    use std::cell::Cell;
    use std::rc::Rc;

    struct SumOfFeatures;

    impl Classifier for SumOfFeatures {
        fn fit(&mut self, _x: &Matrix, _y: &Vector) -> Result<()> {
            Ok(())
        }

        fn decision_function(&self, x: &Matrix) -> Result<Vector> {
            Ok(x.sum_axis(ndarray::Axis(1)))
        }
    }

    fn separable(n: usize, features: usize) -> (Matrix, Vector) {
        let labels = Vector::from_shape_fn(n, |i| (i % 2) as f64);
        let data = Array2::from_shape_fn((n, features), |(i, j)| {
            labels[i] * 10.0 + (i * features + j) as f64 / (n * features) as f64
        });
        (data, labels)
    }

    #[test]
    fn test_step_shape_is_stable() {
        let registry = ReducerRegistry::with_defaults();
        let validator = StratifiedKFold::default();
        let factory = || SumOfFeatures;
        let step = ReductionBenchmark::new(&registry, &factory, &validator);
        let (x, y) = separable(30, 6);

        let first = step.run("identity", &x, &y, 4).unwrap();
        let second = step.run("identity", &x, &y, 4).unwrap();

        assert_eq!(first.reduced.shape(), &[30, 4]);
        assert_eq!(first.reduced.shape(), second.reduced.shape());
        assert!((first.score - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_fresh_classifier_per_fold() {
        let registry = ReducerRegistry::with_defaults();
        let validator = StratifiedKFold::new(3);
        let created = Rc::new(Cell::new(0));
        let counter = Rc::clone(&created);
        let factory = move || {
            counter.set(counter.get() + 1);
            SumOfFeatures
        };
        let step = ReductionBenchmark::new(&registry, &factory, &validator);
        let (x, y) = separable(12, 3);

        step.run("identity", &x, &y, 2).unwrap();
        step.run("identity", &x, &y, 3).unwrap();
        assert_eq!(created.get(), 6);
    }

    #[test]
    fn test_dimension_above_features_fails() {
        let registry = ReducerRegistry::with_defaults();
        let validator = StratifiedKFold::default();
        let factory = || SumOfFeatures;
        let step = ReductionBenchmark::new(&registry, &factory, &validator);
        let (x, y) = separable(12, 3);

        let err = step.run("identity", &x, &y, 4).unwrap_err();
        assert!(matches!(err, Error::DimensionTooLarge { .. }));
    }

    struct NoFolds;

    impl CrossValidator for NoFolds {
        fn cross_val_score(
            &self,
            _factory: &dyn ClassifierFactory,
            _x: &Matrix,
            _y: &Vector,
        ) -> Result<Vector> {
            Ok(Vector::zeros(0))
        }
    }

    #[test]
    fn test_empty_fold_scores_fail() {
        let registry = ReducerRegistry::with_defaults();
        let factory = || SumOfFeatures;
        let step = ReductionBenchmark::new(&registry, &factory, &NoFolds);
        let (x, y) = separable(12, 3);

        let err = step.run("identity", &x, &y, 2).unwrap_err();
        assert!(matches!(err, Error::Collaborator(_)));
    }
}
