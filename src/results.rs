use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The three measurements taken for every (algorithm, dimension) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Mean cross-validated ROC AUC on the reduced data.
    RocAuc,
    /// Seconds the reducer reported for itself.
    AlgoDuration,
    /// Mean seconds to fit the classifier on the reduced data.
    LrDuration,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::RocAuc, Metric::AlgoDuration, Metric::LrDuration];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::RocAuc => "rocAuc",
            Metric::AlgoDuration => "algoDuration",
            Metric::LrDuration => "lrDuration",
        }
    }

    fn index(self) -> usize {
        match self {
            Metric::RocAuc => 0,
            Metric::AlgoDuration => 1,
            Metric::LrDuration => 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown metric '{}', expected one of rocAuc, algoDuration, lrDuration",
                    s
                ))
            })
    }
}

/// Values recorded for one algorithm, one series per metric.
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmResults {
    pub algorithm: String,
    series: [Vec<f64>; 3],
}

impl AlgorithmResults {
    fn new(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            series: Default::default(),
        }
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.series[metric.index()]
    }
}

/// Per-algorithm, per-metric values, one per target dimension.
///
/// Algorithms keep the order in which they were first recorded, which is the
/// experiment's declared order when filled by the sweep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultMatrix {
    algorithms: Vec<AlgorithmResults>,
}

impl ResultMatrix {
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }

    /// Registers `algorithm` with empty series if it is not present yet.
    pub fn add_algorithm(&mut self, algorithm: &str) {
        if self.position(algorithm).is_none() {
            self.algorithms.push(AlgorithmResults::new(algorithm));
        }
    }

    /// Appends `value` to the series of `algorithm`/`metric`.
    pub fn push(&mut self, algorithm: &str, metric: Metric, value: f64) {
        let idx = match self.position(algorithm) {
            Some(idx) => idx,
            None => {
                self.algorithms.push(AlgorithmResults::new(algorithm));
                self.algorithms.len() - 1
            }
        };
        self.algorithms[idx].series[metric.index()].push(value);
    }

    pub fn series(&self, algorithm: &str, metric: Metric) -> Option<&[f64]> {
        self.position(algorithm)
            .map(|idx| self.algorithms[idx].series(metric))
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.algorithms.iter().map(|a| a.algorithm.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmResults> {
        self.algorithms.iter()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Every series of every algorithm must hold exactly `expected` values.
    pub fn validate(&self, expected: usize) -> Result<()> {
        for results in &self.algorithms {
            for metric in Metric::ALL {
                let found = results.series(metric).len();
                if found != expected {
                    return Err(Error::IncompleteResults {
                        algorithm: results.algorithm.clone(),
                        metric: metric.to_string(),
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(())
    }

    fn position(&self, algorithm: &str) -> Option<usize> {
        self.algorithms.iter().position(|a| a.algorithm == algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert!("f1".parse::<Metric>().is_err());
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut matrix = ResultMatrix::new();
        matrix.push("pca", Metric::RocAuc, 0.9);
        matrix.push("identity", Metric::RocAuc, 0.8);
        matrix.push("pca", Metric::RocAuc, 0.95);

        assert_eq!(matrix.algorithms().collect::<Vec<_>>(), vec!["pca", "identity"]);
        assert_eq!(matrix.series("pca", Metric::RocAuc).unwrap(), &[0.9, 0.95]);
        assert!(matrix.series("lda", Metric::RocAuc).is_none());
    }

    #[test]
    fn test_validate_detects_missing_entry() {
        let mut matrix = ResultMatrix::new();
        for metric in Metric::ALL {
            matrix.push("identity", metric, 1.0);
            matrix.push("identity", metric, 2.0);
        }
        assert!(matrix.validate(2).is_ok());

        matrix.push("identity", Metric::LrDuration, 3.0);
        let err = matrix.validate(2).unwrap_err();
        assert!(matches!(err, Error::IncompleteResults { found: 3, .. }));
    }

    #[test]
    fn test_registered_algorithm_without_values_is_incomplete() {
        let mut matrix = ResultMatrix::new();
        matrix.add_algorithm("identity");

        assert!(matrix.validate(1).is_err());
        assert!(matrix.validate(0).is_ok());
    }
}
