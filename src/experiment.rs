//! Experiment definitions.
//!
//! An [`ExperimentConfig`] is the serializable part (keys match the JSON
//! experiment files); an [`Experiment`] binds it to a dataset provider after
//! validation and is never mutated afterwards.
//!
//! ```rust
//! use drbench::{Dataset, Experiment, ExperimentConfig, LoadedDataset, Metric, Result};
//! use ndarray::{Array1, Array2};
//!
//! let config = ExperimentConfig::from_json_str(r#"{
//!     "name": "smoke",
//!     "algos": ["identity"],
//!     "dimensions": [2, 4],
//!     "yValues": ["rocAuc", "lrDuration"],
//!     "binary_encode": false
//! }"#).unwrap();
//!
//! let experiment = Experiment::from_config(config, || -> Result<LoadedDataset> {
//!     Ok(LoadedDataset {
//!         dataset: Dataset::new(Array2::zeros((4, 8)), Array1::zeros(4))?,
//!         description: "zeros".to_string(),
//!         reduce: true,
//!     })
//! }).unwrap();
//! assert_eq!(experiment.metrics(), &[Metric::RocAuc, Metric::LrDuration]);
//! ```

use crate::dataset::DatasetProvider;
use crate::error::{Error, Result};
use crate::results::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    #[serde(rename = "algos")]
    pub algorithms: Vec<String>,
    pub dimensions: Vec<usize>,
    /// Metric names to report, one figure and one CSV each.
    #[serde(rename = "yValues")]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub binary_encode: bool,
    /// Fraction of the non-test rows to keep; absent or zero keeps everything.
    #[serde(default, rename = "size", skip_serializing_if = "Option::is_none")]
    pub subsample: Option<f64>,
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}

pub struct Experiment {
    name: String,
    algorithms: Vec<String>,
    dimensions: Vec<usize>,
    metrics: Vec<Metric>,
    provider: Box<dyn DatasetProvider>,
    binary_encode: bool,
    subsample: Option<f64>,
}

impl Experiment {
    pub fn builder(name: &str) -> ExperimentBuilder {
        ExperimentBuilder {
            config: ExperimentConfig {
                name: name.to_string(),
                algorithms: Vec::new(),
                dimensions: Vec::new(),
                metrics: Vec::new(),
                binary_encode: false,
                subsample: None,
            },
        }
    }

    pub fn from_config<P>(config: ExperimentConfig, provider: P) -> Result<Self>
    where
        P: DatasetProvider + 'static,
    {
        if config.name.trim().is_empty() {
            return Err(Error::Config("experiment name must not be empty".to_string()));
        }
        // the name becomes a folder under the output root
        if config.name.contains(['/', '\\']) || config.name == "." || config.name == ".." {
            return Err(Error::Config(format!(
                "experiment name '{}' must be a plain folder name",
                config.name
            )));
        }
        if config.algorithms.is_empty() {
            return Err(Error::Config(format!("{}: no algorithms given", config.name)));
        }
        for (i, algorithm) in config.algorithms.iter().enumerate() {
            if config.algorithms[..i].contains(algorithm) {
                return Err(Error::Config(format!(
                    "{}: algorithm '{}' listed more than once",
                    config.name, algorithm
                )));
            }
        }
        if config.dimensions.is_empty() {
            return Err(Error::Config(format!("{}: no target dimensions given", config.name)));
        }
        if config.dimensions.contains(&0) {
            return Err(Error::Config(format!(
                "{}: target dimensions must be positive",
                config.name
            )));
        }
        if config.metrics.is_empty() {
            return Err(Error::Config(format!("{}: no metrics to report", config.name)));
        }

        let metrics = config
            .metrics
            .iter()
            .map(|name| name.parse::<Metric>())
            .collect::<Result<Vec<_>>>()?;

        let subsample = match config.subsample {
            None => None,
            Some(size) if size == 0.0 => None,
            Some(size) if size > 0.0 && size <= 1.0 => Some(size),
            Some(size) => {
                return Err(Error::Config(format!(
                    "{}: subsample size {} must be in (0, 1]",
                    config.name, size
                )));
            }
        };

        Ok(Self {
            name: config.name,
            algorithms: config.algorithms,
            dimensions: config.dimensions,
            metrics,
            provider: Box::new(provider),
            binary_encode: config.binary_encode,
            subsample,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithms(&self) -> &[String] {
        &self.algorithms
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn provider(&self) -> &dyn DatasetProvider {
        self.provider.as_ref()
    }

    pub fn binary_encode(&self) -> bool {
        self.binary_encode
    }

    pub fn subsample(&self) -> Option<f64> {
        self.subsample
    }
}

impl fmt::Debug for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Experiment")
            .field("name", &self.name)
            .field("algorithms", &self.algorithms)
            .field("dimensions", &self.dimensions)
            .field("metrics", &self.metrics)
            .field("binary_encode", &self.binary_encode)
            .field("subsample", &self.subsample)
            .finish_non_exhaustive()
    }
}

pub struct ExperimentBuilder {
    config: ExperimentConfig,
}

impl ExperimentBuilder {
    pub fn algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    pub fn dimensions(mut self, dimensions: &[usize]) -> Self {
        self.config.dimensions = dimensions.to_vec();
        self
    }

    pub fn metrics(mut self, metrics: &[Metric]) -> Self {
        self.config.metrics = metrics.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn binary_encode(mut self, binary_encode: bool) -> Self {
        self.config.binary_encode = binary_encode;
        self
    }

    pub fn subsample(mut self, size: f64) -> Self {
        self.config.subsample = Some(size);
        self
    }

    /// Defaults to reporting all three metrics when none were set.
    pub fn build<P>(mut self, provider: P) -> Result<Experiment>
    where
        P: DatasetProvider + 'static,
    {
        if self.config.metrics.is_empty() {
            self.config.metrics = Metric::ALL.iter().map(|m| m.to_string()).collect();
        }
        Experiment::from_config(self.config, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;
    use crate::dataset::{Dataset, LoadedDataset};
    use ndarray::Array2;

    fn zeros() -> Result<LoadedDataset> {
        Ok(LoadedDataset {
            dataset: Dataset::new(Array2::zeros((4, 3)), Vector::zeros(4))?,
            description: "zeros".to_string(),
            reduce: false,
        })
    }

    fn config() -> ExperimentConfig {
        ExperimentConfig {
            name: "smoke".to_string(),
            algorithms: vec!["identity".to_string()],
            dimensions: vec![2, 4],
            metrics: vec!["rocAuc".to_string()],
            binary_encode: false,
            subsample: None,
        }
    }

    #[test]
    fn test_config_from_json() {
        let config = ExperimentConfig::from_json_str(
            r#"{"name": "cancer", "algos": ["identity", "pca"], "dimensions": [1, 2],
                "yValues": ["algoDuration"], "binary_encode": true, "size": 0.1}"#,
        )
        .unwrap();

        assert_eq!(config.algorithms, vec!["identity", "pca"]);
        assert_eq!(config.metrics, vec!["algoDuration"]);
        assert!(config.binary_encode);
        assert_eq!(config.subsample, Some(0.1));
    }

    #[test]
    fn test_config_defaults() {
        let config = ExperimentConfig::from_json_str(
            r#"{"name": "x", "algos": ["identity"], "dimensions": [1], "yValues": ["rocAuc"]}"#,
        )
        .unwrap();

        assert!(!config.binary_encode);
        assert!(config.subsample.is_none());
    }

    #[test]
    fn test_missing_field_is_error() {
        let result = ExperimentConfig::from_json_str(r#"{"name": "x", "algos": ["identity"]}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_from_config_validates() {
        let mut bad = config();
        bad.dimensions = vec![2, 0];
        assert!(Experiment::from_config(bad, zeros).is_err());

        let mut bad = config();
        bad.metrics = vec!["accuracy".to_string()];
        assert!(Experiment::from_config(bad, zeros).is_err());

        let mut bad = config();
        bad.algorithms.clear();
        assert!(Experiment::from_config(bad, zeros).is_err());

        let mut bad = config();
        bad.subsample = Some(1.5);
        assert!(Experiment::from_config(bad, zeros).is_err());
    }

    #[test]
    fn test_duplicate_algorithm_rejected() {
        let result = Experiment::builder("dup")
            .algorithms(["identity", "identity"])
            .dimensions(&[1, 2])
            .build(zeros);

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_name_must_stay_inside_output_root() {
        for name in ["../x", "a/b", "a\\b", ".."] {
            let mut bad = config();
            bad.name = name.to_string();
            assert!(
                matches!(Experiment::from_config(bad, zeros), Err(Error::Config(_))),
                "accepted {}",
                name
            );
        }
    }

    #[test]
    fn test_zero_subsample_means_all_rows() {
        let mut cfg = config();
        cfg.subsample = Some(0.0);

        let experiment = Experiment::from_config(cfg, zeros).unwrap();
        assert!(experiment.subsample().is_none());
    }

    #[test]
    fn test_builder_defaults_to_all_metrics() {
        let experiment = Experiment::builder("smoke")
            .algorithms(["identity"])
            .dimensions(&[1, 2])
            .build(zeros)
            .unwrap();

        assert_eq!(experiment.metrics(), &Metric::ALL);
        assert_eq!(experiment.provider().load().unwrap().dataset.n_features(), 3);
    }
}
