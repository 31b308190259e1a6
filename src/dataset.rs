use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Vector,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Vector) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::shape("construction", features.nrows(), labels.len()));
        }

        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Copy of the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        Self::new(
            self.features.select(Axis(0), indices),
            self.labels.select(Axis(0), indices),
        )
    }
}

/// What a dataset provider hands back: the data plus its metadata.
#[derive(Clone, Debug)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub description: String,
    /// Provider hint that the data is meant to be reduced.
    pub reduce: bool,
}

/// Deferred construction of the experiment's dataset.
///
/// Implementations must be idempotent: loading twice within a run yields the
/// same data.
pub trait DatasetProvider {
    fn load(&self) -> Result<LoadedDataset>;
}

impl<F> DatasetProvider for F
where
    F: Fn() -> Result<LoadedDataset>,
{
    fn load(&self) -> Result<LoadedDataset> {
        self()
    }
}

/// One entry of a block schedule: a training block and the shared test set.
#[derive(Clone, Debug)]
pub struct BlockSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Splits a dataset into training blocks of increasing size.
pub trait Subsampler {
    /// `schedule` holds fractions in (0, 1] of the non-test rows, one block
    /// per entry. `test_fraction` of all rows is held out first.
    fn split_blocks(
        &self,
        dataset: &Dataset,
        schedule: &[f64],
        test_fraction: f64,
    ) -> Result<Vec<BlockSplit>>;
}

/// Seeded shuffle followed by prefix slicing of the training pool.
#[derive(Clone, Debug)]
pub struct ShuffledBlockSplitter {
    seed: u64,
}

impl ShuffledBlockSplitter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for ShuffledBlockSplitter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Subsampler for ShuffledBlockSplitter {
    fn split_blocks(
        &self,
        dataset: &Dataset,
        schedule: &[f64],
        test_fraction: f64,
    ) -> Result<Vec<BlockSplit>> {
        if test_fraction <= 0.0 || test_fraction >= 1.0 {
            return Err(Error::Config("test fraction must be between 0 and 1".to_string()));
        }
        if schedule.is_empty() {
            return Err(Error::Config("block schedule must not be empty".to_string()));
        }

        let n_samples = dataset.n_samples();
        let n_test = (n_samples as f64 * test_fraction).round() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(Error::Config(format!(
                "cannot hold out {} of {} samples as test set",
                test_fraction, n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let (test_idx, pool) = indices.split_at(n_test);
        let test = dataset.select_rows(test_idx)?;

        schedule
            .iter()
            .map(|&fraction| {
                if fraction <= 0.0 || fraction > 1.0 {
                    return Err(Error::Config(format!(
                        "block fraction {} must be in (0, 1]",
                        fraction
                    )));
                }
                let size = ((pool.len() as f64 * fraction).round() as usize).clamp(1, pool.len());
                Ok(BlockSplit {
                    train: dataset.select_rows(&pool[..size])?,
                    test: test.clone(),
                })
            })
            .collect()
    }
}

/// Log a short summary of the data and verify row alignment.
pub fn analyze(dataset: &Dataset, stage: &str) -> Result<()> {
    if dataset.features.nrows() != dataset.labels.len() {
        return Err(Error::shape(stage, dataset.features.nrows(), dataset.labels.len()));
    }

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &label in dataset.labels.iter() {
        *counts.entry(label.round() as i64).or_insert(0) += 1;
    }

    info!(
        stage,
        samples = dataset.n_samples(),
        features = dataset.n_features(),
        "label counts: {:?}",
        counts
    );
    Ok(())
}
