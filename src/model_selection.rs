use crate::classifier::ClassifierFactory;
use crate::error::{Error, Result};
use crate::metrics::roc_auc_score;
use crate::{Matrix, Vector};
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::debug;

/// Cross-validated scoring of a classifier, one score per fold.
pub trait CrossValidator {
    fn cross_val_score(
        &self,
        factory: &dyn ClassifierFactory,
        x: &Matrix,
        y: &Vector,
    ) -> Result<Vector>;
}

/// K-fold cross-validation that keeps class proportions in every fold,
/// scoring each held-out fold by ROC AUC.
#[derive(Clone, Debug)]
pub struct StratifiedKFold {
    n_splits: usize,
    seed: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            seed: None,
        }
    }

    /// Shuffle within each class before assigning folds.
    pub fn shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Test-row indices for each fold.
    pub fn folds(&self, y: &Vector) -> Result<Vec<Vec<usize>>> {
        if self.n_splits < 2 {
            return Err(Error::Config(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }

        let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, &label) in y.iter().enumerate() {
            by_class.entry(label.round() as i64).or_default().push(i);
        }

        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let mut folds = vec![Vec::new(); self.n_splits];
        for (class, members) in by_class.iter_mut() {
            if members.len() < self.n_splits {
                return Err(Error::Collaborator(format!(
                    "class {} has {} members, fewer than n_splits={}",
                    class,
                    members.len(),
                    self.n_splits
                )));
            }
            if let Some(rng) = rng.as_mut() {
                members.shuffle(rng);
            }
            for (k, &idx) in members.iter().enumerate() {
                folds[k % self.n_splits].push(idx);
            }
        }

        for fold in folds.iter_mut() {
            fold.sort_unstable();
        }
        Ok(folds)
    }
}

impl Default for StratifiedKFold {
    fn default() -> Self {
        Self::new(3)
    }
}

impl CrossValidator for StratifiedKFold {
    fn cross_val_score(
        &self,
        factory: &dyn ClassifierFactory,
        x: &Matrix,
        y: &Vector,
    ) -> Result<Vector> {
        if x.nrows() != y.len() {
            return Err(Error::shape("cross-validation", x.nrows(), y.len()));
        }

        let folds = self.folds(y)?;
        let mut scores = Vec::with_capacity(folds.len());

        for test_idx in &folds {
            let mut in_test = vec![false; y.len()];
            for &i in test_idx {
                in_test[i] = true;
            }
            let train_idx: Vec<usize> = (0..y.len()).filter(|&i| !in_test[i]).collect();

            let mut model = factory.create();
            model.fit(&x.select(Axis(0), &train_idx), &y.select(Axis(0), &train_idx))?;

            let decision = model.decision_function(&x.select(Axis(0), test_idx))?;
            scores.push(roc_auc_score(&y.select(Axis(0), test_idx), &decision)?);
        }

        debug!(?scores, "fold scores");
        Ok(Vector::from(scores))
    }
}
