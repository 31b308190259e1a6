//! Classifier collaborator interface.
//!
//! The benchmark never implements a classifier itself. It only needs a way to
//! build a fresh, unfitted instance, fit it, and read back continuous
//! decision scores for ROC AUC.
//!
//! # Examples
//!
//! ```rust
//! use drbench::{Classifier, ClassifierFactory, Matrix, Result, Vector};
//! use ndarray::{Axis, array};
//!
//! #[derive(Default)]
//! struct FirstFeature;
//!
//! impl Classifier for FirstFeature {
//!     fn fit(&mut self, _x: &Matrix, _y: &Vector) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn decision_function(&self, x: &Matrix) -> Result<Vector> {
//!         Ok(x.index_axis(Axis(1), 0).to_owned())
//!     }
//! }
//!
//! let factory = FirstFeature::default;
//! let mut model = factory.create();
//! model.fit(&array![[1.0], [2.0]], &array![0.0, 1.0]).unwrap();
//! ```

use crate::error::Result;
use crate::{Matrix, Vector};

/// A binary classifier producing continuous decision scores.
pub trait Classifier {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()>;

    /// Higher scores mean "more likely class 1".
    fn decision_function(&self, x: &Matrix) -> Result<Vector>;
}

/// Builds a fresh, unfitted classifier on every call.
pub trait ClassifierFactory {
    fn create(&self) -> Box<dyn Classifier>;
}

impl<F, C> ClassifierFactory for F
where
    F: Fn() -> C,
    C: Classifier + 'static,
{
    fn create(&self) -> Box<dyn Classifier> {
        Box::new(self())
    }
}
