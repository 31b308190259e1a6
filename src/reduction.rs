//! Reduction collaborator interface and the algorithm registry.
//!
//! Reducers are looked up by string key. Each one reports its own duration,
//! so setup work it chooses not to count stays out of the benchmark numbers.
//!
//! # Examples
//!
//! ```rust
//! use drbench::ReducerRegistry;
//! use ndarray::array;
//!
//! let registry = ReducerRegistry::with_defaults();
//! let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let y = array![0.0, 1.0];
//!
//! let reduction = registry.reduce_by_key("identity", &x, &y, 2).unwrap();
//! assert_eq!(reduction.data.shape(), &[2, 2]);
//! ```

use crate::error::{Error, Result};
use crate::timing::timed;
use crate::{Matrix, Vector};
use ndarray::s;
use std::time::Duration;

/// Output of a single reduction call.
#[derive(Clone, Debug)]
pub struct Reduction {
    pub data: Matrix,
    /// Time the reducer attributes to itself.
    pub duration: Duration,
}

pub trait Reducer {
    fn reduce(&self, data: &Matrix, labels: &Vector, dimension: usize) -> Result<Reduction>;
}

/// Keeps the leading `dimension` feature columns.
#[derive(Clone, Debug, Default)]
pub struct IdentityReducer;

impl Reducer for IdentityReducer {
    fn reduce(&self, data: &Matrix, _labels: &Vector, dimension: usize) -> Result<Reduction> {
        if dimension > data.ncols() {
            return Err(Error::DimensionTooLarge {
                algorithm: "identity".to_string(),
                requested: dimension,
                available: data.ncols(),
            });
        }

        let (duration, reduced) = timed(|| data.slice(s![.., ..dimension]).to_owned());
        Ok(Reduction {
            data: reduced,
            duration,
        })
    }
}

/// Ordered mapping from algorithm key to reducer.
#[derive(Default)]
pub struct ReducerRegistry {
    entries: Vec<(String, Box<dyn Reducer>)>,
}

impl ReducerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry with the built-in `identity` reducer.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("identity", IdentityReducer);
        registry
    }

    /// Adds `reducer` under `key`, replacing any reducer already there.
    pub fn register<R>(&mut self, key: &str, reducer: R)
    where
        R: Reducer + 'static,
    {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = Box::new(reducer),
            None => self.entries.push((key.to_string(), Box::new(reducer))),
        }
    }

    pub fn get(&self, key: &str) -> Result<&dyn Reducer> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, reducer)| &**reducer)
            .ok_or_else(|| Error::UnknownAlgorithm(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Looks up `key` and reduces, then checks the output shape.
    pub fn reduce_by_key(
        &self,
        key: &str,
        data: &Matrix,
        labels: &Vector,
        dimension: usize,
    ) -> Result<Reduction> {
        let reducer = self.get(key)?;
        if dimension > data.ncols() {
            return Err(Error::DimensionTooLarge {
                algorithm: key.to_string(),
                requested: dimension,
                available: data.ncols(),
            });
        }

        let reduction = reducer.reduce(data, labels, dimension)?;

        if reduction.data.nrows() != labels.len() {
            return Err(Error::shape(
                &format!("{} reduction", key),
                reduction.data.nrows(),
                labels.len(),
            ));
        }
        if reduction.data.ncols() != dimension {
            return Err(Error::Collaborator(format!(
                "{} returned {} columns, expected {}",
                key,
                reduction.data.ncols(),
                dimension
            )));
        }
        Ok(reduction)
    }
}
