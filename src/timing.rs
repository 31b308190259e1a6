use crate::classifier::ClassifierFactory;
use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of fits averaged per measurement unless overridden.
pub const DEFAULT_FIT_TRIALS: usize = 10;

/// Run `work` once and return how long it took alongside its output.
pub fn timed<T, F>(work: F) -> (Duration, T)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let output = work();
    (start.elapsed(), output)
}

/// Mean wall-clock duration of fitting a fresh classifier, over several trials.
#[derive(Clone, Debug)]
pub struct FitTimer {
    trials: usize,
}

impl FitTimer {
    pub fn new(trials: usize) -> Result<Self> {
        if trials == 0 {
            return Err(Error::Config("fit trial count must be > 0".to_string()));
        }
        if u32::try_from(trials).is_err() {
            return Err(Error::Config(format!(
                "fit trial count {} exceeds {}",
                trials,
                u32::MAX
            )));
        }
        Ok(Self { trials })
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Every trial builds a new classifier from `factory`; no warm start.
    /// The first failing fit aborts the measurement.
    pub fn mean_fit_duration(
        &self,
        factory: &dyn ClassifierFactory,
        x: &Matrix,
        y: &Vector,
    ) -> Result<Duration> {
        let divisor = u32::try_from(self.trials)
            .map_err(|_| Error::Config(format!("fit trial count {} too large", self.trials)))?;
        let mut total = Duration::ZERO;
        for trial in 0..self.trials {
            let (elapsed, fitted) = timed(|| {
                let mut model = factory.create();
                model.fit(x, y)
            });
            fitted?;
            debug!(trial, elapsed_secs = elapsed.as_secs_f64(), "classifier fit");
            total += elapsed;
        }

        let mean = total / divisor;
        debug!(mean_secs = mean.as_secs_f64(), trials = self.trials, "mean fit duration");
        Ok(mean)
    }
}

impl Default for FitTimer {
    fn default() -> Self {
        Self {
            trials: DEFAULT_FIT_TRIALS,
        }
    }
}
