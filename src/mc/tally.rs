//! Observation collector with sample statistics.

use crate::error::{ProcessError, ProcessResult};
use crate::math_utils::norm_inv_cdf;

/// Stores every observation so that covariances between two tallies can be
/// computed after the fact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    values: Vec<f64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: Vec::with_capacity(n),
        }
    }

    pub fn add(&mut self, x: f64) {
        self.values.push(x);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sample mean; NaN when empty.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Unbiased sample variance; NaN with fewer than two observations.
    pub fn variance(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = self.average();
        let ss: f64 = self.values.iter().map(|x| (x - mean) * (x - mean)).sum();
        ss / (n - 1) as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Unbiased sample covariance with `other`, observation by observation.
    pub fn covariance(&self, other: &Tally) -> ProcessResult<f64> {
        let n = self.values.len();
        if other.values.len() != n {
            return Err(ProcessError::InvalidConfiguration {
                field: "tally".to_string(),
                reason: format!(
                    "covariance needs equal counts, got {} and {}",
                    n,
                    other.values.len()
                ),
            });
        }
        if n < 2 {
            return Ok(f64::NAN);
        }
        let (mx, my) = (self.average(), other.average());
        let s: f64 = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(x, y)| (x - mx) * (y - my))
            .sum();
        Ok(s / (n - 1) as f64)
    }

    /// `(center, half-width)` of the normal-approximation confidence interval.
    pub fn confidence_interval_normal(&self, level: f64) -> ProcessResult<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ProcessError::InvalidParameters {
                parameter: "level".to_string(),
                value: level,
                constraint: "must lie strictly between 0 and 1".to_string(),
            });
        }
        let z = norm_inv_cdf(0.5 * (1.0 + level));
        let half_width = z * (self.variance() / self.count() as f64).sqrt();
        Ok((self.average(), half_width))
    }
}
