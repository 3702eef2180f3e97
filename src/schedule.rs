//! Observation times `t_0 < t_1 < ... < t_d` at which a path is sampled.

use crate::error::{ProcessError, ProcessResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSchedule {
    times: Vec<f64>,
}

impl ObservationSchedule {
    /// Build a schedule from `d + 1` strictly increasing finite times.
    pub fn new(times: Vec<f64>) -> ProcessResult<Self> {
        if times.len() < 2 {
            return Err(ProcessError::InvalidSchedule {
                reason: format!(
                    "need at least two observation times (t0 and t1), got {}",
                    times.len()
                ),
            });
        }
        if let Some(j) = times.iter().position(|t| !t.is_finite()) {
            return Err(ProcessError::InvalidSchedule {
                reason: format!("time t{} = {} is not finite", j, times[j]),
            });
        }
        if let Some(j) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ProcessError::InvalidSchedule {
                reason: format!(
                    "times must be strictly increasing, but t{} = {} ≥ t{} = {}",
                    j,
                    times[j],
                    j + 1,
                    times[j + 1]
                ),
            });
        }
        Ok(Self { times })
    }

    /// `t_j = t0 + j·dt` for `j = 0..=d`.
    pub fn equally_spaced(t0: f64, dt: f64, d: usize) -> ProcessResult<Self> {
        if !(dt > 0.0) {
            return Err(ProcessError::InvalidSchedule {
                reason: format!("step size must be positive, got {}", dt),
            });
        }
        Self::new((0..=d).map(|j| t0 + j as f64 * dt).collect())
    }

    /// Number of observation steps `d`.
    pub fn dimension(&self) -> usize {
        self.times.len() - 1
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn time(&self, j: usize) -> f64 {
        self.times[j]
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// `t_d - t_0`
    pub fn horizon(&self) -> f64 {
        self.end() - self.start()
    }

    /// `t_j - t_{j-1}` for `1 ≤ j ≤ d`.
    pub fn delta(&self, j: usize) -> f64 {
        self.times[j] - self.times[j - 1]
    }

    pub fn deltas(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.windows(2).map(|w| w[1] - w[0])
    }

    /// Record a free-stepping time at index `j` without re-checking ordering.
    pub(crate) fn overwrite_time(&mut self, j: usize, t: f64) {
        self.times[j] = t;
    }
}
