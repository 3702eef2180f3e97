//! Shared process state and the path-generation capability.
//!
//! Every generator owns a [`ProcessCore`] (initial value, schedule, path) and
//! implements [`PathGenerator`]. What differs between generators is the
//! sampling strategy, reported by [`PathGenerator::strategy`]:
//!
//! - [`SamplingStrategy::Pca`] and [`SamplingStrategy::Subordinated`] build the
//!   whole path from all `d` normals at once, so sequential stepping returns
//!   [`ProcessError::UnsupportedOperation`].
//! - [`SamplingStrategy::Euler`] advances one observation at a time.

use crate::error::{ProcessError, ProcessResult};
use crate::path::Path;
use crate::schedule::ObservationSchedule;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Whole path from a spectral factor of the covariance matrix
    Pca,
    /// Whole path through a distributional transform of a PCA Brownian path
    Subordinated,
    /// One Euler-Maruyama step per observation
    Euler,
}

impl SamplingStrategy {
    pub fn is_sequential(&self) -> bool {
        matches!(self, SamplingStrategy::Euler)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SamplingStrategy::Pca => "PCA",
            SamplingStrategy::Subordinated => "subordinated PCA",
            SamplingStrategy::Euler => "Euler",
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Initial value, observation schedule and committed path.
#[derive(Debug, Clone)]
pub struct ProcessCore {
    pub(crate) x0: f64,
    pub(crate) schedule: ObservationSchedule,
    pub(crate) path: Path,
}

impl ProcessCore {
    pub fn new(x0: f64, schedule: ObservationSchedule) -> Self {
        let path = Path::new(x0, schedule.dimension());
        Self { x0, schedule, path }
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn schedule(&self) -> &ObservationSchedule {
        &self.schedule
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimension(&self) -> usize {
        self.schedule.dimension()
    }

    pub(crate) fn set_x0(&mut self, x0: f64) {
        self.x0 = x0;
        self.path.reset(x0);
    }

    /// Replace the schedule and reallocate the path; the cursor goes back to 0.
    pub(crate) fn set_schedule(&mut self, schedule: ObservationSchedule) {
        trace!(
            dimension = schedule.dimension(),
            horizon = schedule.horizon(),
            "observation schedule replaced"
        );
        self.path = Path::new(self.x0, schedule.dimension());
        self.schedule = schedule;
    }

    pub(crate) fn reset(&mut self) {
        self.path.reset(self.x0);
    }

    /// Index of the next observation, or `ObservationOutOfRange` once the path is complete.
    pub(crate) fn next_index(&self) -> ProcessResult<usize> {
        let index = self.path.observation_index();
        if index >= self.dimension() {
            Err(ProcessError::ObservationOutOfRange {
                index,
                dimension: self.dimension(),
            })
        } else {
            Ok(index)
        }
    }
}

/// Sampling of a process at the observation times of its schedule.
pub trait PathGenerator {
    fn strategy(&self) -> SamplingStrategy;

    fn core(&self) -> &ProcessCore;

    /// Replace the schedule; invalidates every cached quantity derived from it.
    fn set_observation_schedule(&mut self, schedule: ObservationSchedule);

    /// Generate and commit a whole path; the cursor ends at `d`.
    fn generate_path(&mut self) -> ProcessResult<&[f64]>;

    /// Same as [`generate_path`](Self::generate_path), with one uniform per step
    /// turned into a standard normal by inversion.
    ///
    /// # Panics
    ///
    /// If `uniforms.len()` differs from the schedule dimension `d`.
    fn generate_path_from_uniforms(&mut self, uniforms: &[f64]) -> ProcessResult<&[f64]>;

    /// Advance the cursor by one observation along the schedule.
    fn next_observation(&mut self) -> ProcessResult<f64>;

    /// Advance the cursor by one observation to the supplied time.
    fn next_observation_at(&mut self, next_time: f64) -> ProcessResult<f64>;

    /// Cursor back to 0 with `path[0] = x0`.
    fn reset_start_process(&mut self);

    fn supports_sequential(&self) -> bool {
        self.strategy().is_sequential()
    }

    fn x0(&self) -> f64 {
        self.core().x0()
    }

    fn schedule(&self) -> &ObservationSchedule {
        self.core().schedule()
    }

    fn path(&self) -> &Path {
        self.core().path()
    }

    fn dimension(&self) -> usize {
        self.core().dimension()
    }

    fn observation_index(&self) -> usize {
        self.core().path().observation_index()
    }
}

pub(crate) fn check_uniform_count(uniforms: &[f64], d: usize) {
    assert_eq!(
        uniforms.len(),
        d,
        "expected one uniform per observation step ({}), got {}",
        d,
        uniforms.len()
    );
}
