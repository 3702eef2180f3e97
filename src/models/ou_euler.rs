//! Ornstein-Uhlenbeck Process by Euler-Maruyama Stepping
//!
//! # Mathematical Framework
//!
//! ```text
//! dX_t = α(b - X_t) dt + σ dW_t
//! X(t_j) = X(t_{j-1}) + α(b - X(t_{j-1})) Δt_j + σ √Δt_j Z_j
//! ```
//!
//! The per-step coefficients `α Δt_j` and `σ √Δt_j` are cached against the
//! schedule and shared by [`generate_path`](PathGenerator::generate_path) and
//! [`next_observation`](PathGenerator::next_observation), so a whole path and
//! `d` single steps driven by the same normals agree exactly.
//!
//! # Free Stepping
//!
//! [`next_observation_at`](PathGenerator::next_observation_at) computes `Δt`
//! from the supplied time and writes that time into the schedule at the new
//! cursor position. It neither reads nor refreshes the coefficient cache, so
//! after free stepping the cached coefficients may describe the schedule as
//! it was before. [`OuProcessEuler::next_observation_from`] steps from an
//! arbitrary value and leaves path, cursor and schedule untouched.

use super::ou_process::OuProcess;
use super::process::{check_uniform_count, PathGenerator, ProcessCore, SamplingStrategy};
use crate::error::{validation::*, ProcessResult};
use crate::math_utils::norm_inv_cdf;
use crate::rng::NormalSource;
use crate::schedule::ObservationSchedule;
use crate::solvers::euler_maruyama::EulerMaruyama;
use tracing::trace;

pub struct OuProcessEuler<G> {
    core: ProcessCore,
    model: OuProcess,
    gen: G,
    alpha_dt: Vec<f64>,
    sigma_sqrt_dt: Vec<f64>,
    coefficients_valid: bool,
}

impl<G: NormalSource> OuProcessEuler<G> {
    pub fn new(
        x0: f64,
        model: OuProcess,
        schedule: ObservationSchedule,
        gen: G,
    ) -> ProcessResult<Self> {
        validate_finite("x0", x0)?;
        model.validate()?;
        Ok(Self {
            core: ProcessCore::new(x0, schedule),
            model,
            gen,
            alpha_dt: Vec::new(),
            sigma_sqrt_dt: Vec::new(),
            coefficients_valid: false,
        })
    }

    /// Replace `(x0, α, b, σ)`; the step coefficients are rebuilt on next use.
    pub fn set_params(&mut self, x0: f64, alpha: f64, b: f64, sigma: f64) -> ProcessResult<()> {
        validate_finite("x0", x0)?;
        let model = OuProcess::new(alpha, b, sigma)?;
        self.model = model;
        self.core.set_x0(x0);
        self.coefficients_valid = false;
        Ok(())
    }

    pub fn model(&self) -> &OuProcess {
        &self.model
    }

    pub fn normal_gen_mut(&mut self) -> &mut G {
        &mut self.gen
    }

    pub fn coefficients_valid(&self) -> bool {
        self.coefficients_valid
    }

    fn refresh_coefficients(&mut self) {
        if self.coefficients_valid {
            return;
        }
        let alpha = self.model.alpha;
        let sigma = self.model.sigma;
        self.alpha_dt = self.core.schedule.deltas().map(|dt| alpha * dt).collect();
        self.sigma_sqrt_dt = self
            .core
            .schedule
            .deltas()
            .map(|dt| sigma * dt.sqrt())
            .collect();
        self.coefficients_valid = true;
        trace!(
            steps = self.alpha_dt.len(),
            "refreshed Euler step coefficients"
        );
    }

    /// One schedule step from `x` over step `j` (0-based) with normal `z`.
    fn cached_step(&self, j: usize, x: f64, z: f64) -> f64 {
        x + self.alpha_dt[j] * (self.model.b - x) + self.sigma_sqrt_dt[j] * z
    }

    fn walk<F>(&mut self, mut normal: F) -> &[f64]
    where
        F: FnMut(&mut G, usize) -> f64,
    {
        self.refresh_coefficients();
        let d = self.core.dimension();
        let mut x = self.core.x0;
        self.core.path.values_mut()[0] = x;
        for j in 0..d {
            let z = normal(&mut self.gen, j);
            x = self.cached_step(j, x, z);
            self.core.path.values_mut()[j + 1] = x;
        }
        self.core.path.mark_complete();
        self.core.path.values()
    }

    /// Single step from an arbitrary value `x` over `dt`.
    ///
    /// Consumes one normal from the generator but leaves the path, cursor and
    /// schedule as they are.
    pub fn next_observation_from(&mut self, x: f64, dt: f64) -> f64 {
        // OU coefficients do not depend on time
        EulerMaruyama::step(&self.model, x, 0.0, dt, &mut self.gen)
    }
}

impl<G: NormalSource> PathGenerator for OuProcessEuler<G> {
    fn strategy(&self) -> SamplingStrategy {
        SamplingStrategy::Euler
    }

    fn core(&self) -> &ProcessCore {
        &self.core
    }

    fn set_observation_schedule(&mut self, schedule: ObservationSchedule) {
        self.core.set_schedule(schedule);
        self.coefficients_valid = false;
    }

    fn generate_path(&mut self) -> ProcessResult<&[f64]> {
        Ok(self.walk(|gen, _| gen.next_normal()))
    }

    fn generate_path_from_uniforms(&mut self, uniforms: &[f64]) -> ProcessResult<&[f64]> {
        check_uniform_count(uniforms, self.core.dimension());
        Ok(self.walk(|_, j| norm_inv_cdf(uniforms[j])))
    }

    fn next_observation(&mut self) -> ProcessResult<f64> {
        let index = self.core.next_index()?;
        self.refresh_coefficients();
        let z = self.gen.next_normal();
        let x = self.cached_step(index, self.core.path.value(index), z);
        Ok(self.core.path.push_observation(x))
    }

    fn next_observation_at(&mut self, next_time: f64) -> ProcessResult<f64> {
        let index = self.core.next_index()?;
        let t = self.core.schedule.time(index);
        let dt = next_time - t;
        self.core.schedule.overwrite_time(index + 1, next_time);
        let x = EulerMaruyama::step(&self.model, self.core.path.value(index), t, dt, &mut self.gen);
        Ok(self.core.path.push_observation(x))
    }

    fn reset_start_process(&mut self) {
        self.core.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use crate::rng::{CounterRng, NormalInvGen};
    use std::collections::VecDeque;

    /// Hands out a fixed list of normals.
    struct Replay(VecDeque<f64>);

    impl NormalSource for Replay {
        fn next_normal(&mut self) -> f64 {
            self.0.pop_front().unwrap_or(0.0)
        }
    }

    fn replay(normals: &[f64]) -> Replay {
        Replay(normals.iter().copied().collect())
    }

    fn ou<G: NormalSource>(x0: f64, times: &[f64], gen: G) -> OuProcessEuler<G> {
        OuProcessEuler::new(
            x0,
            OuProcess::new(2.0, 1.0, 0.5).expect("valid parameters"),
            ObservationSchedule::new(times.to_vec()).expect("valid schedule"),
            gen,
        )
        .expect("valid parameters")
    }

    #[test]
    fn test_hand_computed_step() {
        // 3 + 2·0.25·(1 - 3) + 0.5·0.5·1.2 = 2.3
        let mut process = ou(3.0, &[0.0, 0.25], replay(&[1.2]));
        let x = process.next_observation().expect("step");
        assert!((x - 2.3).abs() < 1e-14);
        assert_eq!(process.observation_index(), 1);
        assert_eq!(process.path().value(1), x);
    }

    #[test]
    fn test_whole_path_equals_sequential_steps() {
        let times = [0.0, 0.1, 0.35, 0.4, 1.0];
        let normals = [0.3, -1.1, 2.0, -0.4];

        let mut whole = ou(0.7, &times, replay(&normals));
        let expected = whole.generate_path().expect("path").to_vec();

        let mut stepped = ou(0.7, &times, replay(&normals));
        let mut values = vec![stepped.x0()];
        for _ in 0..4 {
            values.push(stepped.next_observation().expect("step"));
        }
        assert_eq!(values, expected);
        assert_eq!(stepped.path().values(), expected.as_slice());
    }

    #[test]
    fn test_stepping_past_end_errors() {
        let mut process = ou(0.0, &[0.0, 1.0, 2.0], replay(&[]));
        process.next_observation().expect("step");
        process.next_observation().expect("step");
        assert_eq!(
            process.next_observation(),
            Err(ProcessError::ObservationOutOfRange {
                index: 2,
                dimension: 2
            })
        );
        assert!(process.next_observation_at(3.0).is_err());

        process.reset_start_process();
        assert_eq!(process.observation_index(), 0);
        assert!(process.next_observation().is_ok());
    }

    #[test]
    fn test_free_stepping_records_time_but_keeps_cache() {
        let mut process = ou(0.0, &[0.0, 1.0, 2.0], replay(&[0.0, 0.0, 0.0, 0.0]));
        process.generate_path().expect("path");
        assert!(process.coefficients_valid());

        process.reset_start_process();
        // zero noise: 0 + 2·(1 - 0)·0.25 = 0.5
        let x = process.next_observation_at(0.25).expect("step");
        assert_eq!(x, 0.5);
        assert_eq!(process.schedule().times(), &[0.0, 0.25, 2.0]);
        assert!(process.coefficients_valid());

        // the cached step still uses the replaced Δt = 1, not 1.75
        let x = process.next_observation().expect("step");
        assert_eq!(x, 1.5);
    }

    #[test]
    fn test_next_observation_from_is_stateless() {
        let mut process = ou(0.0, &[0.0, 1.0, 2.0], replay(&[1.0, 0.0]));
        process.next_observation().expect("step");
        let before = process.path().clone();

        // 5 + 2·0.01·(1 - 5) + 0.5·0.1·0 = 4.92
        let x = process.next_observation_from(5.0, 0.01);
        assert!((x - 4.92).abs() < 1e-14);
        assert_eq!(process.path(), &before);
        assert_eq!(process.observation_index(), 1);
    }

    #[test]
    fn test_set_params_and_schedule_invalidate_cache() {
        let mut process = ou(0.0, &[0.0, 1.0, 2.0], NormalInvGen::new(CounterRng::new(3, 0)));
        process.generate_path().expect("path");
        assert!(process.coefficients_valid());

        process.set_params(0.5, 1.0, 0.0, 0.2).expect("valid parameters");
        assert!(!process.coefficients_valid());
        assert_eq!(process.x0(), 0.5);
        assert_eq!(process.model().sigma, 0.2);

        process.generate_path().expect("path");
        process.set_observation_schedule(
            ObservationSchedule::equally_spaced(0.0, 0.1, 10).expect("valid schedule"),
        );
        assert!(!process.coefficients_valid());
        let path = process.generate_path().expect("path");
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], 0.5);

        assert!(process.set_params(0.0, -1.0, 0.0, 0.2).is_err());
        assert_eq!(process.model().alpha, 1.0);
    }

    #[test]
    fn test_uniform_driven_path() {
        let mut process = ou(1.0, &[0.0, 0.5, 1.0], replay(&[]));
        // u = 0.5 gives zero noise: the path follows the drift exactly
        let path = process.generate_path_from_uniforms(&[0.5, 0.5]).expect("path");
        assert!((path[1] - 1.0).abs() < 1e-12);
        assert!(process.supports_sequential());
    }
}
