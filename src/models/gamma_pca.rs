//! Gamma Process by PCA Subordination
//!
//! # Mathematical Framework
//!
//! A gamma process with mean rate μ and variance rate ν has independent
//! increments
//! ```text
//! G(t_j) - G(t_{j-1}) ~ Gamma(shape = μ²Δt_j / ν, rate = μ / ν)
//! ```
//! The increments are produced by inversion from uniforms taken off a
//! Brownian path sampled by PCA:
//! ```text
//! v_j = Φ( (B(t_j) - B(t_{j-1})) / (√ν √Δt_j) )
//! G(t_j) = G(t_{j-1}) + F⁻¹_Gamma(v_j)
//! ```
//! The normalized Brownian increments are i.i.d. N(0,1), so the `v_j` are
//! i.i.d. uniforms, but the leading principal components of the Brownian path
//! now steer the whole gamma path.

use super::brownian_pca::BrownianMotionPca;
use super::process::{PathGenerator, ProcessCore, SamplingStrategy};
use crate::error::{validation::*, ProcessError, ProcessResult};
use crate::math_utils::norm_cdf;
use crate::randvar::gamma::gamma_inverse_cdf;
use crate::rng::NormalSource;
use crate::schedule::ObservationSchedule;

pub struct GammaProcessPca<G> {
    core: ProcessCore,
    mu: f64,
    nu: f64,
    mu_over_nu: f64,
    mu2_dt_over_nu: Vec<f64>,
    bm: BrownianMotionPca<G>,
}

impl<G: NormalSource> GammaProcessPca<G> {
    /// Gamma process started at `s0` with mean rate `mu` and variance rate `nu`.
    ///
    /// The inner Brownian covariance is built over absolute times, i.e. for a
    /// motion anchored at time 0. Anchor the schedule at `t_0 = 0`: with
    /// `t_0 > 0` the first normalized increment has variance `t_1 / (t_1 - t_0)`
    /// instead of 1, and `v_1` is no longer uniform.
    pub fn new(
        s0: f64,
        mu: f64,
        nu: f64,
        schedule: ObservationSchedule,
        gen: G,
    ) -> ProcessResult<Self> {
        Self::validate_params(s0, mu, nu)?;
        let bm = BrownianMotionPca::new(0.0, 0.0, nu.sqrt(), schedule.clone(), gen)?;
        let mut process = Self {
            core: ProcessCore::new(s0, schedule),
            mu,
            nu,
            mu_over_nu: 0.0,
            mu2_dt_over_nu: Vec::new(),
            bm,
        };
        process.refresh_coefficients();
        Ok(process)
    }

    fn validate_params(s0: f64, mu: f64, nu: f64) -> ProcessResult<()> {
        validate_finite("s0", s0)?;
        validate_positive("mu", mu)?;
        validate_positive("nu", nu)?;
        Ok(())
    }

    /// Replace `(s0, μ, ν)`; the inner Brownian motion gets σ = √ν.
    pub fn set_params(&mut self, s0: f64, mu: f64, nu: f64) -> ProcessResult<()> {
        Self::validate_params(s0, mu, nu)?;
        self.bm.set_params(0.0, 0.0, nu.sqrt())?;
        self.mu = mu;
        self.nu = nu;
        self.core.set_x0(s0);
        self.refresh_coefficients();
        Ok(())
    }

    fn refresh_coefficients(&mut self) {
        self.mu_over_nu = self.mu / self.nu;
        let mu2_over_nu = self.mu * self.mu / self.nu;
        self.mu2_dt_over_nu = self
            .core
            .schedule
            .deltas()
            .map(|dt| mu2_over_nu * dt)
            .collect();
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// The subordinating Brownian motion (σ = √ν, zero drift, same schedule).
    pub fn brownian(&self) -> &BrownianMotionPca<G> {
        &self.bm
    }

    pub fn normal_gen_mut(&mut self) -> &mut G {
        self.bm.normal_gen_mut()
    }

    /// Map the increments of the inner Brownian path to gamma increments.
    fn subordinate(&mut self) -> ProcessResult<&[f64]> {
        let bm_path = self.bm.path().values();
        let sigma = self.bm.sigma();
        let times = self.core.schedule.times();
        if bm_path.len() != times.len() {
            return Err(ProcessError::NumericalInstability {
                method: "gamma subordination".to_string(),
                reason: "inner Brownian path does not match the schedule".to_string(),
            });
        }

        let values = self.core.path.values_mut();
        values[0] = self.core.x0;
        for j in 1..times.len() {
            let sd = sigma * (times[j] - times[j - 1]).sqrt();
            let v = norm_cdf((bm_path[j] - bm_path[j - 1]) / sd);
            let increment = gamma_inverse_cdf(self.mu2_dt_over_nu[j - 1], self.mu_over_nu, v);
            values[j] = values[j - 1] + increment;
        }
        self.core.path.mark_complete();
        Ok(self.core.path.values())
    }
}

impl<G: NormalSource> PathGenerator for GammaProcessPca<G> {
    fn strategy(&self) -> SamplingStrategy {
        SamplingStrategy::Subordinated
    }

    fn core(&self) -> &ProcessCore {
        &self.core
    }

    fn set_observation_schedule(&mut self, schedule: ObservationSchedule) {
        self.bm.set_observation_schedule(schedule.clone());
        self.core.set_schedule(schedule);
        self.refresh_coefficients();
    }

    fn generate_path(&mut self) -> ProcessResult<&[f64]> {
        self.bm.generate_path()?;
        self.subordinate()
    }

    fn generate_path_from_uniforms(&mut self, uniforms: &[f64]) -> ProcessResult<&[f64]> {
        self.bm.generate_path_from_uniforms(uniforms)?;
        self.subordinate()
    }

    fn next_observation(&mut self) -> ProcessResult<f64> {
        Err(ProcessError::unsupported(
            "next_observation",
            "GammaProcessPca transforms a complete Brownian path",
        ))
    }

    fn next_observation_at(&mut self, _next_time: f64) -> ProcessResult<f64> {
        Err(ProcessError::unsupported(
            "next_observation_at",
            "GammaProcessPca transforms a complete Brownian path",
        ))
    }

    fn reset_start_process(&mut self) {
        self.core.reset();
        self.bm.reset_start_process();
    }
}
