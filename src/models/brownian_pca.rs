//! Brownian Motion by Principal Components
//!
//! # Mathematical Framework
//!
//! For `X(t) = x0 + μt + σW(t)` observed at `t_1 < ... < t_d`, the vector
//! `(σW(t_1), ..., σW(t_d))` is Gaussian with covariance `C_ij = σ² min(t_i, t_j)`.
//! With `C = A · Aᵗ` from the spectral factorization,
//! ```text
//! X(t_j) = x0 + μ t_j + Σ_k A_jk z_k,    z ~ N(0, I_d)
//! ```
//! Every observation mixes all `d` normals, so the path exists only as a
//! whole. Columns of `A` are ordered by decreasing eigenvalue: the first few
//! normals drive most of the path variance, which is what makes this
//! construction pair well with quasi-Monte Carlo and stratification on the
//! leading coordinates.

use super::process::{check_uniform_count, PathGenerator, ProcessCore, SamplingStrategy};
use crate::error::{validation::*, ProcessError, ProcessResult};
use crate::linalg::{brownian_covariance, SpectralFactor, SpectralFactorizer};
use crate::math_utils::norm_inv_cdf;
use crate::rng::NormalSource;
use crate::schedule::ObservationSchedule;
use nalgebra::DMatrix;

pub struct BrownianMotionPca<G> {
    core: ProcessCore,
    mu: f64,
    sigma: f64,
    gen: G,
    factorizer: SpectralFactorizer,
    z: Vec<f64>,
}

impl<G: NormalSource> BrownianMotionPca<G> {
    pub fn new(
        x0: f64,
        mu: f64,
        sigma: f64,
        schedule: ObservationSchedule,
        gen: G,
    ) -> ProcessResult<Self> {
        Self::validate_params(x0, mu, sigma)?;
        let d = schedule.dimension();
        Ok(Self {
            core: ProcessCore::new(x0, schedule),
            mu,
            sigma,
            gen,
            factorizer: SpectralFactorizer::new(),
            z: vec![0.0; d],
        })
    }

    fn validate_params(x0: f64, mu: f64, sigma: f64) -> ProcessResult<()> {
        validate_finite("x0", x0)?;
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        Ok(())
    }

    /// Replace `(x0, μ, σ)`. The spectral factor is recomputed on next use.
    pub fn set_params(&mut self, x0: f64, mu: f64, sigma: f64) -> ProcessResult<()> {
        Self::validate_params(x0, mu, sigma)?;
        self.mu = mu;
        self.sigma = sigma;
        self.core.set_x0(x0);
        self.factorizer.invalidate();
        Ok(())
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn normal_gen_mut(&mut self) -> &mut G {
        &mut self.gen
    }

    pub fn is_factor_valid(&self) -> bool {
        self.factorizer.is_valid()
    }

    /// Current spectral factor, recomputed first if stale.
    pub fn spectral_factor(&mut self) -> ProcessResult<&SpectralFactor> {
        let sigma = self.sigma;
        let schedule = &self.core.schedule;
        self.factorizer
            .get_or_refresh_with(|| brownian_covariance(schedule, sigma))
    }

    /// Loading matrix `A` with `A · Aᵗ = C`, columns ordered by decreasing variance.
    pub fn loadings(&mut self) -> ProcessResult<&DMatrix<f64>> {
        Ok(self.spectral_factor()?.loadings())
    }

    /// Eigenvalues of the covariance matrix, largest first.
    pub fn sorted_eigenvalues(&mut self) -> ProcessResult<&[f64]> {
        Ok(self.spectral_factor()?.eigenvalues())
    }

    /// Generate the path from `d` caller-supplied standard normals.
    ///
    /// # Panics
    ///
    /// If `normals.len()` differs from the schedule dimension.
    pub fn generate_path_from_normals(&mut self, normals: &[f64]) -> ProcessResult<&[f64]> {
        assert_eq!(
            normals.len(),
            self.z.len(),
            "expected one normal per observation step"
        );
        self.z.copy_from_slice(normals);
        self.combine()
    }

    /// `path[j] = x0 + μ t_j + Σ_k A_jk z_k` for the normals currently in `z`.
    fn combine(&mut self) -> ProcessResult<&[f64]> {
        let sigma = self.sigma;
        let schedule = &self.core.schedule;
        let factor = self
            .factorizer
            .get_or_refresh_with(|| brownian_covariance(schedule, sigma))?;
        let a = factor.loadings();
        if a.nrows() != self.z.len() {
            return Err(ProcessError::NumericalInstability {
                method: "PCA path generation".to_string(),
                reason: format!(
                    "loading matrix is {}×{} but the schedule has {} steps",
                    a.nrows(),
                    a.ncols(),
                    self.z.len()
                ),
            });
        }

        let x0 = self.core.x0;
        let mu = self.mu;
        let times = self.core.schedule.times();
        let values = self.core.path.values_mut();
        values[0] = x0;
        for j in 0..self.z.len() {
            let mut sum = 0.0;
            for (k, z) in self.z.iter().enumerate() {
                sum += a[(j, k)] * z;
            }
            values[j + 1] = x0 + mu * times[j + 1] + sum;
        }
        self.core.path.mark_complete();
        Ok(self.core.path.values())
    }
}

impl<G: NormalSource> PathGenerator for BrownianMotionPca<G> {
    fn strategy(&self) -> SamplingStrategy {
        SamplingStrategy::Pca
    }

    fn core(&self) -> &ProcessCore {
        &self.core
    }

    fn set_observation_schedule(&mut self, schedule: ObservationSchedule) {
        self.z = vec![0.0; schedule.dimension()];
        self.core.set_schedule(schedule);
        self.factorizer.invalidate();
    }

    fn generate_path(&mut self) -> ProcessResult<&[f64]> {
        for z in self.z.iter_mut() {
            *z = self.gen.next_normal();
        }
        self.combine()
    }

    fn generate_path_from_uniforms(&mut self, uniforms: &[f64]) -> ProcessResult<&[f64]> {
        check_uniform_count(uniforms, self.z.len());
        for (z, &u) in self.z.iter_mut().zip(uniforms) {
            *z = norm_inv_cdf(u);
        }
        self.combine()
    }

    fn next_observation(&mut self) -> ProcessResult<f64> {
        Err(ProcessError::unsupported(
            "next_observation",
            "BrownianMotionPca generates whole paths only",
        ))
    }

    fn next_observation_at(&mut self, _next_time: f64) -> ProcessResult<f64> {
        Err(ProcessError::unsupported(
            "next_observation_at",
            "BrownianMotionPca generates whole paths only",
        ))
    }

    fn reset_start_process(&mut self) {
        self.core.reset();
    }
}
