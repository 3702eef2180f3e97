// src/models/ou_process.rs
//! Ornstein-Uhlenbeck dynamics `dX_t = α(b - X_t) dt + σ dW_t`.

use super::model::SDEModel;
use crate::error::{validation::*, ProcessResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuProcess {
    /// Mean-reversion speed α
    pub alpha: f64,
    /// Long-run level b
    pub b: f64,
    /// Diffusion scale σ
    pub sigma: f64,
}

impl OuProcess {
    pub fn new(alpha: f64, b: f64, sigma: f64) -> ProcessResult<Self> {
        let model = OuProcess { alpha, b, sigma };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> ProcessResult<()> {
        validate_non_negative("alpha", self.alpha)?;
        validate_finite("b", self.b)?;
        validate_positive("sigma", self.sigma)?;
        Ok(())
    }

    /// `E[X(t+dt) | X(t) = x]`
    pub fn exact_mean(&self, x: f64, dt: f64) -> f64 {
        self.b + (x - self.b) * (-self.alpha * dt).exp()
    }

    /// `Var[X(t+dt) | X(t)]`
    pub fn exact_variance(&self, dt: f64) -> f64 {
        if self.alpha == 0.0 {
            self.sigma * self.sigma * dt
        } else {
            self.sigma * self.sigma * (1.0 - (-2.0 * self.alpha * dt).exp()) / (2.0 * self.alpha)
        }
    }
}

impl SDEModel for OuProcess {
    fn drift(&self, x: f64, _t: f64) -> f64 {
        self.alpha * (self.b - x)
    }

    fn diffusion(&self, _x: f64, _t: f64) -> f64 {
        self.sigma
    }
}
