use super::Quantile;
use crate::error::{validation::*, ProcessResult};
use crate::math_utils::norm_inv_cdf;

/// Standard normal N(0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StdNormalDist;

impl Quantile for StdNormalDist {
    type Output = f64;

    fn quantile(&self, u: f64) -> f64 {
        norm_inv_cdf(u)
    }
}

/// Normal N(mu, sigma²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDist {
    mu: f64,
    sigma: f64,
}

impl NormalDist {
    pub fn new(mu: f64, sigma: f64) -> ProcessResult<Self> {
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Quantile for NormalDist {
    type Output = f64;

    fn quantile(&self, u: f64) -> f64 {
        self.mu + self.sigma * norm_inv_cdf(u)
    }
}
