//! Covariance construction and spectral (PCA) factorization.

pub mod covariance;
pub mod spectral;

pub use covariance::brownian_covariance;
pub use spectral::{decompose, SpectralFactor, SpectralFactorizer};
