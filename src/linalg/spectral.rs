//! Spectral Factorization of Covariance Matrices
//!
//! # Mathematical Framework
//!
//! A symmetric positive-semidefinite matrix factors as
//! ```text
//! C = P · D · Pᵗ = (P · √D) · (P · √D)ᵗ = A · Aᵗ
//! ```
//! where the columns of `P` are orthonormal eigenvectors and `D` holds the
//! eigenvalues. Sorting the eigenvalues in decreasing order puts the
//! direction of largest variance in the first column of `A`, so when
//! `A · z` is used to build a path from i.i.d. normals `z`, the first
//! normals carry most of the path variance (Karhunen-Loève ordering).
//!
//! # Caching
//!
//! [`SpectralFactorizer`] keeps the last factor together with an explicit
//! `valid` flag. Owners call [`SpectralFactorizer::invalidate`] from every
//! parameter or schedule mutator and [`SpectralFactorizer::refresh`] before
//! the next use.

use crate::error::{ProcessError, ProcessResult};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use tracing::{debug, warn};

/// Loading matrix `A` and eigenvalues sorted in decreasing order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFactor {
    loadings: DMatrix<f64>,
    eigenvalues: DVector<f64>,
}

impl SpectralFactor {
    /// `A`, with `A · Aᵗ ≈ C`.
    pub fn loadings(&self) -> &DMatrix<f64> {
        &self.loadings
    }

    /// Eigenvalues of `C`, largest first.
    pub fn eigenvalues(&self) -> &[f64] {
        self.eigenvalues.as_slice()
    }

    pub fn dimension(&self) -> usize {
        self.eigenvalues.len()
    }

    /// `A · Aᵗ`
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.loadings * self.loadings.transpose()
    }

    /// Fraction of total variance carried by the first `k` components.
    pub fn explained_variance(&self, k: usize) -> f64 {
        let total: f64 = self.eigenvalues.iter().map(|l| l.max(0.0)).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let head: f64 = self.eigenvalues.iter().take(k).map(|l| l.max(0.0)).sum();
        head / total
    }
}

/// Factor a symmetric PSD matrix into `A · Aᵗ` with most-variance-first columns.
///
/// Small negative eigenvalues from rounding are clipped to zero before the
/// square root; the reported eigenvalues keep their computed sign.
pub fn decompose(cov: &DMatrix<f64>) -> ProcessResult<SpectralFactor> {
    if !cov.is_square() || cov.nrows() == 0 {
        return Err(ProcessError::NumericalInstability {
            method: "spectral decomposition".to_string(),
            reason: format!(
                "expected a non-empty square matrix, got {}×{}",
                cov.nrows(),
                cov.ncols()
            ),
        });
    }
    if cov.iter().any(|x| !x.is_finite()) {
        return Err(ProcessError::NumericalInstability {
            method: "spectral decomposition".to_string(),
            reason: "covariance matrix has non-finite entries".to_string(),
        });
    }

    let d = cov.nrows();
    let sym = (cov + cov.transpose()) * 0.5;
    let eig = SymmetricEigen::new(sym);

    let mut order: Vec<usize> = (0..d).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

    let eigenvalues = DVector::from_iterator(d, order.iter().map(|&k| eig.eigenvalues[k]));
    let clipped = eigenvalues.iter().filter(|&&l| l < 0.0).count();
    if clipped > 0 {
        warn!(
            clipped,
            smallest = eigenvalues[d - 1],
            "covariance matrix is not positive semidefinite; clipping negative eigenvalues"
        );
    }

    let mut loadings = DMatrix::zeros(d, d);
    for (col, &k) in order.iter().enumerate() {
        let scale = eig.eigenvalues[k].max(0.0).sqrt();
        loadings.set_column(col, &(eig.eigenvectors.column(k) * scale));
    }

    Ok(SpectralFactor {
        loadings,
        eigenvalues,
    })
}

/// Cached spectral factor guarded by an explicit validity flag.
#[derive(Debug, Clone, Default)]
pub struct SpectralFactorizer {
    factor: Option<SpectralFactor>,
    valid: bool,
}

impl SpectralFactorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the cached factor stale; the next [`refresh`](Self::refresh) recomputes it.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Last computed factor, if any, regardless of validity.
    pub fn factor(&self) -> Option<&SpectralFactor> {
        self.factor.as_ref()
    }

    /// Factor `cov`, store the result and mark the cache valid.
    pub fn refresh(&mut self, cov: &DMatrix<f64>) -> ProcessResult<&SpectralFactor> {
        let factor = decompose(cov)?;
        debug!(
            dimension = factor.dimension(),
            leading_eigenvalue = factor.eigenvalues()[0],
            "recomputed spectral factor"
        );
        self.valid = true;
        Ok(self.factor.insert(factor))
    }

    /// Cached factor if valid, otherwise factor the matrix produced by `build`.
    pub fn get_or_refresh_with<F>(&mut self, build: F) -> ProcessResult<&SpectralFactor>
    where
        F: FnOnce() -> DMatrix<f64>,
    {
        if !self.valid || self.factor.is_none() {
            let cov = build();
            return self.refresh(&cov);
        }
        self.factor
            .as_ref()
            .ok_or_else(|| ProcessError::NumericalInstability {
                method: "spectral decomposition".to_string(),
                reason: "factor marked valid but missing".to_string(),
            })
    }
}
