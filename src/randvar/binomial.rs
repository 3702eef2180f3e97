//! Binomial(n, p) by sequential search of the CDF, started from the nearer tail.

use super::Quantile;
use crate::error::{validation::*, ProcessError, ProcessResult};
use statrs::function::factorial::ln_binomial;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialDist {
    n: u64,
    p: f64,
}

impl BinomialDist {
    pub fn new(n: u64, p: f64) -> ProcessResult<Self> {
        if n == 0 {
            return Err(ProcessError::InvalidParameters {
                parameter: "n".to_string(),
                value: 0.0,
                constraint: "must be positive (> 0)".to_string(),
            });
        }
        validate_probability("p", p)?;
        Ok(Self { n, p })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        (ln_binomial(self.n, k)
            + k as f64 * self.p.ln()
            + (self.n - k) as f64 * (1.0 - self.p).ln())
        .exp()
    }
}

impl Quantile for BinomialDist {
    type Output = u64;

    /// Smallest `k` with `F(k) ≥ u`.
    ///
    /// For `u > 0.5` the search walks down from `n` and compares the upper
    /// tail `P(X > k)` against `1 - u`, so quantiles near 1 do not depend on a
    /// cumulative sum that rounds short of `u`.
    fn quantile(&self, u: f64) -> u64 {
        if u <= 0.5 {
            let mut cumulative = 0.0;
            for k in 0..self.n {
                cumulative += self.pmf(k);
                if cumulative >= u {
                    return k;
                }
            }
            return self.n;
        }

        let target = 1.0 - u;
        // P(X > k)
        let mut above = 0.0;
        let mut k = self.n;
        loop {
            let next_above = above + self.pmf(k);
            if k == 0 || next_above > target {
                return k;
            }
            above = next_above;
            k -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmf_sums_to_one() {
        let dist = BinomialDist::new(12, 0.35).expect("valid parameters");
        let total: f64 = (0..=12).map(|k| dist.pmf(k)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_steps() {
        let dist = BinomialDist::new(2, 0.5).expect("valid parameters");
        // F(0) = 0.25, F(1) = 0.75, F(2) = 1
        assert_eq!(dist.quantile(0.1), 0);
        assert_eq!(dist.quantile(0.2), 0);
        assert_eq!(dist.quantile(0.5), 1);
        assert_eq!(dist.quantile(0.9), 2);
    }

    #[test]
    fn test_upper_tail_quantiles() {
        let dist = BinomialDist::new(1000, 0.5).expect("valid parameters");
        let mut previous = dist.quantile(0.5);
        for &u in &[1.0 - 1e-12, 1.0 - 1e-15, 1.0 - 1.1e-16] {
            let k = dist.quantile(u);
            assert!(k < 1000, "u = {} gave {}", u, k);
            assert!(k >= previous);
            let target = 1.0 - u;
            let above: f64 = (k + 1..=1000).rev().map(|j| dist.pmf(j)).sum();
            assert!(above <= target);
            assert!(above + dist.pmf(k) > target);
            previous = k;
        }
    }

    #[test]
    fn test_degenerate_probabilities() {
        let never = BinomialDist::new(5, 0.0).expect("valid parameters");
        let always = BinomialDist::new(5, 1.0).expect("valid parameters");
        assert_eq!(never.quantile(0.99), 0);
        assert_eq!(always.quantile(0.01), 5);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(BinomialDist::new(0, 0.5).is_err());
        assert!(BinomialDist::new(10, 1.5).is_err());
        assert!(BinomialDist::new(10, -0.1).is_err());
    }
}
