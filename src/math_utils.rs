use statrs::function::erf;
use std::f64::consts::SQRT_2;

/// Standard normal CDF Φ(x)
pub fn norm_cdf(x: f64) -> f64 {
    // erfc keeps relative accuracy in the lower tail
    0.5 * erf::erfc(-x / SQRT_2)
}

/// Standard normal quantile Φ⁻¹(u) for u in (0,1)
///
/// Returns -∞ / +∞ at the closed endpoints.
pub fn norm_inv_cdf(u: f64) -> f64 {
    if u <= 0.0 {
        f64::NEG_INFINITY
    } else if u >= 1.0 {
        f64::INFINITY
    } else {
        -SQRT_2 * erf::erfc_inv(2.0 * u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.959963984540054), 0.975, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(-1.0), 0.15865525393145707, epsilon = 1e-10);
        assert!(norm_cdf(-10.0) > 0.0);
    }

    #[test]
    fn test_norm_inv_cdf_inverts_cdf() {
        assert_abs_diff_eq!(norm_inv_cdf(0.5), 0.0, epsilon = 1e-14);
        for &x in &[-4.0, -1.5, -0.2, 0.3, 1.0, 2.5] {
            assert_abs_diff_eq!(norm_inv_cdf(norm_cdf(x)), x, epsilon = 1e-9);
        }
        assert_eq!(norm_inv_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(norm_inv_cdf(1.0), f64::INFINITY);
    }
}
