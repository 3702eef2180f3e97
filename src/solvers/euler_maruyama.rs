// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for SDE Integration
//!
//! # Mathematical Framework
//!
//! For a general SDE:
//! ```text
//! dX_t = a(X_t, t) dt + b(X_t, t) dW_t
//! ```
//!
//! The Euler-Maruyama scheme provides the discretization:
//! ```text
//! X_{n+1} = X_n + a(X_n, t_n) Δt + b(X_n, t_n) √Δt Z_n
//! ```
//!
//! Where:
//! - `a(x,t)` is the drift coefficient
//! - `b(x,t)` is the diffusion coefficient
//! - `Z_n ~ N(0, 1)` are independent standard normal draws
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 0.5 in step size
//! - **Weak convergence**: Order 1.0 in step size

use crate::models::model::SDEModel;
use crate::rng::NormalSource;

/// Euler-Maruyama numerical scheme for SDE integration
pub struct EulerMaruyama;

impl EulerMaruyama {
    /// Single step from `x` at time `t` over `dt`, driven by the standard normal `z`
    pub fn step_with_normal<M: SDEModel + ?Sized>(model: &M, x: f64, t: f64, dt: f64, z: f64) -> f64 {
        let drift_term = model.drift(x, t) * dt;
        let diffusion_term = model.diffusion(x, t) * dt.sqrt() * z;
        x + drift_term + diffusion_term
    }

    /// Single step drawing its normal from `gen`
    pub fn step<M: SDEModel + ?Sized, N: NormalSource + ?Sized>(
        model: &M,
        x: f64,
        t: f64,
        dt: f64,
        gen: &mut N,
    ) -> f64 {
        let z = gen.next_normal();
        Self::step_with_normal(model, x, t, dt, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ou_process::OuProcess;

    #[test]
    fn test_single_step() {
        let ou = OuProcess::new(2.0, 1.0, 0.5).expect("valid parameters");
        // 3 + 2·(1 - 3)·0.25 + 0.5·0.5·1.2
        let x = EulerMaruyama::step_with_normal(&ou, 3.0, 0.0, 0.25, 1.2);
        assert!((x - 2.3).abs() < 1e-14);
    }

    #[test]
    fn test_zero_noise_is_deterministic_drift() {
        let ou = OuProcess::new(1.0, 0.0, 0.3).expect("valid parameters");
        let x = EulerMaruyama::step_with_normal(&ou, 1.0, 0.0, 0.1, 0.0);
        assert!((x - 0.9).abs() < 1e-15);
    }
}
