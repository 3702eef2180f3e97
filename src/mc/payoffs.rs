//! Path Payoffs
//!
//! # Definitions
//!
//! Every payoff reads a committed path `[S_0, S_1, ..., S_d]`:
//! - **European**: `max(S_d - K, 0)` / `max(K - S_d, 0)`
//! - **Asian**: arithmetic average over the observations `S_1..S_d`
//!   (the initial value is not an observation)
//! - **Up-and-out barrier**: the European call, knocked out if any observed
//!   value reaches `H`
//!
//! [`PathPayoffModel`] turns any [`PathGenerator`] plus a payoff into an
//! [`McModel`], drawing exactly `d` uniforms per replication.

use super::experiment::{McModel, McModelCv};
use crate::error::{validation::*, ProcessError, ProcessResult};
use crate::models::process::PathGenerator;
use crate::rng::UniformStream;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    EuropeanCall { k: f64 },
    EuropeanPut { k: f64 },
    AsianCall { k: f64 },
    AsianPut { k: f64 },
    /// Call paying `max(S_d - K, 0)` only if `max_j S_j < H` for `j ≥ 1`
    BarrierCallUpAndOut { k: f64, h: f64 },
}

impl Payoff {
    /// Payoff of a path holding at least the initial value and one observation.
    pub fn calculate(&self, path: &[f64]) -> ProcessResult<f64> {
        if path.len() < 2 {
            return Err(ProcessError::InvalidConfiguration {
                field: "path".to_string(),
                reason: format!("payoff needs at least one observation, got {} values", path.len()),
            });
        }
        let observed = &path[1..];
        let terminal = observed[observed.len() - 1];
        let average = || observed.iter().sum::<f64>() / observed.len() as f64;

        let value = match *self {
            Payoff::EuropeanCall { k } => (terminal - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - terminal).max(0.0),
            Payoff::AsianCall { k } => (average() - k).max(0.0),
            Payoff::AsianPut { k } => (k - average()).max(0.0),
            Payoff::BarrierCallUpAndOut { k, h } => {
                if observed.iter().any(|&s| s >= h) {
                    0.0
                } else {
                    (terminal - k).max(0.0)
                }
            }
        };
        Ok(value)
    }
}

/// Monte Carlo model: one generated path, one discounted payoff.
///
/// With a control mean set, the first control variate is
/// `S_d - E[S_d]`, which has mean zero.
pub struct PathPayoffModel<P> {
    process: P,
    payoff: Payoff,
    discount: f64,
    terminal_mean: Option<f64>,
    uniforms: Vec<f64>,
    value: f64,
    cv: [f64; 1],
}

impl<P: PathGenerator> PathPayoffModel<P> {
    pub fn new(process: P, payoff: Payoff) -> Self {
        let d = process.dimension();
        Self {
            process,
            payoff,
            discount: 1.0,
            terminal_mean: None,
            uniforms: vec![0.0; d],
            value: 0.0,
            cv: [0.0],
        }
    }

    pub fn with_discount(mut self, discount: f64) -> ProcessResult<Self> {
        validate_positive("discount", discount)?;
        self.discount = discount;
        Ok(self)
    }

    /// Report `S_d - terminal_mean` as control variate.
    pub fn with_terminal_control(mut self, terminal_mean: f64) -> ProcessResult<Self> {
        validate_finite("terminal_mean", terminal_mean)?;
        self.terminal_mean = Some(terminal_mean);
        Ok(self)
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn process_mut(&mut self) -> &mut P {
        &mut self.process
    }

    pub fn payoff(&self) -> Payoff {
        self.payoff
    }
}

impl<P: PathGenerator> McModel for PathPayoffModel<P> {
    fn simulate(&mut self, stream: &mut dyn UniformStream) -> ProcessResult<()> {
        let d = self.process.dimension();
        if self.uniforms.len() != d {
            self.uniforms.resize(d, 0.0);
        }
        stream.fill_uniforms(&mut self.uniforms);
        let path = self.process.generate_path_from_uniforms(&self.uniforms)?;
        self.value = self.discount * self.payoff.calculate(path)?;
        if let Some(mean) = self.terminal_mean {
            self.cv[0] = path[path.len() - 1] - mean;
        }
        Ok(())
    }

    fn performance(&self) -> f64 {
        self.value
    }
}

impl<P: PathGenerator> McModelCv for PathPayoffModel<P> {
    fn values_cv(&self) -> &[f64] {
        if self.terminal_mean.is_some() {
            &self.cv[..]
        } else {
            &[]
        }
    }
}
