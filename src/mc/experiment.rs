//! Monte Carlo Experiment Driver
//!
//! # Replications
//!
//! A model consumes uniforms from a [`RandomStream`] and reports one
//! performance value per replication. After every replication the stream
//! jumps to its next substream, so replication `i` always sees substream
//! `start + i` no matter how many uniforms earlier replications used.
//!
//! # Control Variates
//!
//! With performance `X` and a control `C` of known mean zero:
//! ```text
//! β        = Cov(C, X) / Var(C)
//! X_cv     = X̄ - β C̄
//! Var_cv   = Var(X) + β² Var(C) - 2β Cov(C, X)
//! ```
//!
//! # Finite Differences
//!
//! `(Y₂ - Y₁) / δ` estimates a derivative. With common random numbers both
//! models restart from the same substream, which correlates `Y₁` and `Y₂`
//! and shrinks the variance of the difference.

use super::tally::Tally;
use crate::error::{validation::*, ProcessError, ProcessResult};
use crate::rng::{RandomStream, UniformStream};
use tracing::debug;

/// A simulation model producing one performance value per replication.
pub trait McModel {
    /// Run one replication drawing uniforms from `stream`.
    fn simulate(&mut self, stream: &mut dyn UniformStream) -> ProcessResult<()>;

    /// Performance of the last replication.
    fn performance(&self) -> f64;
}

/// A model that also reports control variates with mean zero.
pub trait McModelCv: McModel {
    fn values_cv(&self) -> &[f64];
}

/// Mean and variance with and without the first control variate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvEstimate {
    pub mean: f64,
    pub variance: f64,
    pub beta: f64,
    pub mean_with_cv: f64,
    pub variance_with_cv: f64,
}

impl CvEstimate {
    /// Variance reduction factor `Var(X) / Var_cv`.
    pub fn variance_reduction(&self) -> f64 {
        self.variance / self.variance_with_cv
    }
}

/// `n` replications of `model`, collecting performances in `stat`.
pub fn simulate_runs<M, S>(model: &mut M, n: usize, stream: &mut S, stat: &mut Tally) -> ProcessResult<()>
where
    M: McModel + ?Sized,
    S: RandomStream,
{
    validate_runs(n)?;
    stat.clear();
    for _ in 0..n {
        model.simulate(stream)?;
        stat.add(model.performance());
        stream.reset_next_substream();
    }
    debug!(runs = n, average = stat.average(), "simulated replications");
    Ok(())
}

/// `n` replications collecting the performance in `stat_x` and the first
/// control variate in `stat_c`.
pub fn simulate_runs_cv<M, S>(
    model: &mut M,
    n: usize,
    stream: &mut S,
    stat_x: &mut Tally,
    stat_c: &mut Tally,
) -> ProcessResult<()>
where
    M: McModelCv + ?Sized,
    S: RandomStream,
{
    validate_runs(n)?;
    stat_x.clear();
    stat_c.clear();
    for _ in 0..n {
        model.simulate(stream)?;
        stat_x.add(model.performance());
        let c = model.values_cv().first().copied().ok_or_else(|| {
            ProcessError::InvalidConfiguration {
                field: "values_cv".to_string(),
                reason: "model reports no control variate".to_string(),
            }
        })?;
        stat_c.add(c);
        stream.reset_next_substream();
    }
    debug!(runs = n, "simulated replications with control variate");
    Ok(())
}

/// Estimates without and with the control variate from paired tallies.
pub fn compute_mean_var_cv(stat_x: &Tally, stat_c: &Tally) -> ProcessResult<CvEstimate> {
    let mean = stat_x.average();
    let variance = stat_x.variance();
    let var_c = stat_c.variance();
    let cov_cx = stat_c.covariance(stat_x)?;
    if !(var_c > 0.0) {
        return Err(ProcessError::NumericalInstability {
            method: "control variate".to_string(),
            reason: format!("control variate has variance {}", var_c),
        });
    }
    let beta = cov_cx / var_c;
    let estimate = CvEstimate {
        mean,
        variance,
        beta,
        mean_with_cv: mean - beta * stat_c.average(),
        variance_with_cv: variance + beta * beta * var_c - 2.0 * beta * cov_cx,
    };
    debug!(
        beta,
        variance = estimate.variance,
        variance_with_cv = estimate.variance_with_cv,
        "control variate estimate"
    );
    Ok(estimate)
}

/// Replications of the control-variate model followed by [`compute_mean_var_cv`].
pub fn simulate_runs_cv_estimate<M, S>(model: &mut M, n: usize, stream: &mut S) -> ProcessResult<CvEstimate>
where
    M: McModelCv + ?Sized,
    S: RandomStream,
{
    let mut stat_x = Tally::with_capacity(n);
    let mut stat_c = Tally::with_capacity(n);
    simulate_runs_cv(model, n, stream, &mut stat_x, &mut stat_c)?;
    compute_mean_var_cv(&stat_x, &stat_c)
}

/// Finite differences with common random numbers: both models replay the
/// same substream.
pub fn simulate_fd_replicates_crn<M1, M2, S>(
    model1: &mut M1,
    model2: &mut M2,
    delta: f64,
    n: usize,
    stream: &mut S,
    stat_diff: &mut Tally,
) -> ProcessResult<()>
where
    M1: McModel + ?Sized,
    M2: McModel + ?Sized,
    S: RandomStream,
{
    validate_runs(n)?;
    validate_positive("delta", delta)?;
    stat_diff.clear();
    for _ in 0..n {
        stream.reset_next_substream();
        model1.simulate(stream)?;
        let value1 = model1.performance();
        stream.reset_start_substream();
        model2.simulate(stream)?;
        stat_diff.add((model2.performance() - value1) / delta);
    }
    debug!(runs = n, delta, "finite differences with common random numbers");
    Ok(())
}

/// Finite differences with independent random numbers: the second model
/// continues the substream where the first stopped.
pub fn simulate_fd_replicates_irn<M1, M2, S>(
    model1: &mut M1,
    model2: &mut M2,
    delta: f64,
    n: usize,
    stream: &mut S,
    stat_diff: &mut Tally,
) -> ProcessResult<()>
where
    M1: McModel + ?Sized,
    M2: McModel + ?Sized,
    S: RandomStream,
{
    validate_runs(n)?;
    validate_positive("delta", delta)?;
    stat_diff.clear();
    for _ in 0..n {
        stream.reset_next_substream();
        model1.simulate(stream)?;
        let value1 = model1.performance();
        model2.simulate(stream)?;
        stat_diff.add((model2.performance() - value1) / delta);
    }
    debug!(runs = n, delta, "finite differences with independent random numbers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::CounterRng;

    /// Performance is the first uniform of the replication.
    struct FirstUniform {
        value: f64,
        cv: [f64; 1],
    }

    impl FirstUniform {
        fn new() -> Self {
            Self {
                value: 0.0,
                cv: [0.0],
            }
        }
    }

    impl McModel for FirstUniform {
        fn simulate(&mut self, stream: &mut dyn UniformStream) -> ProcessResult<()> {
            let u = stream.next_uniform();
            self.value = u + 0.1 * stream.next_uniform();
            self.cv = [u - 0.5];
            Ok(())
        }

        fn performance(&self) -> f64 {
            self.value
        }
    }

    impl McModelCv for FirstUniform {
        fn values_cv(&self) -> &[f64] {
            &self.cv
        }
    }

    #[test]
    fn test_runs_use_successive_substreams() {
        let mut model = FirstUniform::new();
        let mut stream = CounterRng::new(5, 0);
        let mut stat = Tally::new();
        simulate_runs(&mut model, 3, &mut stream, &mut stat).expect("valid runs");
        assert_eq!(stat.count(), 3);
        assert_eq!(stream.substream(), 3);

        let mut third = CounterRng::new(5, 2);
        let u = third.next_uniform();
        let expected = u + 0.1 * third.next_uniform();
        assert_eq!(stat.values()[2], expected);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let mut model = FirstUniform::new();
        let mut stream = CounterRng::new(5, 0);
        let mut stat = Tally::new();
        assert!(simulate_runs(&mut model, 0, &mut stream, &mut stat).is_err());
    }

    #[test]
    fn test_control_variate_reduces_variance() {
        let mut model = FirstUniform::new();
        let mut stream = CounterRng::new(11, 0);
        let estimate = simulate_runs_cv_estimate(&mut model, 2000, &mut stream).expect("valid runs");
        // X = U + 0.1 V with C = U - 1/2: β ≈ 1, residual variance 0.01/12
        assert!((estimate.beta - 1.0).abs() < 0.05);
        assert!(estimate.variance_with_cv < estimate.variance / 50.0);
        assert!((estimate.mean_with_cv - 0.55).abs() < 0.005);
    }

    #[test]
    fn test_crn_differences_vanish_for_identical_models() {
        let mut model1 = FirstUniform::new();
        let mut model2 = FirstUniform::new();
        let mut stream = CounterRng::new(1, 0);
        let mut stat = Tally::new();
        simulate_fd_replicates_crn(&mut model1, &mut model2, 0.1, 50, &mut stream, &mut stat)
            .expect("valid runs");
        assert!(stat.values().iter().all(|&d| d == 0.0));

        simulate_fd_replicates_irn(&mut model1, &mut model2, 0.1, 50, &mut stream, &mut stat)
            .expect("valid runs");
        assert!(stat.variance() > 1.0);
    }
}
