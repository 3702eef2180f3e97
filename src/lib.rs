//! # stoch-paths: Sample Paths at Fixed Observation Times
//!
//! Generates paths of continuous-time stochastic processes observed at
//! `t_0 < t_1 < ... < t_d`, for use inside Monte Carlo experiments.
//!
//! ## Sampling Strategies
//!
//! - **PCA** ([`BrownianMotionPca`]): the whole Brownian path from a spectral
//!   factor of its covariance matrix, leading principal components first
//! - **Subordinated** ([`GammaProcessPca`]): a gamma process obtained by
//!   inverting the normalized increments of a PCA Brownian path
//! - **Euler** ([`OuProcessEuler`]): Ornstein-Uhlenbeck stepping, one
//!   observation at a time, plus free stepping to arbitrary times
//!
//! Whole-path generators report [`ProcessError::UnsupportedOperation`] when
//! asked to step.
//!
//! ## Quick Start
//!
//! ```rust
//! use stoch_paths::{BrownianMotionPca, ObservationSchedule, PathGenerator};
//! use stoch_paths::rng::{CounterRng, NormalInvGen};
//!
//! let schedule = ObservationSchedule::new(vec![0.0, 0.25, 0.5, 1.0]).expect("valid schedule");
//! let gen = NormalInvGen::new(CounterRng::new(42, 0));
//! let mut bm = BrownianMotionPca::new(0.0, 0.05, 0.2, schedule, gen).expect("valid parameters");
//!
//! let path = bm.generate_path().expect("path");
//! assert_eq!(path.len(), 4);
//! assert!(bm.next_observation().is_err());
//! ```

pub mod error;
pub mod linalg;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod path;
pub mod randvar;
pub mod rng;
pub mod schedule;
pub mod solvers;

pub use error::{ProcessError, ProcessResult};
pub use models::{
    BrownianMotionPca, GammaProcessPca, OuProcess, OuProcessEuler, PathGenerator, ProcessCore,
    SamplingStrategy,
};
pub use path::Path;
pub use schedule::ObservationSchedule;
