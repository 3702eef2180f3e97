pub mod experiment;
pub mod payoffs;
pub mod tally;

pub use experiment::{
    compute_mean_var_cv, simulate_fd_replicates_crn, simulate_fd_replicates_irn, simulate_runs,
    simulate_runs_cv, simulate_runs_cv_estimate, CvEstimate, McModel, McModelCv,
};
pub use payoffs::{PathPayoffModel, Payoff};
pub use tally::Tally;
