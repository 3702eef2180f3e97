use crate::schedule::ObservationSchedule;
use nalgebra::DMatrix;

/// Covariance of `σ·W(t_1), ..., σ·W(t_d)` for a Brownian motion anchored at time 0.
///
/// Entry `(i, j)` is `σ²·min(t_i, t_j)`; rows and columns are indexed from
/// `t_1`, so the matrix is `d × d`.
pub fn brownian_covariance(schedule: &ObservationSchedule, sigma: f64) -> DMatrix<f64> {
    let d = schedule.dimension();
    let var = sigma * sigma;
    DMatrix::from_fn(d, d, |i, j| var * schedule.time(i.min(j) + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_step_covariance() {
        let schedule = ObservationSchedule::new(vec![0.0, 1.0, 2.0]).expect("valid schedule");
        let cov = brownian_covariance(&schedule, 1.0);
        assert_eq!(cov, DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 2.0]));
    }

    #[test]
    fn test_min_time_structure() {
        let schedule =
            ObservationSchedule::new(vec![0.0, 0.3, 0.7, 1.2, 2.0]).expect("valid schedule");
        let sigma = 0.4;
        let cov = brownian_covariance(&schedule, sigma);
        let t = schedule.times();
        for i in 0..4 {
            for j in 0..4 {
                let expected = sigma * sigma * t[i + 1].min(t[j + 1]);
                assert!((cov[(i, j)] - expected).abs() < 1e-15);
                assert_eq!(cov[(i, j)], cov[(j, i)]);
            }
        }
    }
}
