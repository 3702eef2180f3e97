// tests/pca_test.rs
use stoch_paths::linalg::brownian_covariance;
use stoch_paths::rng::{CounterRng, NormalInvGen};
use stoch_paths::{BrownianMotionPca, ObservationSchedule, PathGenerator, SamplingStrategy};

fn min_time_covariance(times: &[f64], sigma: f64, i: usize, j: usize) -> f64 {
    sigma * sigma * times[i].min(times[j])
}

#[test]
fn test_two_step_scenario() {
    let schedule = ObservationSchedule::new(vec![0.0, 1.0, 2.0]).expect("valid schedule");
    let cov = brownian_covariance(&schedule, 1.0);
    assert_eq!(cov[(0, 0)], 1.0);
    assert_eq!(cov[(0, 1)], 1.0);
    assert_eq!(cov[(1, 1)], 2.0);

    let mut bm = BrownianMotionPca::new(
        0.0,
        0.0,
        1.0,
        schedule,
        NormalInvGen::new(CounterRng::new(1, 0)),
    )
    .expect("valid parameters");
    assert_eq!(bm.strategy(), SamplingStrategy::Pca);

    let path = bm.generate_path_from_normals(&[0.0, 0.0]).expect("path");
    assert_eq!(path, &[0.0, 0.0, 0.0]);

    let path = bm.generate_path().expect("path").to_vec();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], 0.0);
    assert_eq!(bm.observation_index(), 2);
}

#[test]
fn test_sample_covariance_converges() {
    let times = [0.0, 0.5, 1.0, 2.0];
    let sigma = 0.5;
    let mu = 0.3;
    let n = 20_000;
    let schedule = ObservationSchedule::new(times.to_vec()).expect("valid schedule");
    let mut bm = BrownianMotionPca::new(
        1.0,
        mu,
        sigma,
        schedule,
        NormalInvGen::new(CounterRng::new(2024, 0)),
    )
    .expect("valid parameters");

    let d = times.len() - 1;
    let mut sum = vec![0.0; d];
    let mut sum_prod = vec![vec![0.0; d]; d];
    for _ in 0..n {
        let path = bm.generate_path().expect("path");
        for i in 0..d {
            sum[i] += path[i + 1];
            for j in 0..d {
                sum_prod[i][j] += path[i + 1] * path[j + 1];
            }
        }
    }

    let nf = n as f64;
    for i in 0..d {
        let mean = sum[i] / nf;
        assert!(
            (mean - (1.0 + mu * times[i + 1])).abs() < 0.02,
            "mean at t{} is {}",
            i + 1,
            mean
        );
        for j in 0..d {
            let cov = sum_prod[i][j] / nf - (sum[i] / nf) * (sum[j] / nf);
            let expected = min_time_covariance(&times, sigma, i + 1, j + 1);
            assert!(
                (cov - expected).abs() < 0.03,
                "cov({}, {}) = {}, expected {}",
                i + 1,
                j + 1,
                cov,
                expected
            );
        }
    }
}

#[test]
fn test_leading_component_dominates() {
    let schedule = ObservationSchedule::equally_spaced(0.0, 1.0 / 64.0, 64).expect("valid schedule");
    let mut bm = BrownianMotionPca::new(
        0.0,
        0.0,
        1.0,
        schedule,
        NormalInvGen::new(CounterRng::new(3, 0)),
    )
    .expect("valid parameters");
    let factor = bm.spectral_factor().expect("factor");
    // continuous limit: 8/π² ≈ 81% for the first component, about 95% for four
    assert!(factor.explained_variance(1) > 0.75);
    assert!(factor.explained_variance(4) > 0.9);
}

#[test]
fn test_whole_path_only() {
    let schedule = ObservationSchedule::new(vec![0.0, 1.0]).expect("valid schedule");
    let mut bm = BrownianMotionPca::new(
        0.0,
        0.0,
        1.0,
        schedule,
        NormalInvGen::new(CounterRng::new(4, 0)),
    )
    .expect("valid parameters");
    for _ in 0..3 {
        let err = bm.next_observation().unwrap_err();
        assert!(err.is_unsupported());
        assert!(bm.next_observation_at(0.5).unwrap_err().is_unsupported());
    }
}
