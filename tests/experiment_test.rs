// tests/experiment_test.rs
use stoch_paths::mc::{
    simulate_fd_replicates_crn, simulate_fd_replicates_irn, simulate_runs, simulate_runs_cv_estimate,
    PathPayoffModel, Payoff, Tally,
};
use stoch_paths::rng::{seed_rng_from_u64, CounterRng, RngFactory, StdNormalGen};
use stoch_paths::{BrownianMotionPca, ObservationSchedule, OuProcess, OuProcessEuler};

fn ou_model(x0: f64, payoff: Payoff) -> PathPayoffModel<OuProcessEuler<StdNormalGen<rand::rngs::StdRng>>> {
    let process = OuProcessEuler::new(
        x0,
        OuProcess::new(1.0, 10.0, 0.5).expect("valid parameters"),
        ObservationSchedule::equally_spaced(0.0, 0.1, 10).expect("valid schedule"),
        StdNormalGen::new(seed_rng_from_u64(0)),
    )
    .expect("valid parameters");
    PathPayoffModel::new(process, payoff)
}

#[test]
fn test_terminal_control_reduces_variance() {
    let factory = RngFactory::new(99);
    let mut stream = factory.create_counter_rng(0);

    let schedule = ObservationSchedule::equally_spaced(0.0, 0.25, 4).expect("valid schedule");
    let bm = BrownianMotionPca::new(
        100.0,
        0.0,
        10.0,
        schedule,
        StdNormalGen::new(seed_rng_from_u64(0)),
    )
    .expect("valid parameters");
    let mut model = PathPayoffModel::new(bm, Payoff::AsianCall { k: 100.0 })
        .with_terminal_control(100.0)
        .expect("finite mean");

    let estimate = simulate_runs_cv_estimate(&mut model, 5000, &mut stream).expect("valid runs");
    assert!(estimate.beta > 0.0);
    assert!(
        estimate.variance_with_cv < 0.8 * estimate.variance,
        "variance {} with control {}",
        estimate.variance,
        estimate.variance_with_cv
    );
    assert!((estimate.mean_with_cv - estimate.mean).abs() < 1.0);
}

#[test]
fn test_runs_are_reproducible() {
    let mut model = ou_model(8.0, Payoff::EuropeanCall { k: 9.0 });
    let mut first = Tally::new();
    let mut second = Tally::new();
    simulate_runs(&mut model, 200, &mut CounterRng::new(3, 0), &mut first).expect("valid runs");
    simulate_runs(&mut model, 200, &mut CounterRng::new(3, 0), &mut second).expect("valid runs");
    assert_eq!(first, second);
}

#[test]
fn test_crn_finite_difference_of_initial_value() {
    // the payoff stays linear in S_d, so each CRN difference is the
    // Euler sensitivity (1 - αΔt)^d of the terminal value to x0
    let delta = 0.01;
    let mut model1 = ou_model(10.0, Payoff::EuropeanCall { k: -100.0 });
    let mut model2 = ou_model(10.0 + delta, Payoff::EuropeanCall { k: -100.0 });
    let mut stream = CounterRng::new(12, 0);
    let mut crn = Tally::new();
    simulate_fd_replicates_crn(&mut model1, &mut model2, delta, 500, &mut stream, &mut crn)
        .expect("valid runs");

    let sensitivity = 0.9_f64.powi(10);
    for &d in crn.values() {
        assert!((d - sensitivity).abs() < 1e-8, "difference {}", d);
    }

    let mut irn = Tally::new();
    stream = CounterRng::new(12, 0);
    simulate_fd_replicates_irn(&mut model1, &mut model2, delta, 500, &mut stream, &mut irn)
        .expect("valid runs");
    assert!(irn.variance() > 1000.0 * crn.variance().max(1e-12));
}
