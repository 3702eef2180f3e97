// demos/demo.rs
use stoch_paths::mc::{simulate_runs, simulate_runs_cv_estimate, PathPayoffModel, Payoff, Tally};
use stoch_paths::rng::{seed_rng_from_u64, CounterRng, NormalInvGen, RngFactory, StdNormalGen};
use stoch_paths::{
    BrownianMotionPca, GammaProcessPca, ObservationSchedule, OuProcess, OuProcessEuler,
    PathGenerator,
};

fn main() {
    println!("Running stoch-paths Demo\n");

    let schedule = ObservationSchedule::equally_spaced(0.0, 1.0 / 16.0, 16).expect("Valid schedule");

    // --- PCA Brownian motion ---
    println!("--- Brownian Motion by PCA ---");
    let mut bm = BrownianMotionPca::new(
        100.0,
        0.0,
        20.0,
        schedule.clone(),
        NormalInvGen::new(CounterRng::new(1, 0)),
    )
    .expect("Valid parameters");
    {
        let factor = bm.spectral_factor().expect("Factorizable covariance");
        for k in [1, 2, 4, 8] {
            println!(
                "Variance explained by the first {:>2} components: {:.2}%",
                k,
                100.0 * factor.explained_variance(k)
            );
        }
    }
    let path = bm.generate_path().expect("Path");
    println!("Terminal value: {:.4}", path[path.len() - 1]);
    match bm.next_observation() {
        Ok(_) => println!("Unexpected sequential step"),
        Err(e) => println!("Sequential step refused: {}", e),
    }

    // --- Asian call on the PCA path, terminal value as control ---
    println!("\n--- Asian Call with Terminal Control Variate ---");
    let mut model = PathPayoffModel::new(bm, Payoff::AsianCall { k: 100.0 })
        .with_terminal_control(100.0)
        .expect("Finite control mean");
    let mut stream = RngFactory::new(12345).create_counter_rng(0);
    let estimate = simulate_runs_cv_estimate(&mut model, 20_000, &mut stream).expect("Valid runs");
    println!("Average, no CV:     {:.6}", estimate.mean);
    println!("Average WITH CV:    {:.6}", estimate.mean_with_cv);
    println!("Variance, no CV:    {:.6}", estimate.variance);
    println!("Variance WITH CV:   {:.6}", estimate.variance_with_cv);
    println!("Variance reduction: {:.2}x", estimate.variance_reduction());

    // --- Gamma process by subordination ---
    println!("\n--- Gamma Process by PCA Subordination ---");
    let gamma = GammaProcessPca::new(
        100.0,
        10.0,
        5.0,
        schedule.clone(),
        NormalInvGen::new(CounterRng::new(2, 0)),
    )
    .expect("Valid parameters");
    let mut model = PathPayoffModel::new(gamma, Payoff::EuropeanCall { k: 110.0 });
    let mut stat = Tally::new();
    simulate_runs(&mut model, 10_000, &mut CounterRng::new(3, 0), &mut stat).expect("Valid runs");
    let (center, radius) = stat.confidence_interval_normal(0.95).expect("Valid level");
    println!("European call (K = 110): {:.4} ± {:.4}", center, radius);

    // --- Ornstein-Uhlenbeck stepping ---
    println!("\n--- Ornstein-Uhlenbeck by Euler-Maruyama ---");
    let ou = OuProcess::new(2.0, 100.0, 5.0).expect("Valid parameters");
    let mut process = OuProcessEuler::new(90.0, ou, schedule, StdNormalGen::new(seed_rng_from_u64(4)))
        .expect("Valid parameters");
    for _ in 0..4 {
        let x = process.next_observation().expect("Step");
        let t = process.schedule().time(process.observation_index());
        println!("X({:.4}) = {:.4}", t, x);
    }
    let probe = process.next_observation_from(process.path().current(), 0.5);
    println!("Probe half a unit ahead: {:.4} (path untouched at index {})", probe, process.observation_index());
    println!("Exact mean at t = 1 from 90: {:.4}", ou.exact_mean(90.0, 1.0));
}
