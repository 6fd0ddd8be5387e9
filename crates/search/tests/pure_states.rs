use linalg::DensityMatrix;
use optim::SolverOptions;
use search::{estimate, SearchConfig};
use tangle::pure::three_tangle;
use tangle::states::{basis, ghz, ghz_w_mixture};
use tangle::Layout;

fn config(starts: usize, seed: &str) -> SearchConfig {
    SearchConfig {
        starts,
        seed: seed.to_string(),
        solver: SolverOptions {
            maxiter: 80,
            ..SolverOptions::default()
        },
        ..SearchConfig::default()
    }
}

#[test]
fn product_state_estimate_is_zero() {
    let rho = DensityMatrix::pure(&basis(0)).unwrap();
    let report = estimate(&rho, &config(2, "product")).unwrap();

    let best = report.best().expect("no start converged");
    assert!((0.0..1e-3).contains(&best), "tau = {}", best);
}

#[test]
fn pure_ghz_estimate_matches_analytic_tangle() {
    let psi = ghz();
    let rho = DensityMatrix::pure(&psi).unwrap();
    let report = estimate(&rho, &config(4, "ghz")).unwrap();

    let best = report.best().expect("no start converged");
    let exact = three_tangle(&psi);
    assert!((best - exact).abs() < 2e-2, "tau = {}, exact = {}", best, exact);

    // every state carrying weight is GHZ up to a phase
    let layout = Layout::three_qubits(4).unwrap();
    let (weights, states) = layout.unpack(report.best_x().unwrap()).unwrap();
    let total: f64 = weights.iter().sum();
    assert!((total - 1.0).abs() < 1e-3, "weights = {:?}", weights);
    for (p, c) in weights.iter().zip(states) {
        if *p < 0.05 {
            continue;
        }
        let overlap: linalg::C64 = c.iter().zip(psi.iter()).map(|(a, b)| b.conj() * a).sum();
        assert!(overlap.norm() > 0.98, "|<ghz|c>| = {}", overlap.norm());
    }
}

#[test]
fn classical_mixture_of_product_states_has_zero_tangle() {
    let (a, b) = (basis(0), basis(7));
    let rho = DensityMatrix::mixture(&[(0.5, &a[..]), (0.5, &b[..])]).unwrap();
    let report = estimate(&rho, &config(4, "classical")).unwrap();

    let best = report.best().expect("no start converged");
    assert!((0.0..1e-2).contains(&best), "tau = {}", best);
}

#[test]
fn ghz_w_half_mixture_has_zero_tangle() {
    // zero for GHZ weights up to about 0.627
    let rho = ghz_w_mixture(0.5).unwrap();
    let mut cfg = config(24, "ghz-w");
    cfg.solver.maxiter = 100;
    cfg.threads = 0;
    let report = estimate(&rho, &cfg).unwrap();

    assert_eq!(report.starts(), 24);
    let best = report.best().expect("no start converged");
    assert!((0.0..1e-2).contains(&best), "tau = {}, outcomes = {:?}", best, report.outcomes());
}

#[test]
fn estimate_is_reproducible_for_a_seed() {
    let rho = DensityMatrix::pure(&basis(6)).unwrap();
    let mut cfg = config(1, "repeat");
    cfg.solver.maxiter = 20;

    let a = estimate(&rho, &cfg).unwrap();
    let b = estimate(&rho, &cfg).unwrap();
    assert_eq!(a.outcomes(), b.outcomes());
}
