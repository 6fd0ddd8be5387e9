use linalg::DensityMatrix;
use optim::{fd::FiniteDifference, Problem, Solution, Solver, SolverError, Status};
use search::{start::start_point, MultiStart, SearchConfig, SearchError, StartOutcome};
use tangle::{constraints::bounds, decomposition_problem, states::ghz, Layout, TangleError};

/// Reports the objective at the starting point as the minimum.
struct EvaluateOnly;

impl Solver for EvaluateOnly {
    fn minimize(&self, problem: &Problem, x0: &[f64]) -> Result<Solution, SolverError> {
        Ok(Solution {
            x: x0.to_vec(),
            fun: problem.objective().value(x0),
            status: Status::Converged,
            iterations: 0,
            inner_iterations: 0,
            constraint_violation: 0.0,
        })
    }
}

/// Feasible minimum of 0.5 whose violation is the second weight of x0.
struct ViolationFromStart;

impl Solver for ViolationFromStart {
    fn minimize(&self, _problem: &Problem, x0: &[f64]) -> Result<Solution, SolverError> {
        Ok(Solution {
            x: x0.to_vec(),
            fun: 0.5,
            status: Status::MaxIterations,
            iterations: 3,
            inner_iterations: 30,
            constraint_violation: x0[1],
        })
    }
}

struct AlwaysFails;

impl Solver for AlwaysFails {
    fn minimize(&self, _problem: &Problem, _x0: &[f64]) -> Result<Solution, SolverError> {
        Err(SolverError::NonFinite { stage: "objective" })
    }
}

fn layout() -> Layout {
    Layout::three_qubits(4).unwrap()
}

fn config(starts: usize) -> SearchConfig {
    SearchConfig {
        starts,
        seed: "driver-test".to_string(),
        ..SearchConfig::default()
    }
}

fn shifted_weight_problem() -> Problem {
    let objective = FiniteDifference::new(layout().dim(), |x: &[f64]| x[0] - 0.25);
    Problem::new(Box::new(objective), bounds(layout()).unwrap(), Vec::new()).unwrap()
}

fn ghz_problem() -> Problem {
    let rho = DensityMatrix::pure(&ghz()).unwrap();
    decomposition_problem(layout(), &rho, 1e-30).unwrap()
}

#[test]
fn negative_results_are_discarded() {
    let cfg = config(16);
    let search = MultiStart::new(cfg.clone(), EvaluateOnly).unwrap();
    let report = search.run_problem(layout(), &shifted_weight_problem()).unwrap();

    let mut expected_best = f64::INFINITY;
    for (k, outcome) in report.outcomes().iter().enumerate() {
        let v = start_point(&cfg.seed, k, layout())[0] - 0.25;
        if v < 0.0 {
            assert_eq!(outcome, &StartOutcome::Negative { value: v });
        } else {
            assert_eq!(outcome.value(), Some(v));
            expected_best = expected_best.min(v);
        }
    }

    assert!(report.discarded() > 0, "no negative start in sample");
    assert!(report.converged() > 0, "no non-negative start in sample");
    assert_eq!(report.best(), Some(expected_best));
    assert!(report.best().unwrap() >= 0.0);
}

#[test]
fn infeasible_results_are_discarded() {
    let cfg = SearchConfig {
        feasibility_tol: 0.25,
        ..config(12)
    };
    let search = MultiStart::new(cfg.clone(), ViolationFromStart).unwrap();
    let report = search.run_problem(layout(), &ghz_problem()).unwrap();

    for (k, outcome) in report.outcomes().iter().enumerate() {
        let violation = start_point(&cfg.seed, k, layout())[1];
        if violation > 0.25 {
            assert!(matches!(outcome, StartOutcome::Infeasible { .. }), "{:?}", outcome);
        } else {
            assert_eq!(outcome.value(), Some(0.5));
        }
    }
    assert_eq!(report.converged() + report.discarded(), 12);
}

#[test]
fn all_failed_yields_no_estimate() {
    let search = MultiStart::new(config(5), AlwaysFails).unwrap();
    let report = search.run_problem(layout(), &ghz_problem()).unwrap();

    assert_eq!(report.failed(), 5);
    assert_eq!(report.best(), None);
    assert_eq!(report.best_start(), None);
    assert!(report.best_x().is_none());
    assert_eq!(report.value_or_infinity(), f64::INFINITY);
    assert!(report.outcomes().iter().all(|o| matches!(
        o,
        StartOutcome::Failed {
            error: SolverError::NonFinite { stage: "objective" }
        }
    )));
}

#[test]
fn best_is_non_increasing_in_start_count() {
    let problem = ghz_problem();
    let mut previous = f64::INFINITY;
    for n in 1..=12 {
        let search = MultiStart::new(config(n), EvaluateOnly).unwrap();
        let best = search.run_problem(layout(), &problem).unwrap().value_or_infinity();
        assert!(best <= previous, "N = {}: {} > {}", n, best, previous);
        assert!(best.is_finite());
        previous = best;
    }
}

#[test]
fn parallel_matches_sequential() {
    let problem = ghz_problem();
    let run = |threads: usize| {
        let cfg = SearchConfig {
            threads,
            ..config(9)
        };
        MultiStart::new(cfg, EvaluateOnly)
            .unwrap()
            .run_problem(layout(), &problem)
            .unwrap()
    };

    let seq = run(1);
    let pooled = run(3);
    let global = run(0);
    assert_eq!(seq.outcomes(), pooled.outcomes());
    assert_eq!(seq.outcomes(), global.outcomes());
    assert_eq!(seq.best_start(), pooled.best_start());
}

#[test]
fn best_x_belongs_to_best_start() {
    let cfg = config(6);
    let report = MultiStart::new(cfg.clone(), EvaluateOnly)
        .unwrap()
        .run_problem(layout(), &ghz_problem())
        .unwrap();
    let k = report.best_start().unwrap();
    assert_eq!(report.best_x().unwrap(), &start_point(&cfg.seed, k, layout())[..]);
}

#[test]
fn config_is_validated() {
    assert!(matches!(
        MultiStart::new(config(0), EvaluateOnly),
        Err(SearchError::InvalidConfig(_))
    ));

    let cfg = SearchConfig {
        feasibility_tol: 0.0,
        ..config(3)
    };
    assert!(matches!(
        MultiStart::new(cfg, EvaluateOnly),
        Err(SearchError::InvalidConfig(_))
    ));
}

#[test]
fn unsupported_state_dimension_is_reported() {
    let cfg = SearchConfig {
        nc: 4,
        ..config(3)
    };
    let rho = DensityMatrix::pure(&ghz()).unwrap();
    let err = MultiStart::new(cfg, EvaluateOnly).unwrap().run(&rho).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Tangle(TangleError::UnsupportedDimension(4))
    ));
}

#[test]
fn problem_dimension_must_match_layout() {
    let search = MultiStart::new(config(2), EvaluateOnly).unwrap();
    let small = Layout::three_qubits(2).unwrap();
    assert!(matches!(
        search.run_problem(small, &ghz_problem()),
        Err(SearchError::ProblemDimension { .. })
    ));
}

#[test]
fn config_reads_json_with_legacy_names() {
    let cfg: SearchConfig = serde_json::from_str(
        r#"{ "starts": 3, "error": 1e-12, "solver": { "maxiter": 40 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.starts, 3);
    assert_eq!(cfg.slack, 1e-12);
    assert_eq!(cfg.np, 4);
    assert_eq!(cfg.solver.maxiter, 40);
    assert_eq!(cfg.solver.gtol, 1e-8);

    let missing = SearchConfig::from_json(std::path::Path::new("/nonexistent/search.json"));
    assert!(matches!(missing, Err(SearchError::ConfigRead { .. })));
}
