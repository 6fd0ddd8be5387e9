use clap::{Parser, ValueEnum};
use linalg::{DensityMatrix, MatrixFile};
use search::{estimate, SearchConfig, StartOutcome};
use std::path::{Path, PathBuf};
use tangle::{pure::three_tangle, states, Layout};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

/// Three-tangle of a three-qubit density matrix (multi-start convex roof)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON matrix file: { "re": [[..]], "im": [[..]] } ("im" optional)
    #[arg(long, value_name = "FILE")]
    matrix: Option<PathBuf>,

    /// Built-in state, used when no --matrix is given
    #[arg(long, value_enum, default_value_t = State::Ghz)]
    state: State,

    /// GHZ weight p of --state ghz-w
    #[arg(long, default_value_t = 0.5)]
    mix: f64,

    /// Search configuration (JSON); the flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of random starts
    #[arg(long)]
    starts: Option<usize>,

    /// Constraint slack eps
    #[arg(long)]
    error: Option<f64>,

    /// Decomposition terms
    #[arg(long)]
    np: Option<usize>,

    /// Solver major iterations per start
    #[arg(long)]
    maxiter: Option<usize>,

    /// RNG seed (full reproducibility)
    #[arg(long)]
    seed: Option<String>,

    /// Worker threads (1 = sequential, 0 = Rayon default)
    #[arg(long)]
    threads: Option<usize>,

    /// Solver verbosity 0..=3
    #[arg(long)]
    verbose: Option<u8>,

    /// Print the best decomposition found
    #[arg(long)]
    show_decomposition: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum State {
    Ghz,
    W,
    Product,
    GhzW,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let rho = match load_matrix(&args) {
        Ok(rho) => rho,
        Err(e) => {
            error!("Invalid density matrix: {e}");
            std::process::exit(1);
        }
    };

    info!(
        starts = config.starts,
        np = config.np,
        seed = %config.seed,
        rank = rho.rank(1e-9),
        "starting search"
    );

    let report = match estimate(&rho, &config) {
        Ok(r) => r,
        Err(e) => {
            error!("Search failed: {e}");
            std::process::exit(1);
        }
    };

    match report.best() {
        Some(tau) => println!("three-tangle = {:.6}", tau),
        None => println!("three-tangle = undefined (no start converged)"),
    }
    println!(
        "starts = {}, converged = {}, discarded = {}, failed = {}",
        report.starts(),
        report.converged(),
        report.discarded(),
        report.failed()
    );

    if args.show_decomposition {
        if let (Some(x), Ok(layout)) = (report.best_x(), Layout::new(config.nc, config.np)) {
            print_decomposition(layout, x);
        }
        for (k, outcome) in report.outcomes().iter().enumerate() {
            match outcome {
                StartOutcome::Converged { value, status, .. } => {
                    println!("start {k}: {value:.6} ({status:?})")
                }
                StartOutcome::Negative { value } => println!("start {k}: negative {value:.3e}"),
                StartOutcome::Infeasible { value, violation } => {
                    println!("start {k}: infeasible {value:.6} (violation {violation:.3e})")
                }
                StartOutcome::Failed { error } => println!("start {k}: failed ({error})"),
            }
        }
    }
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!("unknown log level '{s}' (trace, debug, info, warn, error)")),
    }
}

fn load_config(args: &Args) -> Result<SearchConfig, search::SearchError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SearchConfig::from_json(path)?
        }
        None => SearchConfig::default(),
    };

    if let Some(n) = args.starts {
        cfg.starts = n;
    }
    if let Some(eps) = args.error {
        cfg.slack = eps;
    }
    if let Some(np) = args.np {
        cfg.np = np;
    }
    if let Some(m) = args.maxiter {
        cfg.solver.maxiter = m;
    }
    if let Some(seed) = &args.seed {
        cfg.seed = seed.clone();
    }
    if let Some(t) = args.threads {
        cfg.threads = t;
    }
    if let Some(v) = args.verbose {
        cfg.solver.verbose = v;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_matrix(args: &Args) -> Result<DensityMatrix, String> {
    let rho = match args.matrix.as_deref() {
        Some(path) => read_matrix(path)?,
        None => preset(args.state, args.mix).map_err(|e| e.to_string())?,
    };
    rho.check_positive_semidefinite(1e-9)
        .map_err(|e| e.to_string())?;
    Ok(rho)
}

fn read_matrix(path: &Path) -> Result<DensityMatrix, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let file: MatrixFile = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
    file.into_density().map_err(|e| e.to_string())
}

fn preset(state: State, mix: f64) -> Result<DensityMatrix, tangle::TangleError> {
    let rho = match state {
        State::Ghz => DensityMatrix::pure(&states::ghz())?,
        State::W => DensityMatrix::pure(&states::w())?,
        State::Product => DensityMatrix::pure(&states::basis(0))?,
        State::GhzW => states::ghz_w_mixture(mix)?,
    };
    Ok(rho)
}

fn print_decomposition(layout: Layout, x: &[f64]) {
    let Ok((weights, kets)) = layout.unpack(x) else {
        return;
    };
    for (i, (p, c)) in weights.iter().zip(&kets).enumerate() {
        let mut phi = [linalg::C64::new(0.0, 0.0); 8];
        phi.copy_from_slice(c);
        println!("term {i}: p = {p:.6}, tau = {:.6}", three_tangle(&phi));
        for (k, z) in c.iter().enumerate() {
            println!("  |{k:03b}>  {:+.6} {:+.6}i", z.re, z.im);
        }
    }
}
