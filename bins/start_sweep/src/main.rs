use clap::{Parser, ValueEnum};
use linalg::{DensityMatrix, MatrixFile};
use search::{estimate, SearchConfig, SearchReport};
use tangle::states;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Best-found three-tangle vs number of random starts")]
struct Args {
    /// JSON matrix file: { "re": [[..]], "im": [[..]] }
    #[arg(long, value_name = "FILE")]
    matrix: Option<PathBuf>,

    /// Built-in state, used when no --matrix is given
    #[arg(long, value_enum, default_value_t = State::GhzW)]
    state: State,

    /// GHZ weight p of --state ghz-w
    #[arg(long, default_value_t = 0.7)]
    mix: f64,

    /// Search configuration (JSON); the flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Largest start count in the sweep
    #[arg(long, default_value_t = 20)]
    max_starts: usize,

    /// Constraint slack eps
    #[arg(long)]
    error: Option<f64>,

    /// Decomposition terms
    #[arg(long)]
    np: Option<usize>,

    /// Solver major iterations per start
    #[arg(long)]
    maxiter: Option<usize>,

    /// RNG seed
    #[arg(long, default_value = "start-sweep")]
    seed: String,

    /// Worker threads (1 = sequential, 0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Output CSV path
    #[arg(long, default_value = "start_sweep.csv")]
    out: String,

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

    // Start k depends only on (seed, k), so the first n outcomes of one run
    // are exactly the outcomes of a run with n starts.
    let report = match estimate(&rho, &config) {
        Ok(r) => r,
        Err(e) => {
            error!("Search failed: {e}");
            std::process::exit(1);
        }
    };

    let rows = prefix_rows(&report);
    for &(n, best, converged, discarded, failed) in &rows {
        println!(
            "starts={} best={:.6} converged={} discarded={} failed={}",
            n, best, converged, discarded, failed
        );
    }

    if let Err(e) = write_csv(&args.out, &rows) {
        error!("Failed to write CSV to {}: {e}", args.out);
        std::process::exit(1);
    }
    info!("wrote {} rows to {}", rows.len(), args.out);
}

fn prefix_rows(report: &SearchReport) -> Vec<(usize, f64, usize, usize, usize)> {
    let mut rows = Vec::with_capacity(report.starts());
    let mut best = f64::INFINITY;
    let (mut converged, mut discarded, mut failed) = (0, 0, 0);
    for (k, outcome) in report.outcomes().iter().enumerate() {
        if let Some(v) = outcome.value() {
            best = best.min(v);
        }
        converged += outcome.is_converged() as usize;
        discarded += outcome.is_discarded() as usize;
        failed += outcome.is_failed() as usize;
        rows.push((k + 1, best, converged, discarded, failed));
    }
    rows
}

fn write_csv(path: &str, rows: &[(usize, f64, usize, usize, usize)]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "starts,best,converged,discarded,failed")?;
    for (n, best, converged, discarded, failed) in rows {
        writeln!(w, "{},{},{},{},{}", n, best, converged, discarded, failed)?;
    }
    w.flush()
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

/// Config file (or defaults) with the command-line overrides applied; the
/// sweep always runs `max_starts` starts.
fn load_config(args: &Args) -> Result<SearchConfig, search::SearchError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => SearchConfig::from_json(path)?,
        None => SearchConfig::default(),
    };
    cfg.starts = args.max_starts;
    cfg.seed = args.seed.clone();
    cfg.threads = args.threads;
    if let Some(eps) = args.error {
        cfg.slack = eps;
    }
    if let Some(np) = args.np {
        cfg.np = np;
    }
    if let Some(m) = args.maxiter {
        cfg.solver.maxiter = m;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_matrix(args: &Args) -> Result<DensityMatrix, String> {
    let rho = match args.matrix.as_deref() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let file: MatrixFile = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
            file.into_density().map_err(|e| e.to_string())?
        }
        None => match args.state {
            State::Ghz => DensityMatrix::pure(&states::ghz()).map_err(|e| e.to_string())?,
            State::W => DensityMatrix::pure(&states::w()).map_err(|e| e.to_string())?,
            State::Product => DensityMatrix::pure(&states::basis(0)).map_err(|e| e.to_string())?,
            State::GhzW => states::ghz_w_mixture(args.mix).map_err(|e| e.to_string())?,
        },
    };
    rho.check_positive_semidefinite(1e-9)
        .map_err(|e| e.to_string())?;
    Ok(rho)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_same_matrix_and_search_flags_as_the_estimator() {
        let args = Args::try_parse_from([
            "start_sweep",
            "--state",
            "product",
            "--error",
            "1e-20",
            "--np",
            "3",
            "--max-starts",
            "5",
        ])
        .unwrap();
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.starts, 5);
        assert_eq!(cfg.slack, 1e-20);
        assert_eq!(cfg.np, 3);
        assert_eq!(load_matrix(&args).unwrap().rank(1e-9), 1);
    }

    #[test]
    fn zero_starts_and_unknown_log_level_are_rejected() {
        let args = Args::try_parse_from(["start_sweep", "--max-starts", "0"]).unwrap();
        assert!(load_config(&args).is_err());
        assert!(Args::try_parse_from(["start_sweep", "--log-level", "chatty"]).is_err());
    }
}
