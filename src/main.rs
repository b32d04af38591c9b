//! Command line tool checking that the ripple-carry and carry-lookahead adders are equivalent.
//!
//! Prints one verdict per checked width.
//!
//! Exit status:
//!   0 - a verdict was reached (Equivalent, Counterexample or Indeterminate).
//!   1 - invalid width, unavailable solver, I/O failure or any other internal error.

use std::{fs, path::PathBuf, process::exit, time::Duration};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;

use carrycheck::{
    Verdict,
    adder::{CarryLookahead, RippleCarry},
    bitvec::Width,
    check_batch,
    config::{CheckConfig, DEFAULT_WIDTH},
    dot::GraphvizStyle,
    miter::Miter,
    solver::SolverChoice,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverKind {
    /// In-process varisat solver
    Varisat,
    /// External solver executable reading DIMACS files
    Dimacs,
}

/// Proves (or disproves) that a ripple-carry adder and a carry-lookahead adder compute the same sum.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Bit-width of the adders
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Check several widths in parallel, eg `1,2,4,8` (overrides --width)
    #[arg(long, value_delimiter = ',')]
    widths: Vec<usize>,

    /// Number of worker threads for --widths (default: number of CPUs)
    #[arg(long)]
    jobs: Option<usize>,

    /// Solver time budget per check, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// SAT solver to use
    #[arg(long, value_enum, default_value_t = SolverKind::Varisat)]
    solver: SolverKind,

    /// Solver executable for `--solver dimacs`, searched in PATH if not a path
    #[arg(long, default_value = "kissat")]
    solver_path: PathBuf,

    /// Write the miter as a Graphviz dot file
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write the equivalence query as a DIMACS CNF file
    #[arg(long)]
    dimacs: Option<PathBuf>,
}

impl Cli {
    /// `--width` is only validated for a single check, batches use `--widths`.
    fn config(&self) -> anyhow::Result<CheckConfig> {
        let mut config = if self.widths.is_empty() {
            CheckConfig::new(self.width)?
        } else {
            CheckConfig::default()
        };
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if self.solver == SolverKind::Dimacs {
            config = config.with_solver(SolverChoice::Dimacs(self.solver_path.clone()));
        }
        Ok(config)
    }
}

fn print_verdict(prefix: &str, verdict: &Verdict) {
    println!("{}{}", prefix, verdict);
    if let Verdict::CounterexampleFound(cex) = verdict {
        println!("{}{}", prefix, cex.raw());
    }
}

fn run_single(cli: &Cli, config: &CheckConfig) -> anyhow::Result<()> {
    let miter = Miter::new(config.width, &RippleCarry, &CarryLookahead)
        .with_context(|| format!("failed to build the {}-bit adders", config.width))?;

    if let Some(path) = &cli.dot {
        fs::write(path, miter.to_dot(&GraphvizStyle::default()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("miter written to {}", path.display());
    }
    if let Some(path) = &cli.dimacs {
        fs::write(path, miter.to_cnf()?.to_dimacs())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("CNF written to {}", path.display());
    }

    let mut session = config
        .open_session()
        .context("failed to open a solver session")?;
    let verdict = miter.try_prove_eq(&mut session)?;
    print_verdict("", &verdict);
    Ok(())
}

fn run_batch(cli: &Cli, config: &CheckConfig) -> anyhow::Result<()> {
    if cli.dot.is_some() || cli.dimacs.is_some() {
        anyhow::bail!("--dot and --dimacs are only supported for a single width");
    }
    let widths = cli
        .widths
        .iter()
        .map(|w| Width::new(*w))
        .collect::<Result<Vec<_>, _>>()?;

    for result in check_batch(&widths, config, cli.jobs) {
        let verdict = result
            .verdict
            .with_context(|| format!("check failed for width {}", result.width))?;
        print_verdict(&format!("W={}: ", result.width), &verdict);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    if cli.widths.is_empty() {
        run_single(&cli, &config)
    } else {
        run_batch(&cli, &config)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("[carrycheck] error: {:#}", e);
        exit(1);
    }
}
