//! Solving CNF formulas with an external decision procedure.
//!
//! The SAT algorithm itself is not implemented here. A [`SatBackend`] hands a [`Cnf`] to a solver
//! and reports one of the three possible outcomes, see [`SatResult`]:
//! - [`VarisatBackend`] runs the [varisat](https://docs.rs/varisat) solver in process
//! - [`DimacsBackend`] runs any SAT solver executable reading DIMACS files.
//!
//! Backends are used through a [`Session`], which owns the backend for the duration of a check
//! and applies the caller's time budget to every query.

mod dimacs;
mod varisat_backend;

use std::{
    collections::HashMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use log::debug;
use thiserror::Error;

pub use dimacs::DimacsBackend;
pub use varisat_backend::VarisatBackend;

use crate::cnf::{Cnf, Lit};

/// Error returned when the solver could not produce any outcome.
///
/// Running out of time is not an error, see [`SatResult::Unknown`].
#[derive(Debug, Error)]
pub enum SolverError {
    /// The decision procedure cannot be invoked at all (eg missing executable).
    #[error("solver unavailable: {0}")]
    Unavailable(String),

    /// The solver was invoked but failed.
    #[error("solver failed: {0}")]
    Failed(String),

    /// An IO error occured while talking to the solver.
    #[error("io error while running the solver: {0}")]
    Io(#[from] std::io::Error),
}

/// A satisfying assignment returned by a solver.
///
/// Variables absent from the model are considered false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model(HashMap<i64, bool>);

impl Model {
    /// Builds a model from the literals set to true, in DIMACS convention.
    pub fn from_dimacs(lits: impl IntoIterator<Item = i64>) -> Self {
        Model(
            lits.into_iter()
                .filter(|l| *l != 0)
                .map(|l| (l.abs(), l > 0))
                .collect(),
        )
    }

    /// Value of a literal under this model.
    pub fn value(&self, lit: Lit) -> bool {
        let var_value = self.0.get(&lit.var()).copied().unwrap_or(false);
        var_value == lit.is_positive()
    }
}

/// Outcome of a SAT query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// The formula is satisfiable, with a witness assignment.
    Sat(Model),
    /// The formula is unsatisfiable.
    Unsat,
    /// The solver gave up (timeout, incompleteness, unexpected output).
    Unknown(String),
}

/// A SAT decision procedure.
pub trait SatBackend: Send {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Decides the satisfiability of `cnf`, giving up at `deadline` if any.
    ///
    /// An already elapsed deadline must yield [`SatResult::Unknown`].
    fn solve(&mut self, cnf: &Cnf, deadline: Option<Instant>) -> Result<SatResult, SolverError>;
}

/// Which solver to open sessions with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolverChoice {
    /// The in-process varisat solver.
    #[default]
    Varisat,
    /// An external solver executable reading DIMACS, found on the `PATH` if not a path.
    Dimacs(PathBuf),
}

impl SolverChoice {
    /// Opens a new session, failing with [`SolverError::Unavailable`] if the solver cannot be run.
    pub fn open(&self, timeout: Option<Duration>) -> Result<Session, SolverError> {
        let backend: Box<dyn SatBackend> = match self {
            SolverChoice::Varisat => Box::new(VarisatBackend::new()),
            SolverChoice::Dimacs(path) => Box::new(DimacsBackend::locate(path)?),
        };
        Ok(Session::new(backend, timeout))
    }
}

/// A solver session, owning its backend.
///
/// Sessions are not shared: a check borrows its session mutably, and parallel checks each open
/// their own. The backend is released when the session is dropped.
pub struct Session {
    backend: Box<dyn SatBackend>,
    timeout: Option<Duration>,
    queries: usize,
}

impl Session {
    pub fn new(backend: Box<dyn SatBackend>, timeout: Option<Duration>) -> Self {
        debug!(
            "opening {} solver session (timeout: {:?})",
            backend.name(),
            timeout
        );
        Session {
            backend,
            timeout,
            queries: 0,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Number of queries solved so far.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Solves `cnf` within the session time budget, starting now.
    ///
    /// A budget too large to be represented as an instant means no deadline.
    pub fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, SolverError> {
        let deadline = self.timeout.and_then(|t| Instant::now().checked_add(t));
        self.queries += 1;
        debug!(
            "{} query #{}: {} vars, {} clauses",
            self.backend.name(),
            self.queries,
            cnf.num_vars(),
            cnf.clauses().len()
        );
        self.backend.solve(cnf, deadline)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            "releasing {} solver session after {} queries",
            self.backend.name(),
            self.queries
        );
    }
}

/// True if the deadline is already over.
pub(crate) fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cnf::Clause;

    /// Backend always answering the same thing.
    struct FixedBackend(SatResult);

    impl SatBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&mut self, _: &Cnf, _: Option<Instant>) -> Result<SatResult, SolverError> {
            Ok(self.0.clone())
        }
    }

    /// Backend answering whether it was given a deadline: SAT if it was, UNSAT otherwise.
    struct DeadlineBackend;

    impl SatBackend for DeadlineBackend {
        fn name(&self) -> &str {
            "deadline"
        }

        fn solve(&mut self, _: &Cnf, deadline: Option<Instant>) -> Result<SatResult, SolverError> {
            Ok(match deadline {
                Some(_) => SatResult::Sat(Model::default()),
                None => SatResult::Unsat,
            })
        }
    }

    #[test]
    fn huge_timeout_means_no_deadline_test() {
        let mut session = Session::new(Box::new(DeadlineBackend), Some(Duration::MAX));
        assert_eq!(session.solve(&Cnf::new()).unwrap(), SatResult::Unsat);

        let mut session = Session::new(Box::new(DeadlineBackend), Some(Duration::from_secs(60)));
        assert!(matches!(session.solve(&Cnf::new()).unwrap(), SatResult::Sat(_)));

        let mut session = SolverChoice::Varisat.open(Some(Duration::MAX)).unwrap();
        let mut cnf = Cnf::new();
        cnf.add_clause(Clause::from(vec![Lit::from(1)]));
        cnf.add_clause(Clause::from(vec![Lit::from(-1)]));
        assert_eq!(session.solve(&cnf).unwrap(), SatResult::Unsat);
    }

    #[test]
    fn model_test() {
        let model = Model::from_dimacs([1, -2, 0]);
        assert!(model.value(Lit::from(1)));
        assert!(!model.value(Lit::from(-1)));
        assert!(!model.value(Lit::from(2)));
        assert!(model.value(Lit::from(-2)));
        // Unknown variables are false
        assert!(!model.value(Lit::from(3)));
        assert!(model.value(Lit::from(-3)));
    }

    #[test]
    fn session_counts_queries_test() {
        let mut session = Session::new(Box::new(FixedBackend(SatResult::Unsat)), None);
        assert_eq!(session.backend_name(), "fixed");
        assert_eq!(session.solve(&Cnf::new()).unwrap(), SatResult::Unsat);
        assert_eq!(session.solve(&Cnf::new()).unwrap(), SatResult::Unsat);
        assert_eq!(session.queries(), 2);
    }

    #[test]
    fn open_varisat_test() {
        let mut session = SolverChoice::Varisat.open(None).unwrap();
        let mut cnf = Cnf::new();
        cnf.add_clause(Clause::from(vec![Lit::from(1)]));
        assert!(matches!(session.solve(&cnf).unwrap(), SatResult::Sat(_)));
    }

    #[test]
    fn open_missing_dimacs_solver_test() {
        let choice = SolverChoice::Dimacs(PathBuf::from("/nonexistent/carrycheck-sat-solver"));
        assert!(matches!(
            choice.open(None),
            Err(SolverError::Unavailable(_))
        ));
    }

    #[test]
    fn expired_test() {
        assert!(!expired(None));
        assert!(expired(Some(Instant::now())));
        assert!(!expired(Some(Instant::now() + Duration::from_secs(3600))));
    }
}
