use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Instant,
};

use log::warn;
use varisat::{CnfFormula, ExtendFormula};

use super::{Model, SatBackend, SatResult, SolverError, expired};
use crate::cnf::Cnf;

/// In-process backend running [varisat](https://docs.rs/varisat).
///
/// Varisat cannot be interrupted, so when a deadline is given the solver runs on its own thread
/// and is abandoned (left to finish in the background) if the deadline passes first.
#[derive(Debug, Default)]
pub struct VarisatBackend;

impl VarisatBackend {
    pub fn new() -> Self {
        VarisatBackend
    }
}

fn to_formula(cnf: &Cnf) -> CnfFormula {
    let mut formula = CnfFormula::new();
    for clause in cnf.clauses() {
        let lits: Vec<varisat::Lit> = clause
            .lits()
            .iter()
            .map(|l| varisat::Lit::from_dimacs(l.to_dimacs() as isize))
            .collect();
        formula.add_clause(&lits);
    }
    formula
}

/// `Ok(Some(model))` if SAT, `Ok(None)` if UNSAT.
fn run(formula: CnfFormula) -> Result<Option<Vec<i64>>, String> {
    let mut solver = varisat::Solver::new();
    solver.add_formula(&formula);
    match solver.solve() {
        Ok(true) => {
            let model = solver
                .model()
                .ok_or_else(|| "no model available for a satisfiable formula".to_string())?;
            Ok(Some(model.iter().map(|l| l.to_dimacs() as i64).collect()))
        }
        Ok(false) => Ok(None),
        Err(e) => Err(format!("{:?}", e)),
    }
}

fn to_sat_result(outcome: Result<Option<Vec<i64>>, String>) -> Result<SatResult, SolverError> {
    match outcome {
        Ok(Some(model)) => Ok(SatResult::Sat(Model::from_dimacs(model))),
        Ok(None) => Ok(SatResult::Unsat),
        Err(e) => Err(SolverError::Failed(e)),
    }
}

impl SatBackend for VarisatBackend {
    fn name(&self) -> &str {
        "varisat"
    }

    fn solve(&mut self, cnf: &Cnf, deadline: Option<Instant>) -> Result<SatResult, SolverError> {
        if expired(deadline) {
            return Ok(SatResult::Unknown(
                "time budget exhausted before solving".to_string(),
            ));
        }

        let formula = to_formula(cnf);
        let Some(deadline) = deadline else {
            return to_sat_result(run(formula));
        };

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("varisat".to_string())
            .spawn(move || {
                // The receiver is gone if we timed out, nothing left to report to
                let _ = tx.send(run(formula));
            })?;

        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(outcome) => to_sat_result(outcome),
            Err(RecvTimeoutError::Timeout) => {
                warn!("varisat did not answer before the deadline, abandoning it");
                Ok(SatResult::Unknown("timeout".to_string()))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::Failed(
                "varisat thread stopped without answering".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::cnf::{Clause, Lit};

    fn lit(l: i64) -> Lit {
        Lit::from(l)
    }

    /// (1 | 2) & (!1 | 2) & (1 | !2)
    fn sat_cnf() -> Cnf {
        let mut cnf = Cnf::new();
        cnf.add_clause(Clause::from(vec![lit(1), lit(2)]));
        cnf.add_clause(Clause::from(vec![lit(-1), lit(2)]));
        cnf.add_clause(Clause::from(vec![lit(1), lit(-2)]));
        cnf
    }

    fn unsat_cnf() -> Cnf {
        let mut cnf = sat_cnf();
        cnf.add_clause(Clause::from(vec![lit(-1), lit(-2)]));
        cnf
    }

    #[test]
    fn sat_test() {
        let mut backend = VarisatBackend::new();
        match backend.solve(&sat_cnf(), None).unwrap() {
            SatResult::Sat(model) => {
                assert!(model.value(lit(1)));
                assert!(model.value(lit(2)));
            }
            other => panic!("expected SAT, got {:?}", other),
        }
    }

    #[test]
    fn unsat_test() {
        let mut backend = VarisatBackend::new();
        assert_eq!(
            backend.solve(&unsat_cnf(), None).unwrap(),
            SatResult::Unsat
        );
    }

    #[test]
    fn with_deadline_test() {
        let mut backend = VarisatBackend::new();
        let deadline = Instant::now() + Duration::from_secs(60);
        assert_eq!(
            backend.solve(&unsat_cnf(), Some(deadline)).unwrap(),
            SatResult::Unsat
        );
    }

    #[test]
    fn expired_deadline_test() {
        let mut backend = VarisatBackend::new();
        assert!(matches!(
            backend.solve(&sat_cnf(), Some(Instant::now())).unwrap(),
            SatResult::Unknown(_)
        ));
    }

    #[test]
    fn empty_cnf_is_sat_test() {
        let mut backend = VarisatBackend::new();
        assert!(matches!(
            backend.solve(&Cnf::new(), None).unwrap(),
            SatResult::Sat(_)
        ));
    }
}
