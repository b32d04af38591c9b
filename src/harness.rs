//! Running equivalence checks and reporting their verdicts.
//!
//! ```rust
//! use carrycheck::{Verdict, config::CheckConfig, harness::check_adders};
//! let config = CheckConfig::new(4).unwrap();
//! let mut session = config.open_session().unwrap();
//! assert_eq!(check_adders(config.width, &mut session).unwrap(), Verdict::Equivalent);
//! ```

use std::{
    fmt,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use log::{debug, info};

use crate::{
    Result,
    adder::{CarryLookahead, Circuit, RippleCarry},
    bitvec::Width,
    config::CheckConfig,
    miter::Miter,
    solver::Session,
};

/// Concrete inputs on which two circuits disagree, with both outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    pub width: usize,
    pub x: u64,
    pub y: u64,
    pub lhs_name: String,
    pub lhs: u64,
    pub rhs_name: String,
    pub rhs: u64,
}

impl Counterexample {
    /// The witness as raw bit patterns, most significant bit first.
    pub fn raw(&self) -> String {
        let w = self.width;
        format!(
            "X={:0w$b} Y={:0w$b} {}={:0w$b} {}={:0w$b}",
            self.x, self.y, self.lhs_name, self.lhs, self.rhs_name, self.rhs
        )
    }
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Counterexample: X={}, Y={}, {}={}, {}={}",
            self.x, self.y, self.lhs_name, self.lhs, self.rhs_name, self.rhs
        )
    }
}

/// Outcome of an equivalence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The circuits agree on every input.
    Equivalent,
    /// The circuits disagree on the given input.
    CounterexampleFound(Counterexample),
    /// The solver could not decide, with the reason it gave up.
    Indeterminate(String),
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent)
    }

    pub fn counterexample(&self) -> Option<&Counterexample> {
        match self {
            Verdict::CounterexampleFound(cex) => Some(cex),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Equivalent => write!(f, "Equivalent"),
            Verdict::CounterexampleFound(cex) => write!(f, "{}", cex),
            Verdict::Indeterminate(_) => write!(f, "Indeterminate"),
        }
    }
}

/// Checks whether `lhs` and `rhs` compute the same function on `width` bits.
pub fn check_equivalence(
    width: Width,
    lhs: &dyn Circuit,
    rhs: &dyn Circuit,
    session: &mut Session,
) -> Result<Verdict> {
    let miter = Miter::new(width, lhs, rhs)?;
    miter.try_prove_eq(session)
}

/// Checks the ripple-carry adder against the carry-lookahead adder on `width` bits.
pub fn check_adders(width: Width, session: &mut Session) -> Result<Verdict> {
    check_equivalence(width, &RippleCarry, &CarryLookahead, session)
}

/// Result of one check of a batch.
#[derive(Debug)]
pub struct BatchResult {
    pub width: Width,
    pub verdict: Result<Verdict>,
}

/// Checks the adders on every width of `widths`, in parallel.
///
/// `config.width` is ignored, its solver and timeout are used for every check.
/// Runs on `workers` threads (the number of CPUs if `None`), each worker opening its own solver
/// session. Results are returned in the order of `widths`.
pub fn check_batch(
    widths: &[Width],
    config: &CheckConfig,
    workers: Option<usize>,
) -> Vec<BatchResult> {
    let thread_cnt = workers
        .unwrap_or_else(num_cpus::get)
        .max(1)
        .min(widths.len());
    debug!("checking {} widths on {} threads", widths.len(), thread_cnt);

    let next_job = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<Result<Verdict>>>> =
        Mutex::new((0..widths.len()).map(|_| None).collect());

    thread::scope(|scope| {
        for _ in 0..thread_cnt {
            scope.spawn(|| {
                let mut session: Option<Session> = None;
                loop {
                    let idx = next_job.fetch_add(1, Ordering::SeqCst);
                    let Some(&width) = widths.get(idx) else {
                        break;
                    };

                    let verdict = match session.as_mut() {
                        Some(s) => check_adders(width, s),
                        None => config.open_session().and_then(|mut s| {
                            let v = check_adders(width, &mut s);
                            session = Some(s);
                            v
                        }),
                    };
                    results.lock().unwrap_or_else(PoisonError::into_inner)[idx] = Some(verdict);
                }
            });
        }
    });

    results
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .zip(widths)
        .filter_map(|(verdict, &width)| {
            let verdict = verdict?;
            if let Ok(v) = &verdict {
                info!("W={}: {}", width, v);
            }
            Some(BatchResult { width, verdict })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::{path::PathBuf, time::Duration};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{
        Aig, Error,
        adder::lookahead::{GenProp, carries, generate_propagate, sums_from_carries},
        bitvec::BitVec,
        solver::{SolverChoice, SolverError},
    };

    /// Lookahead adder with a wrong carry rule: `C_i = G_i AND (P_i OR C_{i-1})`.
    struct BrokenLookahead;

    fn broken_carry(aig: &mut Aig, gp: &GenProp, carry_in: &BitVec) -> Result<BitVec> {
        let p_or_c = gp.propagate.or(aig, carry_in)?;
        gp.generate.and(aig, &p_or_c)
    }

    impl Circuit for BrokenLookahead {
        fn name(&self) -> &str {
            "broken"
        }

        fn build(&self, aig: &mut Aig, x: &BitVec, y: &BitVec) -> Result<BitVec> {
            let gps = generate_propagate(aig, x, y)?;
            let cs = carries(aig, &gps, broken_carry)?;
            sums_from_carries(aig, &gps, &cs)
        }
    }

    fn w(width: usize) -> Width {
        Width::new(width).unwrap()
    }

    fn session() -> Session {
        CheckConfig::default().open_session().unwrap()
    }

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(4)]
    #[test_case(8)]
    fn adders_are_equivalent_test(width: usize) {
        let mut session = session();
        assert_eq!(check_adders(w(width), &mut session).unwrap(), Verdict::Equivalent);
    }

    #[test]
    fn wraparound_test() {
        let miter = Miter::new(w(4), &RippleCarry, &CarryLookahead).unwrap();
        assert_eq!(miter.evaluate(15, 1).unwrap(), (0, 0));
        assert_eq!(miter.evaluate(0, 0).unwrap(), (0, 0));
        assert_eq!(miter.evaluate(9, 9).unwrap(), (2, 2));
    }

    #[test]
    fn broken_lookahead_test() {
        let mut session = session();
        let verdict =
            check_equivalence(w(4), &RippleCarry, &BrokenLookahead, &mut session).unwrap();
        let cex = verdict.counterexample().unwrap().clone();
        assert_eq!(cex.width, 4);
        assert_eq!(cex.lhs, (cex.x + cex.y) & 0xF);
        assert_ne!(cex.lhs, cex.rhs);

        // The witness reproduces on fresh circuits
        let miter = Miter::new(w(4), &RippleCarry, &BrokenLookahead).unwrap();
        assert_eq!(miter.evaluate(cex.x, cex.y).unwrap(), (cex.lhs, cex.rhs));
    }

    #[test]
    fn zero_timeout_test() {
        let mut session = CheckConfig::default()
            .with_timeout(Duration::ZERO)
            .open_session()
            .unwrap();
        let verdict = check_adders(w(4), &mut session).unwrap();
        assert!(matches!(verdict, Verdict::Indeterminate(_)));
        assert_eq!(verdict.to_string(), "Indeterminate");
    }

    #[test]
    fn unbounded_timeout_test() {
        let mut session = CheckConfig::default()
            .with_timeout(Duration::MAX)
            .open_session()
            .unwrap();
        assert_eq!(check_adders(w(4), &mut session).unwrap(), Verdict::Equivalent);
    }

    #[test]
    fn verdict_display_test() {
        let cex = Counterexample {
            width: 4,
            x: 3,
            y: 1,
            lhs_name: "ripple".to_string(),
            lhs: 4,
            rhs_name: "lookahead".to_string(),
            rhs: 2,
        };
        assert_eq!(
            cex.to_string(),
            "Counterexample: X=3, Y=1, ripple=4, lookahead=2"
        );
        assert_eq!(cex.raw(), "X=0011 Y=0001 ripple=0100 lookahead=0010");
        assert_eq!(Verdict::Equivalent.to_string(), "Equivalent");
        assert_eq!(
            Verdict::CounterexampleFound(cex).to_string(),
            "Counterexample: X=3, Y=1, ripple=4, lookahead=2"
        );
    }

    #[test]
    fn batch_test() {
        let widths = [w(1), w(2), w(3), w(8), w(4)];
        let results = check_batch(&widths, &CheckConfig::default(), Some(3));
        assert_eq!(results.len(), widths.len());
        for (result, width) in results.iter().zip(&widths) {
            assert_eq!(result.width, *width);
            assert_eq!(result.verdict.as_ref().unwrap(), &Verdict::Equivalent);
        }
    }

    #[test]
    fn batch_unavailable_solver_test() {
        let config = CheckConfig::default()
            .with_solver(SolverChoice::Dimacs(PathBuf::from("/nonexistent/kissat")));
        let results = check_batch(&[w(2), w(3)], &config, None);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(
            r.verdict,
            Err(Error::Solver(SolverError::Unavailable(_)))
        )));
    }

    #[test]
    fn empty_batch_test() {
        assert!(check_batch(&[], &CheckConfig::default(), None).is_empty());
    }
}
