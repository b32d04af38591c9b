use std::{
    collections::{HashMap, HashSet},
    num::TryFromIntError,
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    Aig, AigEdge, NodeId, Result,
    adder::Circuit,
    bitvec::{BitVec, Width},
    cnf::{Cnf, Lit},
    dfs::Dfs,
    harness::{Counterexample, Verdict},
    solver::{Model, SatResult, Session},
};

/// Error returned when an operation related to the miter fails
/// (encoding, witness decoding, ...).
#[derive(Debug, Error)]
pub enum MiterError {
    /// A node was not mapped to any SAT literal in the miter.
    #[error("node id {0} is not mapped to any literal")]
    UnmappedNodeToLit(NodeId),

    /// Conversion from a NodeId to a SAT literal failed.
    /// Inputs are assigned their own id as SAT literals.
    /// However, an input id is represented as a `u64`, and a SAT literal is a `i64`
    /// so the conversion might fail.
    #[error("conversion from NodeId to Lit failed because of {0}")]
    NodeIdToLit(TryFromIntError),

    /// The solver returned a model under which both circuits agree.
    /// The encoding and the simulation disagree, this should never happen.
    #[error("spurious counterexample X={x}, Y={y}: both circuits output {out}")]
    SpuriousCounterexample { x: u64, y: u64, out: u64 },
}

impl From<TryFromIntError> for MiterError {
    fn from(value: TryFromIntError) -> Self {
        MiterError::NodeIdToLit(value)
    }
}

/// The struct used to perform combinational equivalence checking between two circuits.
///
/// For background on what is a miter, please check
/// [Verification of large synthesized designs](https://doi.org/10.1109/ICCAD.1993.580110) by D. Brand.
///
/// Both circuits are built in the same AIG over the same symbolic inputs `X` and `Y`,
/// and their outputs are compared into a single signal, true iff the outputs differ.
/// The circuits are equivalent iff this signal can never be true.
///
/// To use this struct:
/// - create a new miter with [`new`]
/// - then prove the two circuits are equivalent using [`try_prove_eq`].
///
/// [`new`]: Miter::new
/// [`try_prove_eq`]: Miter::try_prove_eq
pub struct Miter {
    aig: Aig,
    x: BitVec,
    y: BitVec,
    lhs_name: String,
    lhs: BitVec,
    rhs_name: String,
    rhs: BitVec,
    /// True iff `lhs != rhs`.
    differ: AigEdge,
    /// Associating a SAT literal to each node in the fanin of `differ`, and to every input.
    litmap: HashMap<NodeId, Lit>,
    /// The index of the next literal (for internal use only).
    next_lit: i64,
}

impl Miter {
    /// Create the miter of `lhs` and `rhs` on `width` bits.
    ///
    /// `X` is made of inputs `1..=width` and `Y` of inputs `width + 1..=2 * width`.
    pub fn new(width: Width, lhs: &dyn Circuit, rhs: &dyn Circuit) -> Result<Self> {
        let mut aig = Aig::new();
        let x = BitVec::input(&mut aig, "X", width);
        let y = BitVec::input(&mut aig, "Y", width);

        let lhs_out = lhs.build(&mut aig, &x, &y)?;
        let rhs_out = rhs.build(&mut aig, &x, &y)?;
        let differ = lhs_out.differs(&mut aig, &rhs_out)?;
        debug!(
            "miter {} vs {} on {} bits: {} and gates",
            lhs.name(),
            rhs.name(),
            width,
            aig.and_count()
        );

        let mut miter = Miter {
            aig,
            x,
            y,
            lhs_name: lhs.name().to_string(),
            lhs: lhs_out,
            rhs_name: rhs.name().to_string(),
            rhs: rhs_out,
            differ,
            litmap: HashMap::new(),
            next_lit: 1,
        };
        miter.initialize_litmap()?;

        Ok(miter)
    }

    fn initialize_litmap(&mut self) -> Result<()> {
        let inputs: HashSet<NodeId> = self.aig.get_inputs_id().iter().copied().collect();

        // Inputs use their own id as literal
        for &id in &inputs {
            self.litmap
                .insert(id, Lit::try_from(id).map_err(MiterError::from)?);
        }

        // Finding the first usable literal (ie not used by any input)
        while inputs.contains(&(self.next_lit as u64)) {
            self.next_lit += 1;
        }

        // Assigning literals to and gates in the fanin of the output
        let mut and_ids = Vec::new();
        let mut dfs = Dfs::from_edges(&[self.differ]);
        while let Some(n) = dfs.next(&self.aig) {
            if n.is_and() {
                and_ids.push(n.get_id());
            }
        }
        for id in and_ids {
            let lit = self.fresh_lit(&inputs);
            self.litmap.insert(id, lit);
        }

        Ok(())
    }

    /// Returns a yet unused SAT literal.
    fn fresh_lit(&mut self, inputs: &HashSet<NodeId>) -> Lit {
        let lit = self.next_lit.into();
        self.next_lit += 1;
        // Making sure we're not using a SAT literal used by any input
        while inputs.contains(&(self.next_lit as u64)) {
            self.next_lit += 1;
        }
        lit
    }

    pub fn aig(&self) -> &Aig {
        &self.aig
    }

    pub fn width(&self) -> usize {
        self.x.width()
    }

    /// The symbolic inputs `(X, Y)`.
    pub fn inputs(&self) -> (&BitVec, &BitVec) {
        (&self.x, &self.y)
    }

    /// Names and outputs of both circuits.
    pub fn outputs(&self) -> [(&str, &BitVec); 2] {
        [
            (self.lhs_name.as_str(), &self.lhs),
            (self.rhs_name.as_str(), &self.rhs),
        ]
    }

    /// The signal which is true iff the two circuits disagree.
    pub fn differ(&self) -> AigEdge {
        self.differ
    }

    /// Returns the literal associated with a node, if any.
    pub fn get_lit(&self, id: NodeId) -> Option<Lit> {
        self.litmap.get(&id).copied()
    }

    /// Generates the CNF asserting that the outputs differ, by generating one monolithic SAT query.
    ///
    /// Every input is declared as a variable, even those which do not appear in any clause.
    pub fn to_cnf(&self) -> Result<Cnf> {
        self.aig.check_integrity()?;

        let mut cnf = Cnf::with_vars(self.next_lit - 1);
        let mut dfs = Dfs::from_edges(&[self.differ]);
        while let Some(n) = dfs.next(&self.aig) {
            cnf.add_clauses_node(n, &self.litmap)?;
        }
        cnf.add_edge_is_true(&self.differ, &self.litmap)?;

        debug!(
            "miter CNF: {} vars, {} clauses",
            cnf.num_vars(),
            cnf.clauses().len()
        );
        Ok(cnf)
    }

    /// Simulates both circuits on concrete inputs, returns `(lhs, rhs)`.
    pub fn evaluate(&self, x: u64, y: u64) -> Result<(u64, u64)> {
        let mut assignment = HashMap::new();
        self.x.assign(x, &mut assignment);
        self.y.assign(y, &mut assignment);
        let values = self.aig.simulate(&assignment)?;
        Ok((self.lhs.value(&values)?, self.rhs.value(&values)?))
    }

    fn decode(&self, v: &BitVec, model: &Model) -> Result<u64> {
        v.bits().iter().enumerate().try_fold(0u64, |acc, (i, bit)| -> Result<u64> {
            let id = bit.get_node_id();
            let lit = self.get_lit(id).ok_or(MiterError::UnmappedNodeToLit(id))?;
            let value = model.value(lit) ^ bit.get_complement();
            Ok(acc | (u64::from(value) << i))
        })
    }

    /// Reads `X` and `Y` from a model of the CNF and replays both circuits on them.
    pub fn decode_witness(&self, model: &Model) -> Result<Counterexample> {
        let x = self.decode(&self.x, model)?;
        let y = self.decode(&self.y, model)?;
        let (lhs, rhs) = self.evaluate(x, y)?;
        if lhs == rhs {
            return Err(MiterError::SpuriousCounterexample { x, y, out: lhs }.into());
        }
        Ok(Counterexample {
            width: self.width(),
            x,
            y,
            lhs_name: self.lhs_name.clone(),
            lhs,
            rhs_name: self.rhs_name.clone(),
            rhs,
        })
    }

    /// Tries to prove that the two circuits are equivalent for all inputs.
    /// - UNSAT: [`Verdict::Equivalent`]
    /// - SAT: [`Verdict::CounterexampleFound`], replayed through both circuits
    /// - UNKNOWN: [`Verdict::Indeterminate`].
    ///
    /// Note that it might also just take too much time on large circuits,
    /// because the generated SAT query is too large for SAT solvers; set a session timeout.
    pub fn try_prove_eq(&self, session: &mut Session) -> Result<Verdict> {
        let cnf = self.to_cnf()?;
        let verdict = match session.solve(&cnf)? {
            SatResult::Unsat => Verdict::Equivalent,
            SatResult::Sat(model) => Verdict::CounterexampleFound(self.decode_witness(&model)?),
            SatResult::Unknown(reason) => {
                warn!(
                    "{} vs {} on {} bits is indeterminate: {}",
                    self.lhs_name,
                    self.rhs_name,
                    self.width(),
                    reason
                );
                Verdict::Indeterminate(reason)
            }
        };
        info!(
            "{} vs {} on {} bits: {}",
            self.lhs_name,
            self.rhs_name,
            self.width(),
            verdict
        );
        Ok(verdict)
    }
}
