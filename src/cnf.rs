//! The SAT formula handed to solvers, as a CNF.
//!
//! To prove combinational equivalence between two circuits `a` and `b`:
//! - generate the miter of `a` and `b` with [`Miter::new`]
//! - extract CNF from the miter with [`Miter::to_cnf`], built with the methods of [`Cnf`]
//! - check that the CNF is **UNSAT** with a SAT solver.
//!
//! If the resulting CNF is SAT, it means that the two circuits are **not equivalent**.
//!
//! This is already implemented in [`Miter::try_prove_eq`].
//!
//! [`Miter::new`]: crate::miter::Miter::new
//! [`Miter::to_cnf`]: crate::miter::Miter::to_cnf
//! [`Miter::try_prove_eq`]: crate::miter::Miter::try_prove_eq

use std::{collections::HashMap, fmt::Write, num::TryFromIntError, ops::Not};

use crate::{AigEdge, AigNode, NodeId, Result, miter::MiterError};

/// A SAT literal, in DIMACS convention (variables start at 1, negative means complemented).
///
/// Note that all AIG nodes do not correspond to a SAT literal.
/// For example, [`AigNode::False`] node do not map to any literal, but rather is omitted
/// as false boolean variables can be removed from a clause without changing the problem.
/// Clauses that contain a true boolean variable (ie a complemented edge to [`AigNode::False`] node)
/// are obviously true and don't need to be emitted.
///
/// These cases are handled by the internal `LitRes` data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<i64> for Lit {
    fn from(value: i64) -> Self {
        if value == 0 {
            panic!("Tried to create a Lit from 0. 0 is not a valid literal in DIMACS format.");
        }
        Lit(value)
    }
}

impl TryFrom<NodeId> for Lit {
    type Error = TryFromIntError;

    fn try_from(value: NodeId) -> std::result::Result<Self, Self::Error> {
        Ok(Lit::from(i64::try_from(value)?))
    }
}

impl Lit {
    /// The DIMACS integer of this literal.
    pub fn to_dimacs(self) -> i64 {
        self.0
    }

    /// The (positive) variable index of this literal.
    pub fn var(self) -> i64 {
        self.0.abs()
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LitRes {
    False,
    True,
    Lit(Lit),
}

impl Not for LitRes {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            LitRes::False => LitRes::True,
            LitRes::True => LitRes::False,
            LitRes::Lit(lit) => LitRes::Lit(!lit),
        }
    }
}

impl From<Lit> for LitRes {
    fn from(value: Lit) -> Self {
        LitRes::Lit(value)
    }
}

/// A SAT clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(Vec<Lit>);

impl Clause {
    /// Returns the true SAT clause once we got rid of `True` and `False` literals.
    /// If there is a `True`, then the Clause is obviously satisfied, so we return None.
    /// `False` literals are omitted, and real literals are added to the clause.
    ///
    /// Only called on gate clauses, which always keep at least one real literal
    /// (constant fanins are folded when the AIG is built).
    fn from_lit_res(lits: Vec<LitRes>) -> Option<Clause> {
        let mut literals = Vec::new();

        for lit_res in lits {
            match lit_res {
                LitRes::True => return None,
                LitRes::False => (),
                LitRes::Lit(lit) => literals.push(lit),
            }
        }

        if literals.is_empty() {
            None
        } else {
            Some(Clause(literals))
        }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(value: Vec<Lit>) -> Self {
        Clause(value)
    }
}

/// A SAT CNF that can be passed to a SAT solver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    /// Largest variable index declared or used.
    num_vars: i64,
}

impl Cnf {
    /// A new empty CNF.
    pub fn new() -> Self {
        Cnf::default()
    }

    /// Declares variables `1..=num_vars`, even if some of them end up in no clause.
    pub fn with_vars(num_vars: i64) -> Self {
        Cnf {
            clauses: Vec::new(),
            num_vars,
        }
    }

    pub fn num_vars(&self) -> i64 {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Add the given clause to the CNF.
    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.0.iter().map(|l| l.var()).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    /// Add the given clause to the CNF, else does nothing.
    pub fn add_clause_if(&mut self, clause: Option<Clause>) {
        if let Some(c) = clause {
            self.add_clause(c);
        }
    }

    /// Add clauses induced by the node (Tseitin encoding of and gates).
    pub fn add_clauses_node(
        &mut self,
        node: &AigNode,
        litmap: &HashMap<NodeId, Lit>,
    ) -> Result<()> {
        if let AigNode::And { id, fanin0, fanin1 } = node {
            let a = fanin0.get_literal_res(litmap)?;
            let b = fanin1.get_literal_res(litmap)?;
            let z = LitRes::from(*litmap.get(id).ok_or(MiterError::UnmappedNodeToLit(*id))?);

            self.add_clause_if(Clause::from_lit_res(vec![a, !z]));
            self.add_clause_if(Clause::from_lit_res(vec![b, !z]));
            self.add_clause_if(Clause::from_lit_res(vec![!a, !b, z]));
        }
        // The other nodes do not induce any clause, they only generate literals
        Ok(())
    }

    /// Add clauses that encode `edge = true`.
    ///
    /// This is the output of the miter: we assume that the outputs differ,
    /// - if this is possible (ie the CNF is SAT), then circuits are not equivalent
    /// - if the CNF is UNSAT, then circuits are equivalent.
    pub fn add_edge_is_true(&mut self, edge: &AigEdge, litmap: &HashMap<NodeId, Lit>) -> Result<()> {
        match edge.get_literal_res(litmap)? {
            LitRes::True => (),
            LitRes::Lit(lit) => self.add_clause(Clause::from(vec![lit])),
            LitRes::False => {
                // Asserting false: contradiction on a fresh variable
                let v = Lit::from(self.num_vars + 1);
                self.add_clause(Clause::from(vec![v]));
                self.add_clause(Clause::from(vec![!v]));
            }
        }
        Ok(())
    }

    /// Returns the DIMACS representation of the CNF.
    ///
    /// ```rust
    /// use carrycheck::cnf::{Clause, Cnf, Lit};
    /// let mut cnf = Cnf::new();
    /// cnf.add_clause(Clause::from(vec![Lit::from(1), !Lit::from(2)]));
    /// assert_eq!(cnf.to_dimacs(), "p cnf 2 1\n1 -2 0\n");
    /// ```
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_vars, self.clauses.len());
        for clause in &self.clauses {
            for lit in &clause.0 {
                // Writing to a String cannot fail
                let _ = write!(out, "{} ", lit.0);
            }
            out.push_str("0\n");
        }
        out
    }
}

impl AigEdge {
    fn get_literal_res(&self, litmap: &HashMap<NodeId, Lit>) -> Result<LitRes> {
        let lit = if self.is_constant() {
            LitRes::False
        } else {
            let id = self.get_node_id();
            LitRes::from(*litmap.get(&id).ok_or(MiterError::UnmappedNodeToLit(id))?)
        };
        Ok(if self.get_complement() { !lit } else { lit })
    }
}
