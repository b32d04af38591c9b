//! Symbolic equivalence checking of adder circuits.
//!
//! Circuits are built over symbolic bit-vectors ([`bitvec`]) lowered to an And-Inverter Graph
//! ([`Aig`]). Two circuits are compared by building their [`miter::Miter`], encoding it to CNF
//! ([`cnf`]) and asking a SAT solver ([`solver`]) whether their outputs can ever differ.
//!
//! The [`harness`] checks the ripple-carry adder against the carry-lookahead adder ([`adder`])
//! and reports a [`Verdict`].

pub mod adder;
pub mod aig;
pub mod bitvec;
pub mod cnf;
pub mod config;
pub mod error;
pub mod harness;
pub mod miter;
pub mod solver;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::dot;
pub use aig::{Aig, AigEdge, AigError, AigNode, NodeId};
pub use error::{Error, Result};
pub use harness::{Counterexample, Verdict, check_adders, check_batch, check_equivalence};
