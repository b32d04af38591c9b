use thiserror::Error;

use crate::{aig::AigError, miter::MiterError, solver::SolverError};

/// The result of any operation of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when building a circuit, encoding it or solving the equivalence query failed.
///
/// Note that a counterexample or an inconclusive solver run are not errors, see [`Verdict`].
///
/// [`Verdict`]: crate::harness::Verdict
#[derive(Debug, Error)]
pub enum Error {
    /// Just forwarding a [`ConstructionError`].
    #[error("{0}")]
    Construction(#[from] ConstructionError),

    /// Just forwarding an [`AigError`].
    #[error("{0}")]
    Aig(#[from] AigError),

    /// Just forwarding a [`MiterError`].
    #[error("{0}")]
    Miter(#[from] MiterError),

    /// Just forwarding a [`SolverError`].
    #[error("{0}")]
    Solver(#[from] SolverError),
}

/// Error returned when a symbolic value or a circuit model cannot be built.
///
/// These are raised before any solver call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    /// Widths must be in `1..=MAX_WIDTH`.
    #[error("invalid bit-width {0} (expected 1 to {max})", max = crate::bitvec::MAX_WIDTH)]
    InvalidWidth(usize),

    /// Bit extraction out of the vector.
    #[error("bit index {index} is out of range for a {width}-bit vector")]
    IndexOutOfRange { index: usize, width: usize },

    /// Pointwise operation between vectors of different widths.
    #[error("operands have different widths: {left} vs {right}")]
    WidthMismatch { left: usize, right: usize },

    /// Adder cells only accept single bits.
    #[error("expected a single bit, got a {0}-bit vector")]
    NotASingleBit(usize),
}
