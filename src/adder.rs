//! Adder cells and the adder circuits compared by this crate.
//!
//! The two primitive cells are [`half_adder`] and [`full_adder`]. Complete adders implement
//! [`Circuit`]:
//! - [`RippleCarry`], a chain of full adders
//! - [`CarryLookahead`], carries computed from generate/propagate signals.
//!
//! Other adder architectures (Kogge-Stone, Brent-Kung, ...) can be compared by implementing
//! [`Circuit`] too.

pub mod lookahead;
pub mod ripple;

pub use lookahead::CarryLookahead;
pub use ripple::RippleCarry;

use crate::{Aig, Result, bitvec::BitVec, error::ConstructionError};

/// A purely combinational circuit computing a `W`-bit output from two `W`-bit operands.
///
/// Implementations must not keep any state: building the circuit twice over the same inputs
/// must describe the same function.
pub trait Circuit: Send + Sync {
    /// Name used in reports, eg `ripple`.
    fn name(&self) -> &str;

    /// Builds the circuit output over the symbolic operands `x` and `y`.
    fn build(&self, aig: &mut Aig, x: &BitVec, y: &BitVec) -> Result<BitVec>;
}

fn check_single_bit(v: &BitVec) -> Result<()> {
    if v.width() != 1 {
        return Err(ConstructionError::NotASingleBit(v.width()).into());
    }
    Ok(())
}

/// Returns `(sum, carry)` where `sum = a XOR b` and `carry = a AND b`.
pub fn half_adder(aig: &mut Aig, a: &BitVec, b: &BitVec) -> Result<(BitVec, BitVec)> {
    check_single_bit(a)?;
    check_single_bit(b)?;
    let sum = a.xor(aig, b)?;
    let carry = a.and(aig, b)?;
    Ok((sum, carry))
}

/// Returns `(sum, carry)` where `sum = a XOR b XOR cin`
/// and `carry = (a AND b) OR (b AND cin) OR (a AND cin)`.
pub fn full_adder(
    aig: &mut Aig,
    a: &BitVec,
    b: &BitVec,
    cin: &BitVec,
) -> Result<(BitVec, BitVec)> {
    check_single_bit(a)?;
    check_single_bit(b)?;
    check_single_bit(cin)?;

    let ab = a.xor(aig, b)?;
    let sum = ab.xor(aig, cin)?;

    let a_b = a.and(aig, b)?;
    let b_cin = b.and(aig, cin)?;
    let a_cin = a.and(aig, cin)?;
    let carry = a_b.or(aig, &b_cin)?.or(aig, &a_cin)?;

    Ok((sum, carry))
}

/// Both operands of an adder must have the same width.
pub(crate) fn check_operands(x: &BitVec, y: &BitVec) -> Result<()> {
    if x.width() != y.width() {
        return Err(ConstructionError::WidthMismatch {
            left: x.width(),
            right: y.width(),
        }
        .into());
    }
    Ok(())
}

/// Checks by exhaustive simulation that `circuit` computes `(x + y) mod 2^width`.
#[cfg(test)]
pub(crate) fn assert_adds(circuit: &dyn Circuit, width: usize) {
    use crate::bitvec::Width;
    use std::collections::HashMap;

    let width = Width::new(width).unwrap();
    let mut aig = Aig::new();
    let x = BitVec::input(&mut aig, "X", width);
    let y = BitVec::input(&mut aig, "Y", width);
    let out = circuit.build(&mut aig, &x, &y).unwrap();
    assert_eq!(out.width(), width.get());

    for vx in 0..=width.mask() {
        for vy in 0..=width.mask() {
            let mut assignment = HashMap::new();
            x.assign(vx, &mut assignment);
            y.assign(vy, &mut assignment);
            assert_eq!(
                out.eval(&aig, &assignment).unwrap(),
                vx.wrapping_add(vy) & width.mask(),
                "{} adder, width {}: {} + {}",
                circuit.name(),
                width,
                vx,
                vy
            );
        }
    }
}
