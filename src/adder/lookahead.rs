use log::debug;

use super::{Circuit, check_operands};
use crate::{
    Aig, Result,
    bitvec::{BitVec, Width},
    error::ConstructionError,
};

/// Generate and propagate signals of one bit position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenProp {
    /// `A_i AND B_i`: the position produces a carry by itself.
    pub generate: BitVec,
    /// `A_i XOR B_i`: the position forwards an incoming carry.
    pub propagate: BitVec,
}

/// Computes `(G_i, P_i)` for every bit position, least significant first.
pub fn generate_propagate(aig: &mut Aig, x: &BitVec, y: &BitVec) -> Result<Vec<GenProp>> {
    check_operands(x, y)?;
    (0..x.width())
        .map(|i| -> Result<GenProp> {
            let a = x.extract(i)?;
            let b = y.extract(i)?;
            Ok(GenProp {
                generate: a.and(aig, &b)?,
                propagate: a.xor(aig, &b)?,
            })
        })
        .collect()
}

/// `C_i = G_i OR (P_i AND C_{i-1})`, the carry out of position `i`.
fn lookahead_carry(aig: &mut Aig, gp: &GenProp, carry_in: &BitVec) -> Result<BitVec> {
    let chained = gp.propagate.and(aig, carry_in)?;
    gp.generate.or(aig, &chained)
}

/// Folds `carry` over the (G, P) pairs, least significant first, and returns every carry out.
///
/// `C_0 = G_0` (no carry in), then `C_i = carry(G_i, P_i, C_{i-1})`.
pub fn carries(
    aig: &mut Aig,
    gps: &[GenProp],
    carry: impl Fn(&mut Aig, &GenProp, &BitVec) -> Result<BitVec>,
) -> Result<Vec<BitVec>> {
    gps.iter().try_fold(
        Vec::with_capacity(gps.len()),
        |mut acc: Vec<BitVec>, gp| -> Result<Vec<BitVec>> {
            let c = match acc.last() {
                None => gp.generate.clone(),
                Some(prev) => carry(aig, gp, prev)?,
            };
            acc.push(c);
            Ok(acc)
        },
    )
}

/// `S_0 = P_0 XOR 0` and `S_i = P_i XOR C_{i-1}`, returned as a vector.
///
/// The carry out of the last position is not used, so `carries` needs at least one carry per
/// position but the last one.
pub fn sums_from_carries(aig: &mut Aig, gps: &[GenProp], carries: &[BitVec]) -> Result<BitVec> {
    let zero = BitVec::constant(0, Width::new(1)?);
    let mut sums = gps
        .iter()
        .enumerate()
        .map(|(i, gp)| -> Result<BitVec> {
            let carry_in = match i.checked_sub(1) {
                None => &zero,
                Some(prev) => carries.get(prev).ok_or(ConstructionError::WidthMismatch {
                    left: gps.len(),
                    right: carries.len(),
                })?,
            };
            gp.propagate.xor(aig, carry_in)
        })
        .collect::<Result<Vec<_>>>()?;
    sums.reverse();
    Ok(BitVec::concat(&sums)?)
}

/// Carry-lookahead adder.
///
/// Carries are computed from the generate/propagate signals only, never from the sums of the
/// previous positions. The recurrence is expressed as a fold, which denotes the same function as
/// the fully expanded lookahead equations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarryLookahead;

impl Circuit for CarryLookahead {
    fn name(&self) -> &str {
        "lookahead"
    }

    fn build(&self, aig: &mut Aig, x: &BitVec, y: &BitVec) -> Result<BitVec> {
        let gps = generate_propagate(aig, x, y)?;
        let cs = carries(aig, &gps, lookahead_carry)?;
        let out = sums_from_carries(aig, &gps, &cs)?;
        debug!("carry-lookahead adder: {} bits, {} nodes", x.width(), aig.len());
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;
    use crate::adder::assert_adds;

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(4)]
    #[test_case(8)]
    fn lookahead_adds_test(width: usize) {
        assert_adds(&CarryLookahead, width);
    }

    #[test]
    fn missing_carries_test() {
        let width = Width::new(3).unwrap();
        let mut aig = Aig::new();
        let x = BitVec::input(&mut aig, "X", width);
        let y = BitVec::input(&mut aig, "Y", width);
        let gps = generate_propagate(&mut aig, &x, &y).unwrap();
        assert!(matches!(
            sums_from_carries(&mut aig, &gps, &[]),
            Err(crate::Error::Construction(ConstructionError::WidthMismatch {
                left: 3,
                right: 0
            }))
        ));

        // The last carry is never read
        let cs = carries(&mut aig, &gps, lookahead_carry).unwrap();
        let out = sums_from_carries(&mut aig, &gps, &cs[..2]).unwrap();
        let mut assignment = HashMap::new();
        x.assign(0b011, &mut assignment);
        y.assign(0b011, &mut assignment);
        assert_eq!(out.eval(&aig, &assignment).unwrap(), 0b110);
    }

    #[test]
    fn carries_test() {
        let width = Width::new(4).unwrap();
        let mut aig = Aig::new();
        let x = BitVec::input(&mut aig, "X", width);
        let y = BitVec::input(&mut aig, "Y", width);
        let gps = generate_propagate(&mut aig, &x, &y).unwrap();
        let cs = carries(&mut aig, &gps, lookahead_carry).unwrap();
        assert_eq!(cs.len(), 4);
        assert_eq!(cs[0], gps[0].generate);

        // 0b0111 + 0b0001: carries out of bits 0, 1 and 2, but not 3
        let mut assignment = HashMap::new();
        x.assign(0b0111, &mut assignment);
        y.assign(0b0001, &mut assignment);
        let values = aig.simulate(&assignment).unwrap();
        let got = cs
            .iter()
            .map(|c| c.value(&values).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(got, vec![1, 1, 1, 0]);
    }

    #[test]
    fn full_propagation_test() {
        for w in [1, 2, 3, 4, 8] {
            let width = Width::new(w).unwrap();
            let mut aig = Aig::new();
            let x = BitVec::input(&mut aig, "X", width);
            let y = BitVec::input(&mut aig, "Y", width);
            let out = CarryLookahead.build(&mut aig, &x, &y).unwrap();

            let mut assignment = HashMap::new();
            x.assign(width.mask(), &mut assignment);
            y.assign(1, &mut assignment);
            assert_eq!(out.eval(&aig, &assignment).unwrap(), 0);
        }
    }
}
