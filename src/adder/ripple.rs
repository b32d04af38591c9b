use log::debug;

use super::{Circuit, check_operands, full_adder, half_adder};
use crate::{Aig, Result, bitvec::BitVec};

/// Ripple-carry adder.
///
/// Bit 0 is a half adder, every other bit `i` is a full adder fed by the carry of bit `i - 1`:
/// each stage waits on the previous one. The carry out of the last stage is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RippleCarry;

impl Circuit for RippleCarry {
    fn name(&self) -> &str {
        "ripple"
    }

    fn build(&self, aig: &mut Aig, x: &BitVec, y: &BitVec) -> Result<BitVec> {
        check_operands(x, y)?;

        let mut sums = Vec::with_capacity(x.width());
        let mut carry: Option<BitVec> = None;
        for i in 0..x.width() {
            let a = x.extract(i)?;
            let b = y.extract(i)?;
            let (sum, carry_out) = match &carry {
                None => half_adder(aig, &a, &b)?,
                Some(cin) => full_adder(aig, &a, &b, cin)?,
            };
            sums.push(sum);
            carry = Some(carry_out);
        }

        debug!("ripple-carry adder: {} bits, {} nodes", x.width(), aig.len());

        // Sums are least significant first, concat wants them the other way around
        sums.reverse();
        Ok(BitVec::concat(&sums)?)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;
    use crate::{adder::assert_adds, bitvec::Width};

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(4)]
    #[test_case(8)]
    fn ripple_adds_test(width: usize) {
        assert_adds(&RippleCarry, width);
    }

    #[test]
    fn ripple_wraps_around_test() {
        let width = Width::new(4).unwrap();
        let mut aig = Aig::new();
        let x = BitVec::input(&mut aig, "X", width);
        let y = BitVec::input(&mut aig, "Y", width);
        let out = RippleCarry.build(&mut aig, &x, &y).unwrap();

        let mut assignment = HashMap::new();
        x.assign(0b1111, &mut assignment);
        y.assign(0b0001, &mut assignment);
        assert_eq!(out.eval(&aig, &assignment).unwrap(), 0);

        x.assign(0, &mut assignment);
        y.assign(0, &mut assignment);
        assert_eq!(out.eval(&aig, &assignment).unwrap(), 0);
    }

    #[test]
    fn ripple_width_mismatch_test() {
        let mut aig = Aig::new();
        let x = BitVec::input(&mut aig, "X", Width::new(4).unwrap());
        let y = BitVec::input(&mut aig, "Y", Width::new(3).unwrap());
        assert!(RippleCarry.build(&mut aig, &x, &y).is_err());
    }
}
