//! Symbolic fixed-width bit-vectors built on top of an [`Aig`].
//!
//! A [`BitVec`] is an immutable list of AIG signals, **least significant bit first**:
//! `bits()[0]` is bit 0. This is the only bit ordering used in this crate, the single exception
//! being [`BitVec::concat`] which takes its parts most significant first, like the usual
//! `{b3, b2, b1, b0}` notation.
//!
//! ```rust
//! use carrycheck::{Aig, bitvec::{BitVec, Width}};
//! let mut aig = Aig::new();
//! let width = Width::new(4).unwrap();
//! let x = BitVec::input(&mut aig, "X", width);
//!
//! // Splitting a vector into bits and putting them back together is the identity
//! let bits = (0..4).rev().map(|i| x.extract(i)).collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(BitVec::concat(&bits).unwrap(), x);
//! ```

use std::collections::HashMap;

use crate::{
    Aig, AigEdge, NodeId, Result,
    error::ConstructionError,
};

/// Largest supported width: concrete values are decoded as `u64`.
pub const MAX_WIDTH: usize = 64;

/// A validated bit-width, in `1..=MAX_WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Width(usize);

impl Width {
    pub fn new(width: usize) -> std::result::Result<Self, ConstructionError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(ConstructionError::InvalidWidth(width));
        }
        Ok(Width(width))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// All ones on `width` bits.
    pub fn mask(&self) -> u64 {
        if self.0 == MAX_WIDTH {
            u64::MAX
        } else {
            (1 << self.0) - 1
        }
    }
}

impl Default for Width {
    fn default() -> Self {
        Width(crate::config::DEFAULT_WIDTH)
    }
}

impl TryFrom<usize> for Width {
    type Error = ConstructionError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        Width::new(value)
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A symbolic bit-vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    /// Never empty.
    bits: Vec<AigEdge>,
}

impl BitVec {
    /// Create a vector from its bits, least significant first.
    pub fn from_bits(bits: Vec<AigEdge>) -> std::result::Result<Self, ConstructionError> {
        Width::new(bits.len())?;
        Ok(BitVec { bits })
    }

    /// Create `width` fresh unconstrained inputs named `name[i]`.
    pub fn input(aig: &mut Aig, name: &str, width: Width) -> Self {
        let bits = (0..width.get())
            .map(|i| aig.add_input(format!("{}[{}]", name, i)))
            .collect();
        BitVec { bits }
    }

    /// A constant vector. Bits of `value` above `width` are ignored.
    pub fn constant(value: u64, width: Width) -> Self {
        let bits = (0..width.get())
            .map(|i| AigEdge::constant((value >> i) & 1 == 1))
            .collect();
        BitVec { bits }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// The signals of this vector, least significant first.
    pub fn bits(&self) -> &[AigEdge] {
        &self.bits
    }

    /// Returns the single-bit slice at position `index` (bit 0 is the least significant one).
    pub fn extract(&self, index: usize) -> std::result::Result<BitVec, ConstructionError> {
        let bit = self
            .bits
            .get(index)
            .ok_or(ConstructionError::IndexOutOfRange {
                index,
                width: self.width(),
            })?;
        Ok(BitVec { bits: vec![*bit] })
    }

    /// The only signal of a single-bit vector.
    pub fn as_bit(&self) -> std::result::Result<AigEdge, ConstructionError> {
        match self.bits.as_slice() {
            [bit] => Ok(*bit),
            _ => Err(ConstructionError::NotASingleBit(self.width())),
        }
    }

    /// Concatenates vectors, **most significant part first**.
    pub fn concat(parts: &[BitVec]) -> std::result::Result<BitVec, ConstructionError> {
        let bits: Vec<AigEdge> = parts
            .iter()
            .rev()
            .flat_map(|part| part.bits.iter().copied())
            .collect();
        BitVec::from_bits(bits)
    }

    fn zip_with(
        &self,
        aig: &mut Aig,
        other: &BitVec,
        op: impl Fn(&mut Aig, AigEdge, AigEdge) -> Result<AigEdge>,
    ) -> Result<BitVec> {
        if self.width() != other.width() {
            return Err(ConstructionError::WidthMismatch {
                left: self.width(),
                right: other.width(),
            }
            .into());
        }
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| op(aig, *a, *b))
            .collect::<Result<Vec<_>>>()?;
        Ok(BitVec { bits })
    }

    pub fn and(&self, aig: &mut Aig, other: &BitVec) -> Result<BitVec> {
        self.zip_with(aig, other, Aig::and)
    }

    pub fn or(&self, aig: &mut Aig, other: &BitVec) -> Result<BitVec> {
        self.zip_with(aig, other, Aig::or)
    }

    pub fn xor(&self, aig: &mut Aig, other: &BitVec) -> Result<BitVec> {
        self.zip_with(aig, other, Aig::xor)
    }

    pub fn complement(&self) -> BitVec {
        BitVec {
            bits: self.bits.iter().map(|b| !*b).collect(),
        }
    }

    /// Single signal which is true iff both vectors match on every bit.
    pub fn equals(&self, aig: &mut Aig, other: &BitVec) -> Result<AigEdge> {
        let diff = self.xor(aig, other)?;
        diff.bits
            .iter()
            .try_fold(AigEdge::TRUE, |acc, bit| aig.and(acc, !*bit))
    }

    /// Single signal which is true iff both vectors differ on at least one bit.
    pub fn differs(&self, aig: &mut Aig, other: &BitVec) -> Result<AigEdge> {
        Ok(!self.equals(aig, other)?)
    }

    /// Concrete value of the vector given the result of [`Aig::simulate`].
    pub fn value(&self, values: &[bool]) -> Result<u64> {
        self.bits
            .iter()
            .enumerate()
            .try_fold(0u64, |acc, (i, bit)| -> Result<u64> {
                Ok(acc | (u64::from(Aig::edge_value(values, *bit)?) << i))
            })
    }

    /// Concrete value of the vector for the given input values.
    pub fn eval(&self, aig: &Aig, assignment: &HashMap<NodeId, bool>) -> Result<u64> {
        self.value(&aig.simulate(assignment)?)
    }

    /// Assigns `value` to the bits of this vector, which must all be non complemented inputs.
    /// Used to drive symbolic inputs with concrete values.
    pub fn assign(&self, value: u64, assignment: &mut HashMap<NodeId, bool>) {
        for (i, bit) in self.bits.iter().enumerate() {
            assignment.insert(bit.get_node_id(), ((value >> i) & 1 == 1) ^ bit.get_complement());
        }
    }
}
