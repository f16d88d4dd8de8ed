//! Bit-level vocabulary: input patterns and weight-bit vectors
//!
//! A `Pattern` is the pair of gating bits driven into the two rows for one
//! test step. A `WeightVector` is one row's weight storage, little-endian:
//! bit `k` contributes `2^k` to the row value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fault::Row;

/// One input stimulus: the gating bit for each of the two rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    /// Input line feeding row 1
    pub r1: bool,
    /// Input line feeding row 2
    pub r2: bool,
}

impl Pattern {
    /// Create a pattern from the two row bits
    pub const fn new(r1: bool, r2: bool) -> Self {
        Self { r1, r2 }
    }

    /// The gating bit for the given row
    pub fn row_bit(&self, row: Row) -> bool {
        match row {
            Row::R1 => self.r1,
            Row::R2 => self.r2,
        }
    }

    /// The four canonical patterns in sweep order: 00, 01, 10, 11
    pub fn sweep() -> Vec<Pattern> {
        vec![
            Pattern::new(false, false),
            Pattern::new(false, true),
            Pattern::new(true, false),
            Pattern::new(true, true),
        ]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", u8::from(self.r1), u8::from(self.r2))
    }
}

/// A row's weight storage as individual bits, little-endian positional
/// weight: the encoded integer value is `sum(bit[k] * 2^k)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightVector {
    bits: Vec<bool>,
}

impl WeightVector {
    /// All bits cleared
    pub fn all_zero(width: usize) -> Self {
        Self {
            bits: vec![false; width],
        }
    }

    /// All bits set
    pub fn all_one(width: usize) -> Self {
        Self {
            bits: vec![true; width],
        }
    }

    /// Build from explicit bits (index 0 is the least significant)
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Number of weight bits
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Read bit `k`; out-of-range reads are 0, matching an absent line
    pub fn bit(&self, k: usize) -> bool {
        self.bits.get(k).copied().unwrap_or(false)
    }

    /// Overwrite bit `k`; out-of-range writes are dropped
    pub fn set_bit(&mut self, k: usize, value: bool) {
        if let Some(b) = self.bits.get_mut(k) {
            *b = value;
        }
    }

    /// Flip bit `k`
    pub fn invert_bit(&mut self, k: usize) {
        if let Some(b) = self.bits.get_mut(k) {
            *b = !*b;
        }
    }

    /// The little-endian unsigned integer encoded by the bits
    pub fn value(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(k, _)| 1u64 << k)
            .sum()
    }

    /// Borrow the raw bits
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }
}

impl fmt::Display for WeightVector {
    /// MSB-first bit string, e.g. `1110` for bits [0,1,1,1]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            write!(f, "{}", u8::from(b))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_row_bits() {
        let p = Pattern::new(true, false);
        assert!(p.row_bit(Row::R1));
        assert!(!p.row_bit(Row::R2));
        assert_eq!(p.to_string(), "[1,0]");
    }

    #[test]
    fn test_sweep_order() {
        let sweep = Pattern::sweep();
        assert_eq!(sweep.len(), 4);
        assert_eq!(sweep[0], Pattern::new(false, false));
        assert_eq!(sweep[1], Pattern::new(false, true));
        assert_eq!(sweep[2], Pattern::new(true, false));
        assert_eq!(sweep[3], Pattern::new(true, true));
    }

    #[test]
    fn test_weight_vector_value() {
        assert_eq!(WeightVector::all_zero(6).value(), 0);
        assert_eq!(WeightVector::all_one(6).value(), 63);

        // bits [0,1,1,1] -> 2 + 4 + 8 = 14
        let w = WeightVector::from_bits(vec![false, true, true, true]);
        assert_eq!(w.value(), 14);
        assert_eq!(w.to_string(), "1110");
    }

    #[test]
    fn test_set_and_invert_bit() {
        let mut w = WeightVector::all_zero(4);
        w.set_bit(2, true);
        assert_eq!(w.value(), 4);
        w.invert_bit(2);
        assert_eq!(w.value(), 0);

        // Out-of-range accesses are tolerated, not panics
        w.set_bit(17, true);
        assert_eq!(w.value(), 0);
        assert!(!w.bit(17));
    }
}
