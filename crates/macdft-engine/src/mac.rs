//! Two-row weighted-sum hardware model
//!
//! The unit under test is a pair of accumulating rows: each row contributes
//! its weight-vector value when its gating input is high, and the output is
//! the plain sum of the two contributions.

use macdft_faults::WeightVector;

/// Output of the fault-free (or fault-injected, if the arguments already
/// carry the faulty view) MAC unit for one stimulus.
///
/// `in1`/`in2` are the single active-line bits gating rows 1 and 2; the
/// row values are the little-endian integers encoded by the weight bits.
pub fn output_sum(in1: bool, weights1: &WeightVector, in2: bool, weights2: &WeightVector) -> u64 {
    u64::from(in1) * weights1.value() + u64::from(in2) * weights2.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_rows_sum_to_zero() {
        let w = WeightVector::all_one(6);
        assert_eq!(output_sum(false, &w, false, &w), 0);
    }

    #[test]
    fn test_single_row_contribution() {
        let w1 = WeightVector::from_bits(vec![false, true, true, true]); // 14
        let w2 = WeightVector::from_bits(vec![true, true, true, false]); // 7
        assert_eq!(output_sum(true, &w1, false, &w2), 14);
        assert_eq!(output_sum(false, &w1, true, &w2), 7);
        assert_eq!(output_sum(true, &w1, true, &w2), 21);
    }

    #[test]
    fn test_row_values_are_positional() {
        let w = WeightVector::from_bits(vec![true, false, false, true]); // 1 + 8
        assert_eq!(output_sum(true, &w, false, &w), 9);
    }
}
