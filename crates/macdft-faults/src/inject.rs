//! Pure fault-injection transform
//!
//! `inject` maps a nominal (pattern, weight-vector) stimulus to the faulty
//! view one row of the hardware would see. It never mutates its inputs and
//! has no side effects beyond `tracing` diagnostics; the same arguments
//! always produce the same result.

use tracing::debug;

use crate::bits::{Pattern, WeightVector};
use crate::fault::{Fault, FaultKind, Row};

/// Apply `fault` to the nominal stimulus as seen by `target_row`.
///
/// - Stuck-at faults overwrite one weight bit, and only when the faulty row
///   is the target; input bits are never altered.
/// - Bridge faults corrupt the input pair for *both* rows (the defect sits
///   on the input wiring, not in weight storage); weights pass through.
/// - Coupling faults flip the victim weight bit on the row opposite the
///   aggressor, but only when the aggressor bit's recorded transition arms
///   the fault and that opposite row is the target.
pub fn inject(
    pattern: &Pattern,
    weights: &WeightVector,
    fault: &Fault,
    target_row: Row,
) -> (Pattern, WeightVector) {
    let mut pattern_faulty = *pattern;
    let mut weights_faulty = weights.clone();

    match &fault.kind {
        FaultKind::StuckAt { row, bit, forced } => {
            if *row == target_row {
                let old = weights_faulty.bit(*bit);
                weights_faulty.set_bit(*bit, *forced);
                debug!(
                    row = row.name(),
                    bit, old, forced, "stuck-at fault applied to weight bit"
                );
            }
        }

        FaultKind::Bridge { a, b, variant } => {
            // Input lines 0 and 1 feed rows 1 and 2; the bridge corrupts
            // them identically for every observer.
            let line = |idx: usize| match idx {
                0 => pattern.r1,
                _ => pattern.r2,
            };
            let (av, bv) = (line(*a), line(*b));
            let (af, bf) = variant.apply(av, bv);
            let mut set_line = |idx: usize, value: bool| match idx {
                0 => pattern_faulty.r1 = value,
                _ => pattern_faulty.r2 = value,
            };
            set_line(*a, af);
            set_line(*b, bf);
            debug!(
                variant = variant.name(),
                a = av,
                b = bv,
                a_faulty = af,
                b_faulty = bf,
                "bridge fault applied to input pair"
            );
        }

        FaultKind::Coupling {
            aggressor_row,
            aggressor_bit,
            victim_bit,
            transition,
            prev,
            curr,
        } => {
            let triggered =
                transition.matches(prev.bit(*aggressor_bit), curr.bit(*aggressor_bit));
            if triggered && target_row == aggressor_row.opposite() {
                let old = weights_faulty.bit(*victim_bit);
                weights_faulty.invert_bit(*victim_bit);
                debug!(
                    aggressor = aggressor_row.name(),
                    transition = transition.name(),
                    victim_row = target_row.name(),
                    victim_bit,
                    old,
                    "coupling fault flipped victim weight bit"
                );
            }
        }
    }

    (pattern_faulty, weights_faulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::{BridgeVariant, Transition};

    fn stuck_at(row: Row, bit: usize, forced: bool) -> Fault {
        Fault::new(FaultKind::StuckAt { row, bit, forced })
    }

    #[test]
    fn test_stuck_at_only_touches_target_row() {
        let pattern = Pattern::new(true, false);
        let weights = WeightVector::all_zero(4);
        let fault = stuck_at(Row::R1, 2, true);

        // Matching row: exactly one bit changes
        let (p1, w1) = inject(&pattern, &weights, &fault, Row::R1);
        assert_eq!(p1, pattern);
        assert_eq!(w1.value(), 4);

        // Other row: complete pass-through
        let (p2, w2) = inject(&pattern, &weights, &fault, Row::R2);
        assert_eq!(p2, pattern);
        assert_eq!(w2, weights);
    }

    #[test]
    fn test_stuck_at_zero_on_all_ones() {
        let weights = WeightVector::all_one(4);
        let fault = stuck_at(Row::R2, 3, false);

        let (_, w) = inject(&Pattern::new(false, true), &weights, &fault, Row::R2);
        assert_eq!(w.value(), 15 - 8);
        // All other bits untouched
        assert!(w.bit(0) && w.bit(1) && w.bit(2));
        assert!(!w.bit(3));
    }

    #[test]
    fn test_inputs_never_altered_by_stuck_at() {
        for pattern in Pattern::sweep() {
            let fault = stuck_at(Row::R1, 0, true);
            let (p, _) = inject(&pattern, &WeightVector::all_zero(2), &fault, Row::R1);
            assert_eq!(p, pattern);
        }
    }

    #[test]
    fn test_bridge_corrupts_inputs_for_both_rows() {
        let fault = Fault::new(FaultKind::Bridge {
            a: 0,
            b: 1,
            variant: BridgeVariant::WiredAnd,
        });
        let pattern = Pattern::new(true, false);
        let weights = WeightVector::all_one(4);

        for row in Row::BOTH {
            let (p, w) = inject(&pattern, &weights, &fault, row);
            // 1&0 = 0 on both lines
            assert_eq!(p, Pattern::new(false, false));
            // Weights pass through
            assert_eq!(w, weights);
        }
    }

    #[test]
    fn test_bridge_wired_or() {
        let fault = Fault::new(FaultKind::Bridge {
            a: 0,
            b: 1,
            variant: BridgeVariant::WiredOr,
        });
        let (p, _) = inject(
            &Pattern::new(false, true),
            &WeightVector::all_zero(2),
            &fault,
            Row::R1,
        );
        assert_eq!(p, Pattern::new(true, true));
    }

    #[test]
    fn test_coupling_triggered_flips_victim_on_opposite_row() {
        let prev = WeightVector::from_bits(vec![false, false, false]);
        let curr = WeightVector::from_bits(vec![false, true, false]);
        let fault = Fault::new(FaultKind::Coupling {
            aggressor_row: Row::R1,
            aggressor_bit: 1,
            victim_bit: 2,
            transition: Transition::Rise,
            prev,
            curr,
        });

        let weights = WeightVector::all_zero(3);
        // Victim row is R2: bit 2 flips
        let (_, w2) = inject(&Pattern::new(true, true), &weights, &fault, Row::R2);
        assert_eq!(w2.value(), 4);
        // Aggressor's own row is untouched
        let (_, w1) = inject(&Pattern::new(true, true), &weights, &fault, Row::R1);
        assert_eq!(w1, weights);
    }

    #[test]
    fn test_coupling_not_triggered_passes_through() {
        let stable = WeightVector::from_bits(vec![true, true]);
        let fault = Fault::new(FaultKind::Coupling {
            aggressor_row: Row::R2,
            aggressor_bit: 0,
            victim_bit: 1,
            transition: Transition::Fall,
            prev: stable.clone(),
            curr: stable,
        });

        let weights = WeightVector::all_one(2);
        let (_, w) = inject(&Pattern::new(true, true), &weights, &fault, Row::R1);
        assert_eq!(w, weights);
    }
}
