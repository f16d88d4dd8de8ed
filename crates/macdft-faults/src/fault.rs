//! Fault entities and their enumeration policy
//!
//! Three fault kinds are modeled:
//!
//! - **Stuck-at**: one weight-storage bit permanently forced to 0 or 1.
//! - **Bridge**: the two input lines electrically coupled, behaving as one
//!   of eight canonical logic functions instead of independent signals.
//! - **Coupling**: an aggressor weight-bit transition on one row flips a
//!   victim bit on the opposite row. Representable and injectable, but the
//!   baseline fault-list generation does not emit these.
//!
//! A `Fault` also carries the per-run observation fields (`detected`,
//! `detect_record`), written at most once by the test engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bits::{Pattern, WeightVector};
use crate::error::{FaultModelError, Result};

/// One of the two accumulating rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Row {
    R1,
    R2,
}

impl Row {
    /// 1-based row index as used in reports
    pub fn index(&self) -> u8 {
        match self {
            Row::R1 => 1,
            Row::R2 => 2,
        }
    }

    /// Short name for locations and reports
    pub fn name(&self) -> &'static str {
        match self {
            Row::R1 => "R1",
            Row::R2 => "R2",
        }
    }

    /// The other row
    pub fn opposite(&self) -> Row {
        match self {
            Row::R1 => Row::R2,
            Row::R2 => Row::R1,
        }
    }

    /// Both rows in fixed order
    pub const BOTH: [Row; 2] = [Row::R1, Row::R2];
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight canonical two-line bridging behaviors
///
/// For original line values `(a, b)` the bridged pair `(a', b')` is:
///
/// | variant | a'    | b'    |
/// |---------|-------|-------|
/// | WiredAnd      | a&b | a&b |
/// | WiredOr       | a\|b | a\|b |
/// | ADominant     | a   | a   |
/// | ADominantAnd  | a   | a&b |
/// | BDominant     | b   | b   |
/// | BDominantAnd  | a&b | b   |
/// | ADominantOr   | a   | a\|b |
/// | BDominantOr   | a\|b | b   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BridgeVariant {
    WiredAnd,
    WiredOr,
    ADominant,
    ADominantAnd,
    BDominant,
    BDominantAnd,
    ADominantOr,
    BDominantOr,
}

impl BridgeVariant {
    /// All variants in index order
    pub const ALL: [BridgeVariant; 8] = [
        BridgeVariant::WiredAnd,
        BridgeVariant::WiredOr,
        BridgeVariant::ADominant,
        BridgeVariant::ADominantAnd,
        BridgeVariant::BDominant,
        BridgeVariant::BDominantAnd,
        BridgeVariant::ADominantOr,
        BridgeVariant::BDominantOr,
    ];

    /// Resolve a numeric variant index; an unknown index is a fatal
    /// configuration error, not a runtime condition
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(FaultModelError::UnknownBridgeVariant(index))
    }

    /// Numeric index of this variant
    pub fn index(&self) -> u8 {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0) as u8
    }

    /// Name for reports
    pub fn name(&self) -> &'static str {
        match self {
            BridgeVariant::WiredAnd => "wired_and",
            BridgeVariant::WiredOr => "wired_or",
            BridgeVariant::ADominant => "a_dominant",
            BridgeVariant::ADominantAnd => "a_dominant_and",
            BridgeVariant::BDominant => "b_dominant",
            BridgeVariant::BDominantAnd => "b_dominant_and",
            BridgeVariant::ADominantOr => "a_dominant_or",
            BridgeVariant::BDominantOr => "b_dominant_or",
        }
    }

    /// Apply this variant's logic function to the original line pair
    pub fn apply(&self, a: bool, b: bool) -> (bool, bool) {
        match self {
            BridgeVariant::WiredAnd => (a & b, a & b),
            BridgeVariant::WiredOr => (a | b, a | b),
            BridgeVariant::ADominant => (a, a),
            BridgeVariant::ADominantAnd => (a, a & b),
            BridgeVariant::BDominant => (b, b),
            BridgeVariant::BDominantAnd => (a & b, b),
            BridgeVariant::ADominantOr => (a, a | b),
            BridgeVariant::BDominantOr => (a | b, b),
        }
    }
}

/// Aggressor bit transition that triggers a coupling fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// 0 -> 1 on the aggressor bit
    Rise,
    /// 1 -> 0 on the aggressor bit
    Fall,
}

impl Transition {
    /// Name for reports ("0->1" / "1->0")
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Rise => "0->1",
            Transition::Fall => "1->0",
        }
    }

    /// Whether a prev/curr bit pair matches this transition
    pub fn matches(&self, prev: bool, curr: bool) -> bool {
        match self {
            Transition::Rise => !prev && curr,
            Transition::Fall => prev && !curr,
        }
    }
}

/// Discriminated fault kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// Weight-storage bit permanently forced to `forced`
    StuckAt {
        /// Row owning the faulty weight bit
        row: Row,
        /// Bit position within the row's weight vector
        bit: usize,
        /// Forced logic value (false = SA0, true = SA1)
        forced: bool,
    },

    /// Input lines `a` and `b` electrically coupled
    Bridge {
        /// First bridged input line (fixed 0 in the two-row array)
        a: usize,
        /// Second bridged input line (fixed 1)
        b: usize,
        /// Canonical bridging behavior
        variant: BridgeVariant,
    },

    /// Aggressor/victim bit-flip across rows, triggered by a weight-bit
    /// transition on the aggressor row
    Coupling {
        /// Row carrying the aggressor bit
        aggressor_row: Row,
        /// Aggressor bit position
        aggressor_bit: usize,
        /// Victim bit position on the opposite row
        victim_bit: usize,
        /// Transition that arms the fault
        transition: Transition,
        /// Aggressor row's previous weight vector
        prev: WeightVector,
        /// Aggressor row's current weight vector
        curr: WeightVector,
    },
}

impl FaultKind {
    /// Coarse kind name used for coverage bucketing
    pub fn kind_name(&self) -> &'static str {
        match self {
            FaultKind::StuckAt { .. } => "SAF",
            FaultKind::Bridge { .. } => "BRIDGE",
            FaultKind::Coupling { .. } => "COUPLING",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::StuckAt { row, bit, forced } => {
                write!(f, "SAF({} bit={} forced={})", row, bit, u8::from(*forced))
            }
            FaultKind::Bridge { a, b, variant } => {
                write!(f, "BRIDGE({}<->{} {})", a, b, variant.name())
            }
            FaultKind::Coupling {
                aggressor_row,
                aggressor_bit,
                victim_bit,
                transition,
                ..
            } => write!(
                f,
                "COUPLING({}[{}] {} -> {}[{}])",
                aggressor_row,
                aggressor_bit,
                transition.name(),
                aggressor_row.opposite(),
                victim_bit
            ),
        }
    }
}

/// Which stage flagged a fault, and with which stimuli
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectRecord {
    /// 1-based stage that first reported the detection
    pub stage: u32,
    /// Input patterns applied during that stage
    pub patterns: Vec<Pattern>,
}

/// A single test target with its per-run observation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// What defect this fault models
    pub kind: FaultKind,
    /// Whether some stage has flagged this fault; never reset within a run
    pub detected: bool,
    /// First detecting stage, if any
    pub detect_record: Option<DetectRecord>,
}

impl Fault {
    /// New undetected fault
    pub fn new(kind: FaultKind) -> Self {
        Self {
            kind,
            detected: false,
            detect_record: None,
        }
    }

    /// Record the first detection. Later calls are ignored: the earliest
    /// stage is authoritative.
    pub fn mark_detected(&mut self, stage: u32, patterns: Vec<Pattern>) {
        if self.detected {
            return;
        }
        self.detected = true;
        self.detect_record = Some(DetectRecord { stage, patterns });
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Enumerate the complete fault list for a run.
///
/// Order is fixed: for each row (R1 then R2), for each bit ascending, a
/// stuck-at-0 then a stuck-at-1 fault; afterwards one bridge fault on input
/// lines (0,1) per requested variant, in the given order. The list length
/// is `2 * 2 * bit_width + bridge_variants.len()`.
pub fn generate_fault_list(bit_width: usize, bridge_variants: &[BridgeVariant]) -> Vec<Fault> {
    let mut faults = Vec::with_capacity(4 * bit_width + bridge_variants.len());

    for row in Row::BOTH {
        for bit in 0..bit_width {
            for forced in [false, true] {
                faults.push(Fault::new(FaultKind::StuckAt { row, bit, forced }));
            }
        }
    }

    for &variant in bridge_variants {
        faults.push(Fault::new(FaultKind::Bridge { a: 0, b: 1, variant }));
    }

    faults
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_variant_from_index() {
        assert_eq!(
            BridgeVariant::from_index(0).unwrap(),
            BridgeVariant::WiredAnd
        );
        assert_eq!(
            BridgeVariant::from_index(7).unwrap(),
            BridgeVariant::BDominantOr
        );
        assert_eq!(
            BridgeVariant::from_index(8),
            Err(FaultModelError::UnknownBridgeVariant(8))
        );
    }

    #[test]
    fn test_bridge_variant_index_roundtrip() {
        for (i, v) in BridgeVariant::ALL.iter().enumerate() {
            assert_eq!(v.index() as usize, i);
            assert_eq!(BridgeVariant::from_index(i as u8).unwrap(), *v);
        }
    }

    #[test]
    fn test_bridge_truth_table() {
        let cases = [
            // (variant, a, b, expected a', expected b')
            (BridgeVariant::WiredAnd, true, false, false, false),
            (BridgeVariant::WiredAnd, true, true, true, true),
            (BridgeVariant::WiredOr, true, false, true, true),
            (BridgeVariant::WiredOr, false, false, false, false),
            (BridgeVariant::ADominant, true, false, true, true),
            (BridgeVariant::ADominant, false, true, false, false),
            (BridgeVariant::ADominantAnd, true, false, true, false),
            (BridgeVariant::BDominant, false, true, true, true),
            (BridgeVariant::BDominantAnd, true, false, false, false),
            (BridgeVariant::ADominantOr, true, false, true, true),
            (BridgeVariant::ADominantOr, false, true, false, true),
            (BridgeVariant::BDominantOr, true, false, true, false),
        ];
        for (variant, a, b, ea, eb) in cases {
            assert_eq!(variant.apply(a, b), (ea, eb), "{} ({},{})", variant.name(), a, b);
        }
    }

    #[test]
    fn test_transition_matching() {
        assert!(Transition::Rise.matches(false, true));
        assert!(!Transition::Rise.matches(true, true));
        assert!(Transition::Fall.matches(true, false));
        assert!(!Transition::Fall.matches(false, false));
    }

    #[test]
    fn test_fault_list_order_and_size() {
        let faults = generate_fault_list(3, &BridgeVariant::ALL);
        assert_eq!(faults.len(), 2 * 2 * 3 + 8);

        // Row-major, bit-major, forced 0 before 1
        assert_eq!(
            faults[0].kind,
            FaultKind::StuckAt {
                row: Row::R1,
                bit: 0,
                forced: false
            }
        );
        assert_eq!(
            faults[1].kind,
            FaultKind::StuckAt {
                row: Row::R1,
                bit: 0,
                forced: true
            }
        );
        assert_eq!(
            faults[5].kind,
            FaultKind::StuckAt {
                row: Row::R1,
                bit: 2,
                forced: true
            }
        );
        assert_eq!(
            faults[6].kind,
            FaultKind::StuckAt {
                row: Row::R2,
                bit: 0,
                forced: false
            }
        );
        // Bridges follow in variant order on lines (0,1)
        assert_eq!(
            faults[12].kind,
            FaultKind::Bridge {
                a: 0,
                b: 1,
                variant: BridgeVariant::WiredAnd
            }
        );
    }

    #[test]
    fn test_mark_detected_first_stage_wins() {
        let mut fault = Fault::new(FaultKind::StuckAt {
            row: Row::R1,
            bit: 0,
            forced: true,
        });
        fault.mark_detected(1, vec![Pattern::new(true, false)]);
        fault.mark_detected(5, Pattern::sweep());

        assert!(fault.detected);
        let record = fault.detect_record.as_ref().unwrap();
        assert_eq!(record.stage, 1);
        assert_eq!(record.patterns, vec![Pattern::new(true, false)]);
    }
}
