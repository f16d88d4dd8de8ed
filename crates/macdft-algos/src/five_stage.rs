//! Five-stage directed detection procedure
//!
//! Stage plan:
//!
//! 1. SA1 probe on row 1 (pattern `[1,0]`, all-zero weights)
//! 2. SA1 probe on row 2 (pattern `[0,1]`, all-zero weights)
//! 3. SA0 probe on row 1 (pattern `[1,0]`, all-one weights)
//! 4. SA0 probe on row 2 (pattern `[0,1]`, all-one weights)
//! 5. Bridging sweep over all four input pairs with distinguishing
//!    weights: row 1 carries all-ones with bit 0 cleared, row 2 all-ones
//!    with its top bit cleared
//!
//! Stage 5 classification is table-driven: the observed 4-tuple of sums is
//! matched against nine signatures built from the two stage-5 row values.
//! The signatures depend on those values, so the table is constructed per
//! instance from the configured bit width, never from width-specific
//! literals.

use indexmap::IndexMap;
use tracing::debug;

use macdft_faults::{Pattern, WeightVector};

use crate::analysis::{analyze_sa0, analyze_sa1};
use crate::patterns;
use crate::stage::{
    AlgorithmError, Classification, DetectionAlgorithm, FaultClass, Result,
};

/// Lookup from a swept output 4-tuple to its bridging classification.
///
/// `None` marks the fault-free signature. Lookup is first-match-wins in
/// table order, which keeps degenerate widths (where row values collide)
/// deterministic.
#[derive(Debug, Clone)]
struct SignatureTable {
    entries: Vec<([u64; 4], Option<FaultClass>)>,
}

impl SignatureTable {
    fn new(r1: u64, r2: u64) -> Self {
        let both = r1 + r2;
        Self {
            entries: vec![
                ([0, r2, r1, both], None),
                ([0, 0, 0, both], Some(FaultClass::WiredAnd)),
                ([0, both, both, both], Some(FaultClass::WiredAnd)),
                ([0, 0, both, both], Some(FaultClass::R1DominantR2)),
                ([0, 0, r1, both], Some(FaultClass::R1DomAndR2)),
                ([0, both, 0, both], Some(FaultClass::R2DominantR1)),
                ([0, r2, 0, both], Some(FaultClass::R2DomAndR1)),
                ([0, r2, both, both], Some(FaultClass::R1DomOrR2)),
                ([0, both, r1, both], Some(FaultClass::R1DomOrR2)),
            ],
        }
    }

    fn lookup(&self, signature: &[u64; 4]) -> Option<Option<FaultClass>> {
        self.entries
            .iter()
            .find(|(key, _)| key == signature)
            .map(|(_, class)| *class)
    }
}

/// The five-stage procedure: four stuck-at probes plus a bridging sweep
#[derive(Debug, Clone)]
pub struct FiveStageAlgorithm {
    bit_width: usize,
    all_zero: WeightVector,
    all_one: WeightVector,
    bridge_r1: WeightVector,
    bridge_r2: WeightVector,
    signatures: SignatureTable,
    counters: IndexMap<&'static str, usize>,
}

impl FiveStageAlgorithm {
    pub const NAME: &'static str = "five_stage";

    /// Build the procedure for the given weight bit width
    pub fn new(bit_width: usize) -> Self {
        let bridge_r1 = {
            let mut w = WeightVector::all_one(bit_width);
            w.set_bit(0, false);
            w
        };
        let bridge_r2 = patterns::msb_cleared(bit_width);
        let signatures = SignatureTable::new(bridge_r1.value(), bridge_r2.value());

        let mut counters = IndexMap::new();
        for label in ["SA1", "SA0", "BRIDGE", "UNKNOWN"] {
            counters.insert(label, 0);
        }

        Self {
            bit_width,
            all_zero: WeightVector::all_zero(bit_width),
            all_one: WeightVector::all_one(bit_width),
            bridge_r1,
            bridge_r2,
            signatures,
            counters,
        }
    }

    /// Configured weight bit width
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Fault-free sum for the all-one SA0 probes
    fn sa0_expected(&self) -> u64 {
        self.all_one.value()
    }

    fn analyze_bridging(&self, outputs: &[u64]) -> Classification {
        // The sweep is exactly four patterns; anything else means the
        // caller mangled the protocol. Diagnosed, not crashed.
        let [s00, s01, s10, s11] = match outputs {
            [a, b, c, d] => [*a, *b, *c, *d],
            _ => {
                return Classification::no_fault(format!(
                    "stage 5: expected 4 outputs, got {}",
                    outputs.len()
                ))
            }
        };
        let signature = [s00, s01, s10, s11];

        match self.signatures.lookup(&signature) {
            Some(None) => Classification::no_fault("stage 5: no bridging fault"),
            Some(Some(class)) => Classification::fault(
                class,
                "R1-R2",
                format!("stage 5: {}", class.name()),
            ),
            // An unrecognized deviation is still a defect; flag it rather
            // than silently dropping it.
            None => Classification::fault(
                FaultClass::UnknownBridging,
                "R1-R2",
                format!("stage 5: unrecognized signature {signature:?}"),
            ),
        }
    }

    fn analyze_stage(
        &self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification> {
        match stage {
            1 | 2 | 3 | 4 => {
                let (Some(pattern), Some(&sum)) = (patterns.first(), outputs.first()) else {
                    return Ok(Classification::no_fault(format!(
                        "stage {stage}: expected 1 output, got {}",
                        outputs.len()
                    )));
                };
                Ok(match stage {
                    1 | 2 => analyze_sa1(stage, pattern, sum),
                    _ => analyze_sa0(stage, pattern, sum, self.sa0_expected()),
                })
            }
            5 => Ok(self.analyze_bridging(outputs)),
            _ => Err(AlgorithmError::UnknownStage {
                algorithm: Self::NAME,
                stage,
            }),
        }
    }
}

impl DetectionAlgorithm for FiveStageAlgorithm {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_stages(&self) -> u32 {
        5
    }

    fn stage_patterns(&self, stage: u32) -> Result<Vec<Pattern>> {
        match stage {
            1 | 3 => Ok(vec![Pattern::new(true, false)]),
            2 | 4 => Ok(vec![Pattern::new(false, true)]),
            5 => Ok(Pattern::sweep()),
            _ => Err(AlgorithmError::UnknownStage {
                algorithm: Self::NAME,
                stage,
            }),
        }
    }

    fn stage_weights(&self, stage: u32) -> Result<(WeightVector, WeightVector)> {
        match stage {
            1 | 2 => Ok((self.all_zero.clone(), self.all_zero.clone())),
            3 | 4 => Ok((self.all_one.clone(), self.all_one.clone())),
            5 => Ok((self.bridge_r1.clone(), self.bridge_r2.clone())),
            _ => Err(AlgorithmError::UnknownStage {
                algorithm: Self::NAME,
                stage,
            }),
        }
    }

    fn observe(
        &mut self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification> {
        let result = self.analyze_stage(stage, patterns, outputs)?;

        if result.detected {
            if let Some(class) = result.class {
                *self.counters.entry(class.counter_label()).or_insert(0) += 1;
                debug!(
                    stage,
                    class = class.name(),
                    reason = %result.reason,
                    "stage flagged a fault"
                );
            }
        }

        Ok(result)
    }

    fn counters(&self) -> &IndexMap<&'static str, usize> {
        &self.counters
    }
}
