//! Single-shot comparator detectors
//!
//! Each of these needs exactly one stimulus and one direct numeric
//! comparison against the fault-free sum, so they are all one-stage
//! algorithms under the same protocol the staged procedures use. They are
//! cheap screens, not diagnostic procedures: a deviation is flagged with a
//! coarse stuck-at/bridge label and no bit location.

use indexmap::IndexMap;

use macdft_faults::{Pattern, WeightVector};

use crate::stage::{
    AlgorithmError, Classification, DetectionAlgorithm, FaultClass, Result,
};

/// Fault-free output for a stimulus against nominal weights
fn expected_sum(pattern: &Pattern, w1: &WeightVector, w2: &WeightVector) -> u64 {
    u64::from(pattern.r1) * w1.value() + u64::from(pattern.r2) * w2.value()
}

/// Coarse label from the original comparator heuristic: a deviation under
/// an asymmetric stimulus is blamed on the input wiring, a symmetric one
/// on weight storage.
fn coarse_label(pattern: &Pattern) -> FaultClass {
    if pattern.r1 != pattern.r2 {
        FaultClass::Bridge
    } else {
        FaultClass::StuckAt
    }
}

fn comparator_counters() -> IndexMap<&'static str, usize> {
    let mut counters = IndexMap::new();
    for label in ["SAF", "BRIDGE", "UNKNOWN"] {
        counters.insert(label, 0);
    }
    counters
}

fn count_detection(counters: &mut IndexMap<&'static str, usize>, class: FaultClass) {
    let label = match class {
        FaultClass::StuckAt => "SAF",
        FaultClass::Bridge => "BRIDGE",
        _ => "UNKNOWN",
    };
    *counters.entry(label).or_insert(0) += 1;
}

fn check_single_stage(name: &'static str, stage: u32) -> Result<()> {
    if stage == 1 {
        Ok(())
    } else {
        Err(AlgorithmError::UnknownStage {
            algorithm: name,
            stage,
        })
    }
}

/// Flags any deviation of the observed sum from the fault-free sum, and
/// splits the label on the deviation magnitude: more than half a row's
/// full value looks like an input-pair defect, less like a stuck bit.
#[derive(Debug, Clone)]
pub struct WeightedSumDetector {
    all_one: WeightVector,
    counters: IndexMap<&'static str, usize>,
}

impl WeightedSumDetector {
    pub const NAME: &'static str = "weighted_sum";

    pub fn new(bit_width: usize) -> Self {
        Self {
            all_one: WeightVector::all_one(bit_width),
            counters: comparator_counters(),
        }
    }
}

impl DetectionAlgorithm for WeightedSumDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_stages(&self) -> u32 {
        1
    }

    fn stage_patterns(&self, stage: u32) -> Result<Vec<Pattern>> {
        check_single_stage(Self::NAME, stage)?;
        Ok(vec![Pattern::new(true, true)])
    }

    fn stage_weights(&self, stage: u32) -> Result<(WeightVector, WeightVector)> {
        check_single_stage(Self::NAME, stage)?;
        Ok((self.all_one.clone(), self.all_one.clone()))
    }

    fn observe(
        &mut self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification> {
        check_single_stage(Self::NAME, stage)?;
        let (Some(pattern), Some(&observed)) = (patterns.first(), outputs.first()) else {
            return Ok(Classification::no_fault("expected 1 output"));
        };

        let expected = expected_sum(pattern, &self.all_one, &self.all_one);
        if observed == expected {
            return Ok(Classification::no_fault("no sum mismatch"));
        }

        let diff = observed as i64 - expected as i64;
        let class = if diff.unsigned_abs() > self.all_one.value() / 2 {
            FaultClass::Bridge
        } else {
            FaultClass::StuckAt
        };
        count_detection(&mut self.counters, class);
        Ok(Classification::fault(
            class,
            format!("sum_diff={diff}"),
            format!("expected {expected}, got {observed}"),
        ))
    }

    fn counters(&self) -> &IndexMap<&'static str, usize> {
        &self.counters
    }
}

/// Compares the parity of the observed sum against the parity of the
/// fault-free sum. Blind to even deviations, so coverage is weak; it is
/// the cheapest possible check.
#[derive(Debug, Clone)]
pub struct ParityDetector {
    all_one: WeightVector,
    counters: IndexMap<&'static str, usize>,
}

impl ParityDetector {
    pub const NAME: &'static str = "parity";

    pub fn new(bit_width: usize) -> Self {
        Self {
            all_one: WeightVector::all_one(bit_width),
            counters: comparator_counters(),
        }
    }
}

impl DetectionAlgorithm for ParityDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_stages(&self) -> u32 {
        1
    }

    fn stage_patterns(&self, stage: u32) -> Result<Vec<Pattern>> {
        check_single_stage(Self::NAME, stage)?;
        Ok(vec![Pattern::new(true, true)])
    }

    fn stage_weights(&self, stage: u32) -> Result<(WeightVector, WeightVector)> {
        check_single_stage(Self::NAME, stage)?;
        Ok((self.all_one.clone(), self.all_one.clone()))
    }

    fn observe(
        &mut self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification> {
        check_single_stage(Self::NAME, stage)?;
        let (Some(pattern), Some(&observed)) = (patterns.first(), outputs.first()) else {
            return Ok(Classification::no_fault("expected 1 output"));
        };

        let expected = expected_sum(pattern, &self.all_one, &self.all_one);
        if observed % 2 == expected % 2 {
            return Ok(Classification::no_fault("parity consistent"));
        }

        let class = coarse_label(pattern);
        count_detection(&mut self.counters, class);
        Ok(Classification::fault(
            class,
            "unknown",
            format!(
                "parity mismatch: expected {}, got {}",
                expected % 2,
                observed % 2
            ),
        ))
    }

    fn counters(&self) -> &IndexMap<&'static str, usize> {
        &self.counters
    }
}

/// Bitwise-compares the observed and fault-free sums and flags the fault
/// only when more than half the weight-bit positions disagree.
#[derive(Debug, Clone)]
pub struct MajorityDetector {
    bit_width: usize,
    all_one: WeightVector,
    counters: IndexMap<&'static str, usize>,
}

impl MajorityDetector {
    pub const NAME: &'static str = "majority";

    pub fn new(bit_width: usize) -> Self {
        Self {
            bit_width,
            all_one: WeightVector::all_one(bit_width),
            counters: comparator_counters(),
        }
    }
}

impl DetectionAlgorithm for MajorityDetector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn required_stages(&self) -> u32 {
        1
    }

    fn stage_patterns(&self, stage: u32) -> Result<Vec<Pattern>> {
        check_single_stage(Self::NAME, stage)?;
        Ok(vec![Pattern::new(true, true)])
    }

    fn stage_weights(&self, stage: u32) -> Result<(WeightVector, WeightVector)> {
        check_single_stage(Self::NAME, stage)?;
        Ok((self.all_one.clone(), self.all_one.clone()))
    }

    fn observe(
        &mut self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification> {
        check_single_stage(Self::NAME, stage)?;
        let (Some(pattern), Some(&observed)) = (patterns.first(), outputs.first()) else {
            return Ok(Classification::no_fault("expected 1 output"));
        };

        let expected = expected_sum(pattern, &self.all_one, &self.all_one);
        let mismatches = (expected ^ observed).count_ones() as usize;
        if mismatches <= self.bit_width / 2 {
            return Ok(Classification::no_fault("majority consistent"));
        }

        let class = coarse_label(pattern);
        count_detection(&mut self.counters, class);
        Ok(Classification::fault(
            class,
            format!("{mismatches} bits disagree"),
            "majority mismatch condition",
        ))
    }

    fn counters(&self) -> &IndexMap<&'static str, usize> {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum_fault_free() {
        let mut algo = WeightedSumDetector::new(4);
        let patterns = algo.stage_patterns(1).unwrap();
        // Both rows active against all-one weights: 15 + 15
        let result = algo.observe(1, &patterns, &[30]).unwrap();
        assert!(!result.detected);
    }

    #[test]
    fn test_weighted_sum_labels_by_magnitude() {
        let mut algo = WeightedSumDetector::new(4);
        let patterns = algo.stage_patterns(1).unwrap();

        // Small deviation: stuck-bit territory
        let result = algo.observe(1, &patterns, &[30 - 4]).unwrap();
        assert_eq!(result.class, Some(FaultClass::StuckAt));

        // Large deviation: input-pair territory
        let result = algo.observe(1, &patterns, &[30 - 15]).unwrap();
        assert_eq!(result.class, Some(FaultClass::Bridge));

        assert_eq!(algo.counters()["SAF"], 1);
        assert_eq!(algo.counters()["BRIDGE"], 1);
    }

    #[test]
    fn test_parity_detects_odd_deviation_only() {
        let mut algo = ParityDetector::new(4);
        let patterns = algo.stage_patterns(1).unwrap();

        let result = algo.observe(1, &patterns, &[30]).unwrap();
        assert!(!result.detected);

        // Even deviation slips through
        let result = algo.observe(1, &patterns, &[30 - 8]).unwrap();
        assert!(!result.detected);

        // Odd deviation is caught
        let result = algo.observe(1, &patterns, &[30 - 1]).unwrap();
        assert!(result.detected);
    }

    #[test]
    fn test_majority_threshold() {
        let mut algo = MajorityDetector::new(4);
        let patterns = algo.stage_patterns(1).unwrap();

        // 30 ^ 29 = 3: two bits disagree, not a majority of 4
        let result = algo.observe(1, &patterns, &[29]).unwrap();
        assert!(!result.detected);

        // 30 ^ 17 = 15: four bits disagree
        let result = algo.observe(1, &patterns, &[17]).unwrap();
        assert!(result.detected);
        assert_eq!(result.class, Some(FaultClass::StuckAt));
    }

    #[test]
    fn test_single_stage_only() {
        let algo = WeightedSumDetector::new(4);
        assert!(algo.stage_patterns(2).is_err());
        let algo = ParityDetector::new(4);
        assert!(algo.stage_weights(0).is_err());
        let mut algo = MajorityDetector::new(4);
        assert!(algo.observe(3, &[], &[]).is_err());
    }
}
