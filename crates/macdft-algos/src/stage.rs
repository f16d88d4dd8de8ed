//! The stage protocol: the capability surface every detection algorithm
//! exposes to the test engine
//!
//! Stages are numbered from 1. Per stage the algorithm supplies the input
//! patterns and the nominal weight vectors, then classifies the fault from
//! the observed output sums alone. Detection state for a run lives in the
//! engine; the algorithm only keeps per-class tallies of what it flagged.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use macdft_faults::{Pattern, WeightVector};

/// Result type for algorithm operations
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Errors raised by detection algorithms
///
/// Every variant is a configuration defect on the caller's side; the run
/// aborts rather than retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// Stage id outside the algorithm's `1..=required_stages()` range
    #[error("unknown stage {stage} for algorithm '{algorithm}'")]
    UnknownStage {
        /// Algorithm that rejected the stage id
        algorithm: &'static str,
        /// The offending stage id
        stage: u32,
    },

    /// Weight-pattern group name not in the registry
    #[error("unknown weight pattern group '{0}'")]
    UnknownPatternGroup(String),
}

/// Closed set of fault-class labels an algorithm can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FaultClass {
    /// Single weight bit stuck at 1
    Sa1,
    /// Single weight bit stuck at 0
    Sa0,
    /// Input pair behaves as wired-AND (or its wired-OR mirror signature)
    WiredAnd,
    /// Row 1's line drives both rows
    R1DominantR2,
    /// Row 1 dominant, row 2 sees the AND
    R1DomAndR2,
    /// Row 2's line drives both rows
    R2DominantR1,
    /// Row 2 dominant, row 1 sees the AND
    R2DomAndR1,
    /// Dominant-OR behavior (two signatures fold into this label)
    R1DomOrR2,
    /// Output sweep deviates but matches no known bridging signature
    UnknownBridging,
    /// Generic stuck-at label from the single-shot comparators
    StuckAt,
    /// Generic bridge label from the single-shot comparators
    Bridge,
}

impl FaultClass {
    /// Report label for this class
    pub fn name(&self) -> &'static str {
        match self {
            FaultClass::Sa1 => "SA1",
            FaultClass::Sa0 => "SA0",
            FaultClass::WiredAnd => "WIRED_AND",
            FaultClass::R1DominantR2 => "R1_DOMINANT_R2",
            FaultClass::R1DomAndR2 => "R1_DOM_AND_R2",
            FaultClass::R2DominantR1 => "R2_DOMINANT_R1",
            FaultClass::R2DomAndR1 => "R2_DOM_AND_R1",
            FaultClass::R1DomOrR2 => "R1_DOM_OR_R2",
            FaultClass::UnknownBridging => "UNKNOWN_BRIDGING",
            FaultClass::StuckAt => "SAF",
            FaultClass::Bridge => "BRIDGE",
        }
    }

    /// Counter bucket used by the staged algorithms: SA1 and SA0 keep their
    /// own tallies, the named bridging subtypes share "BRIDGE", and
    /// everything else (including an unrecognized bridging signature) lands
    /// in "UNKNOWN".
    pub fn counter_label(&self) -> &'static str {
        match self {
            FaultClass::Sa1 => "SA1",
            FaultClass::Sa0 => "SA0",
            FaultClass::WiredAnd
            | FaultClass::R1DominantR2
            | FaultClass::R1DomAndR2
            | FaultClass::R2DominantR1
            | FaultClass::R2DomAndR1
            | FaultClass::R1DomOrR2 => "BRIDGE",
            _ => "UNKNOWN",
        }
    }
}

/// Outcome of observing one stage's output sums
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether this stage distinguishes the behavior from fault-free
    pub detected: bool,
    /// Reported class when detected
    pub class: Option<FaultClass>,
    /// Human-readable location (row / bit / line pair) when detected
    pub location: Option<String>,
    /// Free-text diagnostic; never used for control decisions
    pub reason: String,
}

impl Classification {
    /// A no-detection outcome with a diagnostic reason
    pub fn no_fault(reason: impl Into<String>) -> Self {
        Self {
            detected: false,
            class: None,
            location: None,
            reason: reason.into(),
        }
    }

    /// A positive detection
    pub fn fault(class: FaultClass, location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            detected: true,
            class: Some(class),
            location: Some(location.into()),
            reason: reason.into(),
        }
    }
}

/// Capability interface between the test engine and a detection procedure
///
/// The engine iterates stages `1..=required_stages()` in order, applies the
/// stimuli this trait hands out, and feeds the observed sums back through
/// [`observe`](DetectionAlgorithm::observe). The algorithm decides
/// everything about the protocol; the engine decides nothing.
pub trait DetectionAlgorithm {
    /// Stable algorithm name for reports
    fn name(&self) -> &'static str;

    /// Total number of stages in this procedure
    fn required_stages(&self) -> u32;

    /// Input patterns applied during `stage`, in fixed order
    fn stage_patterns(&self, stage: u32) -> Result<Vec<Pattern>>;

    /// Nominal (fault-free) weight vectors for rows 1 and 2 during `stage`
    fn stage_weights(&self, stage: u32) -> Result<(WeightVector, WeightVector)>;

    /// Classify a fault from the output sums observed for `patterns`
    /// during `stage`, updating the per-class counters on a detection
    fn observe(
        &mut self,
        stage: u32,
        patterns: &[Pattern],
        outputs: &[u64],
    ) -> Result<Classification>;

    /// Per-class detection tallies for this run
    fn counters(&self) -> &IndexMap<&'static str, usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_labels() {
        assert_eq!(FaultClass::Sa1.counter_label(), "SA1");
        assert_eq!(FaultClass::Sa0.counter_label(), "SA0");
        assert_eq!(FaultClass::WiredAnd.counter_label(), "BRIDGE");
        assert_eq!(FaultClass::R2DomAndR1.counter_label(), "BRIDGE");
        // Unrecognized bridging signatures count as UNKNOWN, not BRIDGE
        assert_eq!(FaultClass::UnknownBridging.counter_label(), "UNKNOWN");
    }

    #[test]
    fn test_classification_constructors() {
        let ok = Classification::no_fault("stage 1: sum=0");
        assert!(!ok.detected);
        assert!(ok.class.is_none());

        let hit = Classification::fault(FaultClass::Sa1, "R1 weight[3]", "sum=8 = 2^3");
        assert!(hit.detected);
        assert_eq!(hit.class, Some(FaultClass::Sa1));
        assert_eq!(hit.location.as_deref(), Some("R1 weight[3]"));
    }
}
