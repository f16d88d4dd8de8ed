//! The test engine: fault enumeration and the stage-driven campaign loop
//!
//! The engine owns the fault list and its observation fields; the
//! algorithm owns the protocol. Per fault, stages run in ascending order
//! and stop at the first detection, so a found fault never pays for the
//! remaining stages.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use macdft_algos::{AlgorithmError, DetectionAlgorithm};
use macdft_faults::{
    generate_fault_list, inject, BridgeVariant, Fault, FaultModelError, Row, MAX_BIT_WIDTH,
};

use crate::coverage::{calculate_fault_coverage, CoverageSummary};
use crate::mac::output_sum;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a campaign
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Fault-model configuration defect
    #[error(transparent)]
    Model(#[from] FaultModelError),

    /// Algorithm protocol defect
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}

/// Campaign parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Width of each row's weight vector
    pub bit_width: usize,
    /// Bridge variants to enumerate, in fault-list order
    pub bridge_variants: Vec<BridgeVariant>,
}

impl EngineConfig {
    /// Validated configuration
    pub fn new(bit_width: usize, bridge_variants: Vec<BridgeVariant>) -> Result<Self> {
        if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
            return Err(FaultModelError::InvalidBitWidth(bit_width).into());
        }
        Ok(Self {
            bit_width,
            bridge_variants,
        })
    }

    /// Configuration with all eight bridge variants enabled
    pub fn with_all_bridges(bit_width: usize) -> Result<Self> {
        Self::new(bit_width, BridgeVariant::ALL.to_vec())
    }
}

/// Everything a finished campaign produced
#[derive(Debug, Clone, Serialize)]
pub struct CampaignResults {
    /// Name of the algorithm that ran
    pub algorithm: String,
    /// Weight bit width the campaign used
    pub bit_width: usize,
    /// The fault list with final observation state
    pub faults: Vec<Fault>,
    /// Aggregated coverage
    pub coverage: CoverageSummary,
    /// The algorithm's own per-class detection tallies (informational;
    /// derivable from the fault list and expected to agree with it)
    pub counters: IndexMap<&'static str, usize>,
}

/// Orchestrates a fault campaign against one detection algorithm
#[derive(Debug, Clone)]
pub struct TestEngine {
    config: EngineConfig,
}

impl TestEngine {
    /// Engine for a validated configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full campaign: enumerate faults, drive each one through the
    /// algorithm's stages, record first detections, and summarize.
    pub fn run(&self, algo: &mut dyn DetectionAlgorithm) -> Result<CampaignResults> {
        let mut faults =
            generate_fault_list(self.config.bit_width, &self.config.bridge_variants);
        let total_stages = algo.required_stages();

        info!(
            algorithm = algo.name(),
            bit_width = self.config.bit_width,
            faults = faults.len(),
            stages = total_stages,
            "starting fault campaign"
        );

        for fault in faults.iter_mut() {
            self.evaluate_fault(fault, algo, total_stages)?;
            if fault.detected {
                debug!(fault = %fault, "detected");
            } else {
                debug!(fault = %fault, "undetected");
            }
        }

        let coverage = calculate_fault_coverage(&faults);
        info!(
            detected = coverage.detected_faults,
            total = coverage.total_faults,
            "campaign finished"
        );

        Ok(CampaignResults {
            algorithm: algo.name().to_string(),
            bit_width: self.config.bit_width,
            faults,
            coverage,
            counters: algo.counters().clone(),
        })
    }

    /// Drive one fault through the stage sequence, stopping at the first
    /// stage that distinguishes it from fault-free behavior.
    fn evaluate_fault(
        &self,
        fault: &mut Fault,
        algo: &mut dyn DetectionAlgorithm,
        total_stages: u32,
    ) -> Result<()> {
        for stage in 1..=total_stages {
            let patterns = algo.stage_patterns(stage)?;
            let (weights1_nom, weights2_nom) = algo.stage_weights(stage)?;

            let mut outputs = Vec::with_capacity(patterns.len());
            for pattern in &patterns {
                // Each row sees its own injected view of the stimulus.
                let (in1, weights1) = inject(pattern, &weights1_nom, fault, Row::R1);
                let (in2, weights2) = inject(pattern, &weights2_nom, fault, Row::R2);
                outputs.push(output_sum(in1.r1, &weights1, in2.r2, &weights2));
            }

            let result = algo.observe(stage, &patterns, &outputs)?;
            if result.detected {
                fault.mark_detected(stage, patterns);
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macdft_algos::FiveStageAlgorithm;

    #[test]
    fn test_bit_width_validation() {
        assert_eq!(
            EngineConfig::new(0, vec![]),
            Err(EngineError::Model(FaultModelError::InvalidBitWidth(0)))
        );
        assert!(EngineConfig::new(64, vec![]).is_err());
        assert!(EngineConfig::new(1, vec![]).is_ok());
        assert!(EngineConfig::new(63, vec![]).is_ok());
    }

    #[test]
    fn test_fault_list_size_matches_config() {
        let config = EngineConfig::with_all_bridges(4).unwrap();
        let engine = TestEngine::new(config);
        let mut algo = FiveStageAlgorithm::new(4);
        let results = engine.run(&mut algo).unwrap();
        assert_eq!(results.faults.len(), 2 * 2 * 4 + 8);
        assert_eq!(results.bit_width, 4);
        assert_eq!(results.algorithm, "five_stage");
    }
}
