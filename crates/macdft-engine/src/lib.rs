//! Test engine, MAC hardware model, and fault coverage calculation
//!
//! This crate ties the workspace together: it enumerates the fault list,
//! drives each fault through the selected detection algorithm's stage
//! sequence via the injector and the two-row MAC model, records first
//! detections, and aggregates the outcomes into coverage ratios.
//!
//! Evaluation is single-threaded and synchronous; every step is a bounded
//! bit computation. Faults are mutually independent (only the algorithm's
//! counters are shared), so the per-fault loop has no ordering dependency
//! beyond the deterministic output order of the fault list itself.

pub mod coverage;
pub mod engine;
pub mod mac;
pub mod report;

pub use coverage::{calculate_fault_coverage, CoverageSummary, KindCoverage};
pub use engine::{CampaignResults, EngineConfig, EngineError, Result, TestEngine};
pub use mac::output_sum;
