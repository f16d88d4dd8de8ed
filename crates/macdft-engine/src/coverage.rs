//! Fault coverage aggregation
//!
//! Pure read-only summarization of a completed fault list: the overall
//! detected/total ratio and one ratio per fault kind present. Empty lists
//! and absent kinds yield 0 without ever dividing by zero.

use indexmap::IndexMap;
use serde::Serialize;

use macdft_faults::Fault;

/// Detection counts and ratio for one fault kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KindCoverage {
    /// Faults of this kind in the list
    pub total: usize,
    /// Detected faults of this kind
    pub detected: usize,
    /// detected / total, or 0.0 when the kind has no faults
    pub ratio: f64,
}

impl KindCoverage {
    fn finish(mut self) -> Self {
        self.ratio = if self.total > 0 {
            self.detected as f64 / self.total as f64
        } else {
            0.0
        };
        self
    }
}

/// Aggregate coverage over a completed fault list
#[derive(Debug, Clone, Serialize)]
pub struct CoverageSummary {
    /// All faults in the list
    pub total_faults: usize,
    /// Faults some stage flagged
    pub detected_faults: usize,
    /// detected / total, or 0.0 for an empty list
    pub total: f64,
    /// Per-kind breakdown, keyed by kind name, in first-seen order
    pub per_kind: IndexMap<&'static str, KindCoverage>,
}

impl CoverageSummary {
    /// Ratio for a fault kind; 0.0 when the kind is absent from the list
    pub fn kind_ratio(&self, kind: &str) -> f64 {
        self.per_kind.get(kind).map_or(0.0, |k| k.ratio)
    }
}

/// Compute the coverage summary. Does not mutate the fault list.
pub fn calculate_fault_coverage(faults: &[Fault]) -> CoverageSummary {
    let total_faults = faults.len();
    let detected_faults = faults.iter().filter(|f| f.detected).count();
    let total = if total_faults > 0 {
        detected_faults as f64 / total_faults as f64
    } else {
        0.0
    };

    let mut per_kind: IndexMap<&'static str, KindCoverage> = IndexMap::new();
    for fault in faults {
        let entry = per_kind.entry(fault.kind.kind_name()).or_default();
        entry.total += 1;
        if fault.detected {
            entry.detected += 1;
        }
    }
    for entry in per_kind.values_mut() {
        *entry = entry.finish();
    }

    CoverageSummary {
        total_faults,
        detected_faults,
        total,
        per_kind,
    }
}
