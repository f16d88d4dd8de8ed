//! Campaign report formatting and output
//!
//! Human-readable coverage summaries for the terminal plus JSON export of
//! the complete campaign results for downstream tooling.

use crate::engine::CampaignResults;

/// Print the coverage summary to stdout
pub fn print_summary(results: &CampaignResults) {
    let coverage = &results.coverage;

    println!();
    println!(
        "Fault Coverage Report ({}, bit_width={})",
        results.algorithm, results.bit_width
    );
    println!("{}", "=".repeat(60));
    println!();
    println!(
        "  Total:    {:6.2}%  ({}/{} faults)",
        coverage.total * 100.0,
        coverage.detected_faults,
        coverage.total_faults
    );
    for (kind, metrics) in &coverage.per_kind {
        println!(
            "  {:<8}  {:6.2}%  ({}/{} faults)",
            format!("{kind}:"),
            metrics.ratio * 100.0,
            metrics.detected,
            metrics.total
        );
    }

    println!();
    println!("Detected fault classes:");
    for (label, count) in &results.counters {
        println!("  {label:<10} {count}");
    }
}

/// Print the per-fault outcomes (one line per fault)
pub fn print_fault_outcomes(results: &CampaignResults) {
    println!();
    println!("Fault outcomes:");
    for fault in &results.faults {
        match &fault.detect_record {
            Some(record) => {
                println!("  detected   {:<36} stage {}", fault.to_string(), record.stage)
            }
            None => println!("  undetected {fault}"),
        }
    }
}

/// Serialize the full campaign results as pretty-printed JSON
pub fn to_json(results: &CampaignResults) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}
