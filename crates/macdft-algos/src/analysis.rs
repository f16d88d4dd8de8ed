//! Shared stuck-at signature analysis for the staged algorithms
//!
//! Both probes rely on the positional weighting of the rows: against
//! all-zero weights a single stuck-at-1 bit shows up as a sum that is
//! exactly one power of two, and against all-one weights a single
//! stuck-at-0 bit removes exactly one power of two from the fault-free
//! total. The bit index falls out of the deviation's log2.

use macdft_faults::Pattern;

use crate::stage::{Classification, FaultClass};

/// Row name implied by which input line the probe pattern drives
pub(crate) fn active_row(pattern: &Pattern) -> &'static str {
    match (pattern.r1, pattern.r2) {
        (true, false) => "R1",
        (false, true) => "R2",
        _ => "R?",
    }
}

/// SA1 probe analysis: nominal weights are all-zero, so the fault-free sum
/// is 0 and a single stuck-at-1 bit at position k yields exactly 2^k.
pub(crate) fn analyze_sa1(stage: u32, pattern: &Pattern, sum: u64) -> Classification {
    if sum == 0 {
        return Classification::no_fault(format!("stage {stage}: fault-free (sum=0)"));
    }

    if !sum.is_power_of_two() {
        // Known detection gap: a multi-bit-equivalent deviation is left
        // unclassified here rather than flagged as a distinct fault class.
        return Classification::no_fault(format!(
            "stage {stage}: sum={sum} is not a single stuck bit (non power of two)"
        ));
    }

    let bit = sum.trailing_zeros();
    let row = active_row(pattern);
    Classification::fault(
        FaultClass::Sa1,
        format!("{row} weight[{bit}]"),
        format!("stage {stage}: sum={sum} = 2^{bit}"),
    )
}

/// SA0 probe analysis: nominal weights are all-one, so the fault-free sum
/// is `expected = 2^bit_width - 1` and a single stuck-at-0 bit at position
/// k yields `expected - 2^k`.
pub(crate) fn analyze_sa0(
    stage: u32,
    pattern: &Pattern,
    observed: u64,
    expected: u64,
) -> Classification {
    if observed == expected {
        return Classification::no_fault(format!("stage {stage}: fault-free (sum={observed})"));
    }

    // A sum above the fault-free value cannot be a single cleared bit.
    let Some(missing) = expected.checked_sub(observed) else {
        return Classification::no_fault(format!(
            "stage {stage}: sum={observed} exceeds fault-free value {expected}"
        ));
    };

    if !missing.is_power_of_two() {
        // Same detection gap as the SA1 probe.
        return Classification::no_fault(format!(
            "stage {stage}: missing={missing} is not a single stuck bit (non power of two)"
        ));
    }

    let bit = missing.trailing_zeros();
    let row = active_row(pattern);
    Classification::fault(
        FaultClass::Sa0,
        format!("{row} weight[{bit}]"),
        format!("stage {stage}: SA0 at bit {bit} (missing {missing})"),
    )
}
