//! Fault model and fault-injection transform for two-row MAC array testing
//!
//! This crate is the leaf of the macdft workspace: it defines the bit-level
//! vocabulary shared by every other crate (`Pattern`, `WeightVector`), the
//! fault entity and its enumeration policy (`Fault`, `FaultKind`,
//! `BridgeVariant`), and the pure injection transform that produces the
//! faulty view of a stimulus (`inject`).
//!
//! Nothing here simulates the hardware or decides detection; those live in
//! `macdft-engine` and `macdft-algos`.

pub mod bits;
pub mod error;
pub mod fault;
pub mod inject;

pub use bits::{Pattern, WeightVector};
pub use error::{FaultModelError, Result};
pub use fault::{
    generate_fault_list, BridgeVariant, DetectRecord, Fault, FaultKind, Row, Transition,
};
pub use inject::inject;

/// Maximum supported weight bit width.
///
/// Two rows of `2^63 - 1` still fit in a `u64` sum, so every observable
/// output of the MAC model stays exact.
pub const MAX_BIT_WIDTH: usize = 63;
