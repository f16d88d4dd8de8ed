//! Error types for the fault model

use thiserror::Error;

/// Result type for fault-model operations
pub type Result<T> = std::result::Result<T, FaultModelError>;

/// Errors raised while building the fault model
///
/// These all indicate a caller or configuration defect, not a runtime
/// condition: the run is aborted rather than retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultModelError {
    /// Bridge-variant index outside the eight canonical behaviors
    #[error("unknown bridge variant index {0} (expected 0..=7)")]
    UnknownBridgeVariant(u8),

    /// Weight bit width outside the supported range
    #[error("invalid bit width {0} (expected 1..={max})", max = crate::MAX_BIT_WIDTH)]
    InvalidBitWidth(usize),
}
