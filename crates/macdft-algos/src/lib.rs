//! Stage-controlled fault detection algorithms
//!
//! A detection algorithm owns the test protocol: how many stages to run,
//! which input patterns and nominal weight vectors each stage applies, and
//! how to classify a fault from the observed output sums. The test engine
//! only ever talks to the [`DetectionAlgorithm`] trait; it never needs to
//! know which concrete procedure it is driving.
//!
//! Two staged procedures are provided ([`FiveStageAlgorithm`] with a
//! bridging sweep, [`FourStageAlgorithm`] without), along with three
//! single-shot comparator detectors and the canonical weight-pattern
//! generators they draw stimuli from.

pub mod five_stage;
pub mod four_stage;
pub mod patterns;
pub mod single_shot;
pub mod stage;

mod analysis;

pub use five_stage::FiveStageAlgorithm;
pub use four_stage::FourStageAlgorithm;
pub use patterns::{PatternGroup, WeightPatternGenerator};
pub use single_shot::{MajorityDetector, ParityDetector, WeightedSumDetector};
pub use stage::{AlgorithmError, Classification, DetectionAlgorithm, FaultClass, Result};
