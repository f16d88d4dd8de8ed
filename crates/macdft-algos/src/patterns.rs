//! Canonical weight-pattern generators
//!
//! Pure generators of directed weight-bit vectors. The staged algorithms
//! pick individual vectors from here (all-zero, all-one, the stage-5
//! bridge pair); `WeightPatternGenerator` composes whole groups for
//! callers that want a directed sweep over a row's weight storage.

use macdft_faults::WeightVector;

use crate::stage::{AlgorithmError, Result};

/// All bits cleared
pub fn all_zero(width: usize) -> Vec<WeightVector> {
    vec![WeightVector::all_zero(width)]
}

/// All bits set
pub fn all_one(width: usize) -> Vec<WeightVector> {
    vec![WeightVector::all_one(width)]
}

/// One vector per bit position with only that bit set:
/// width 4 -> 0001, 0010, 0100, 1000 (MSB-first notation)
pub fn one_hot(width: usize) -> Vec<WeightVector> {
    (0..width)
        .map(|i| {
            let mut w = WeightVector::all_zero(width);
            w.set_bit(i, true);
            w
        })
        .collect()
}

/// One vector per bit position with only that bit cleared from all-ones:
/// width 4 -> 1110, 1101, 1011, 0111 (MSB-first notation)
pub fn clear_one(width: usize) -> Vec<WeightVector> {
    (0..width)
        .map(|i| {
            let mut w = WeightVector::all_one(width);
            w.set_bit(i, false);
            w
        })
        .collect()
}

/// All-ones with the most significant bit cleared: width 4 -> 0111
pub fn msb_cleared(width: usize) -> WeightVector {
    let mut w = WeightVector::all_one(width);
    if width > 0 {
        w.set_bit(width - 1, false);
    }
    w
}

/// The named pattern groups `WeightPatternGenerator` can compose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternGroup {
    AllZero,
    AllOne,
    OneHot,
    ClearOne,
    MsbCleared,
}

impl PatternGroup {
    /// All groups in registry order
    pub const ALL: [PatternGroup; 5] = [
        PatternGroup::AllZero,
        PatternGroup::AllOne,
        PatternGroup::OneHot,
        PatternGroup::ClearOne,
        PatternGroup::MsbCleared,
    ];

    /// Registry name of this group
    pub fn name(&self) -> &'static str {
        match self {
            PatternGroup::AllZero => "all_zero",
            PatternGroup::AllOne => "all_one",
            PatternGroup::OneHot => "one_hot",
            PatternGroup::ClearOne => "clear_one",
            PatternGroup::MsbCleared => "msb_cleared",
        }
    }

    /// Look up a group by name; unknown names are configuration errors
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.name() == name)
            .ok_or_else(|| AlgorithmError::UnknownPatternGroup(name.to_string()))
    }

    /// Generate this group's vectors for the given width
    pub fn generate(&self, width: usize) -> Vec<WeightVector> {
        match self {
            PatternGroup::AllZero => all_zero(width),
            PatternGroup::AllOne => all_one(width),
            PatternGroup::OneHot => one_hot(width),
            PatternGroup::ClearOne => clear_one(width),
            PatternGroup::MsbCleared => vec![msb_cleared(width)],
        }
    }
}

/// Composes enabled pattern groups into one directed vector list,
/// deduplicated while preserving first-seen order
#[derive(Debug, Clone)]
pub struct WeightPatternGenerator {
    bit_width: usize,
    enabled: Vec<PatternGroup>,
}

impl WeightPatternGenerator {
    /// Generator with every group enabled
    pub fn new(bit_width: usize) -> Self {
        Self {
            bit_width,
            enabled: PatternGroup::ALL.to_vec(),
        }
    }

    /// Generator restricted to the given groups
    pub fn with_groups(bit_width: usize, groups: Vec<PatternGroup>) -> Self {
        Self {
            bit_width,
            enabled: groups,
        }
    }

    /// Enable a group (appended to the composition order)
    pub fn enable(&mut self, group: PatternGroup) {
        if !self.enabled.contains(&group) {
            self.enabled.push(group);
        }
    }

    /// Disable a group
    pub fn disable(&mut self, group: PatternGroup) {
        self.enabled.retain(|g| *g != group);
    }

    /// Concatenate enabled groups, dropping repeated vectors
    pub fn generate(&self) -> Vec<WeightVector> {
        let mut unique: Vec<WeightVector> = Vec::new();
        for group in &self.enabled {
            for vector in group.generate(self.bit_width) {
                if !unique.contains(&vector) {
                    unique.push(vector);
                }
            }
        }
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_values() {
        let vectors = one_hot(4);
        let values: Vec<u64> = vectors.iter().map(WeightVector::value).collect();
        assert_eq!(values, vec![1, 2, 4, 8]);
    }

    #[test]
    fn test_clear_one_values() {
        let vectors = clear_one(4);
        let values: Vec<u64> = vectors.iter().map(WeightVector::value).collect();
        assert_eq!(values, vec![14, 13, 11, 7]);
    }

    #[test]
    fn test_msb_cleared() {
        assert_eq!(msb_cleared(4).value(), 7);
        assert_eq!(msb_cleared(6).value(), 31);
    }

    #[test]
    fn test_group_lookup() {
        assert_eq!(
            PatternGroup::from_name("one_hot").unwrap(),
            PatternGroup::OneHot
        );
        assert!(matches!(
            PatternGroup::from_name("walking_zero"),
            Err(AlgorithmError::UnknownPatternGroup(_))
        ));
    }

    #[test]
    fn test_generate_dedups_preserving_order() {
        // clear_one(1) and msb_cleared(1) both produce the single vector 0,
        // which all_zero already contributed
        let generator = WeightPatternGenerator::new(1);
        let vectors = generator.generate();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].value(), 0);
        assert_eq!(vectors[1].value(), 1);
    }

    #[test]
    fn test_enable_disable() {
        let mut generator = WeightPatternGenerator::with_groups(4, vec![PatternGroup::AllZero]);
        assert_eq!(generator.generate().len(), 1);

        generator.enable(PatternGroup::OneHot);
        assert_eq!(generator.generate().len(), 5);

        generator.disable(PatternGroup::AllZero);
        assert_eq!(generator.generate().len(), 4);
    }
}
