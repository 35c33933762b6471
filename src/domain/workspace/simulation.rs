//! Locally generated scores used when the relay cannot be reached.

use rand::Rng;
use std::ops::RangeInclusive;

use crate::domain::foundation::Percentage;

pub const STORIES_RANGE: RangeInclusive<u32> = 5..=30;
pub const SPECS_RANGE: RangeInclusive<u32> = 3..=20;
pub const AMBIGUITY_RANGE: RangeInclusive<u8> = 8..=40;
pub const COMPLETENESS_RANGE: RangeInclusive<u8> = 60..=95;
pub const TESTABILITY_RANGE: RangeInclusive<u8> = 65..=98;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedScores {
    pub stories: u32,
    pub specs: u32,
    pub ambiguity: Percentage,
    pub completeness: Percentage,
    pub testability: Percentage,
}

impl SimulatedScores {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self {
            stories: rng.gen_range(STORIES_RANGE),
            specs: rng.gen_range(SPECS_RANGE),
            ambiguity: Percentage::new(rng.gen_range(AMBIGUITY_RANGE)),
            completeness: Percentage::new(rng.gen_range(COMPLETENESS_RANGE)),
            testability: Percentage::new(rng.gen_range(TESTABILITY_RANGE)),
        }
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_scores_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let scores = SimulatedScores::generate(&mut rng);
            assert!(STORIES_RANGE.contains(&scores.stories));
            assert!(SPECS_RANGE.contains(&scores.specs));
            assert!(AMBIGUITY_RANGE.contains(&scores.ambiguity.value()));
            assert!(COMPLETENESS_RANGE.contains(&scores.completeness.value()));
            assert!(TESTABILITY_RANGE.contains(&scores.testability.value()));
        }
    }
}
