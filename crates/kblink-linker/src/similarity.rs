//! Fuzzy string similarity scoring

use kblink_core::SimilarityScorer;
use strsim::normalized_levenshtein;

/// Edit-distance similarity scaled to 0..=100.
///
/// Identical strings score 100; strings with no common structure
/// score near 0. Symmetric and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinScorer;

impl SimilarityScorer for LevenshteinScorer {
    fn score(&self, a: &str, b: &str) -> u8 {
        (normalized_levenshtein(a, b) * 100.0).round() as u8
    }
}
