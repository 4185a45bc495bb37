//! Candidate generation and ranking
//!
//! Three lookup tiers of increasing recall and decreasing precision,
//! tried in strict order; a tier runs only when every earlier tier
//! came up empty.

use std::collections::HashSet;
use std::hash::Hash;

use itertools::Itertools;
use kblink_core::{Candidate, Lemmatizer, NameIndex, SimilarityScorer, NO_ENTITY};
use tracing::debug;

/// Mentions with this many whitespace tokens or more skip lemma expansion.
const MAX_LEMMA_TOKENS: usize = 6;

/// Keys outside this key/mention length-ratio band are never fuzzy-scored.
const MIN_LENGTH_RATIO: f64 = 0.5;
const MAX_LENGTH_RATIO: f64 = 1.5;

/// Fuzzy key-vs-mention scores must exceed this to be accepted.
const FUZZY_THRESHOLD: u8 = 50;

/// A fuzzy-tier hit: a candidate re-scored against its own surface form.
///
/// The re-score, not the key-vs-mention score that admitted the key,
/// is what ranking and confidence use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuzzyHit {
    pub candidate: Candidate,
    /// Similarity of the mention to `candidate.surface`, 0..=100.
    pub score: u8,
}

/// Hits from whichever tier fired.
///
/// Tiers 1 and 2 rank by the candidates' index-time rank field; the
/// fuzzy tier ranks by its re-score, so the two shapes stay distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum TierHits {
    /// Exact/lemma or substring hits, ranked by `Candidate::rank`.
    Ranked(Vec<Candidate>),
    /// Fuzzy hits, ranked by `FuzzyHit::score`.
    Fuzzy(Vec<FuzzyHit>),
}

impl TierHits {
    /// Sort, score, and project hits into identifier/confidence lists.
    ///
    /// Both sorts are stable: ties keep their generation order. Exact
    /// and substring matches are trusted absolutely (confidence 1.0
    /// regardless of rank magnitude); fuzzy matches carry their
    /// re-score divided by 100.
    pub fn into_ranked(self) -> RankedCandidates {
        match self {
            TierHits::Ranked(mut candidates) => {
                candidates.sort_by_key(|c| std::cmp::Reverse(c.rank));
                let confidences = vec![1.0; candidates.len()];
                let ids = candidates.into_iter().map(|c| c.id).collect();
                RankedCandidates { ids, confidences }
            }
            TierHits::Fuzzy(mut hits) => {
                hits.sort_by_key(|h| std::cmp::Reverse(h.score));
                let confidences = hits.iter().map(|h| f64::from(h.score) / 100.0).collect();
                let ids = hits.into_iter().map(|h| h.candidate.id).collect();
                RankedCandidates { ids, confidences }
            }
        }
    }
}

/// Ranked candidate identifiers with position-aligned confidences.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidates {
    pub ids: Vec<String>,
    pub confidences: Vec<f64>,
}

impl RankedCandidates {
    /// The sentinel result when no tier produced a candidate.
    pub fn none_found() -> Self {
        Self {
            ids: vec![NO_ENTITY.to_string()],
            confidences: vec![0.0],
        }
    }
}

/// Produces raw candidate lists from a mention string.
///
/// Borrows the shared index and collaborators for the duration of one
/// resolve call; holds no state of its own.
pub struct CandidateGenerator<'a> {
    index: &'a NameIndex,
    lemmatizer: &'a dyn Lemmatizer,
    scorer: &'a dyn SimilarityScorer,
    lemmatize: bool,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(
        index: &'a NameIndex,
        lemmatizer: &'a dyn Lemmatizer,
        scorer: &'a dyn SimilarityScorer,
        lemmatize: bool,
    ) -> Self {
        Self {
            index,
            lemmatizer,
            scorer,
            lemmatize,
        }
    }

    /// Run the tiers in order and return the first non-empty result.
    pub fn generate(&self, mention: &str) -> Option<TierHits> {
        let tiers: [fn(&Self, &str) -> Option<TierHits>; 3] =
            [Self::exact_tier, Self::substring_tier, Self::fuzzy_tier];
        tiers.iter().find_map(|tier| tier(self, mention))
    }

    /// Tier 1: verbatim lookup plus partial-lemmatization variants.
    ///
    /// A multi-word name may need lemmatization on only a subset of
    /// its tokens to match the index, so every original/lemma mask is
    /// tried. Duplicate candidates across masks are allowed here.
    fn exact_tier(&self, mention: &str) -> Option<TierHits> {
        let mut candidates: Vec<Candidate> = Vec::new();
        if let Some(found) = self.index.get(mention) {
            candidates.extend_from_slice(found);
        }

        let tokens: Vec<&str> = mention.split_whitespace().collect();
        if self.lemmatize && tokens.len() < MAX_LEMMA_TOKENS {
            let lemmas: Vec<String> = tokens.iter().map(|t| self.lemmatizer.lemma(t)).collect();
            let masks = tokens
                .iter()
                .zip(&lemmas)
                .map(|(&token, lemma)| vec![token, lemma.as_str()])
                .multi_cartesian_product();
            for mask in masks {
                let variant = mask.join(" ");
                if variant != mention {
                    if let Some(found) = self.index.get(&variant) {
                        candidates.extend_from_slice(found);
                    }
                }
            }
        }

        debug!(tier = 1, hits = candidates.len(), "exact/lemma lookup");
        (!candidates.is_empty()).then_some(TierHits::Ranked(candidates))
    }

    /// Tier 2: every index key containing the lowercased mention as a
    /// contiguous substring. Keys are matched as stored.
    fn substring_tier(&self, mention: &str) -> Option<TierHits> {
        let mention_lower = mention.to_lowercase();
        let mut candidates: Vec<Candidate> = Vec::new();
        for (key, entries) in self.index.iter() {
            if key.contains(&mention_lower) {
                candidates.extend_from_slice(entries);
            }
        }

        let candidates = dedup_preserving_order(candidates);
        debug!(tier = 2, hits = candidates.len(), "substring scan");
        (!candidates.is_empty()).then_some(TierHits::Ranked(candidates))
    }

    /// Tier 3: fuzzy scan over all index keys.
    ///
    /// Keys whose char-length ratio to the mention falls outside
    /// (0.5, 1.5) are skipped before any scoring.
    fn fuzzy_tier(&self, mention: &str) -> Option<TierHits> {
        let mention_len = mention.chars().count() as f64;
        let mut hits: Vec<FuzzyHit> = Vec::new();
        for (key, entries) in self.index.iter() {
            let length_ratio = key.chars().count() as f64 / mention_len;
            if length_ratio <= MIN_LENGTH_RATIO || length_ratio >= MAX_LENGTH_RATIO {
                continue;
            }
            if self.scorer.score(key, mention) <= FUZZY_THRESHOLD {
                continue;
            }
            for candidate in entries {
                let score = self.scorer.score(mention, &candidate.surface);
                hits.push(FuzzyHit {
                    candidate: candidate.clone(),
                    score,
                });
            }
        }

        let hits = dedup_preserving_order(hits);
        debug!(tier = 3, hits = hits.len(), "fuzzy scan");
        (!hits.is_empty()).then_some(TierHits::Fuzzy(hits))
    }
}

/// Drop structurally-equal duplicates, keeping first occurrences.
fn dedup_preserving_order<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{DictionaryLemmatizer, NoopLemmatizer};
    use crate::similarity::LevenshteinScorer;

    fn sample_index() -> NameIndex {
        let mut index = NameIndex::new();
        index.insert(
            "mercury",
            vec![
                Candidate::new("mercury", "Q925", 92),
                Candidate::new("mercury", "Q308", 410),
            ],
        );
        index.insert("roman empire", vec![Candidate::new("roman empire", "Q2277", 310)]);
        index.insert("binturong", vec![Candidate::new("binturong", "Q5815", 20)]);
        index
    }

    fn generator<'a>(
        index: &'a NameIndex,
        lemmatizer: &'a dyn Lemmatizer,
        scorer: &'a dyn SimilarityScorer,
    ) -> CandidateGenerator<'a> {
        CandidateGenerator::new(index, lemmatizer, scorer, true)
    }

    #[test]
    fn test_exact_tier_hits_verbatim_key() {
        let index = sample_index();
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        let hits = gen.generate("mercury").unwrap();
        let ranked = hits.into_ranked();
        // Sorted descending by the index-time rank field.
        assert_eq!(ranked.ids, ["Q308", "Q925"]);
        assert_eq!(ranked.confidences, [1.0, 1.0]);
    }

    #[test]
    fn test_lemma_variant_reaches_index_key() {
        let mut lemmatizer = DictionaryLemmatizer::new();
        lemmatizer.add_form("empire", &["empires"]);
        let index = sample_index();
        let gen = generator(&index, &lemmatizer, &LevenshteinScorer);

        // Only the head noun needs lemmatization for the key to match.
        let ranked = gen.generate("roman empires").unwrap().into_ranked();
        assert_eq!(ranked.ids, ["Q2277"]);
        assert_eq!(ranked.confidences, [1.0]);
    }

    #[test]
    fn test_all_lemma_mask_equal_to_mention_adds_nothing() {
        // Identity lemmas make every variant equal the mention; the
        // verbatim hit must not be duplicated by the mask loop.
        let index = sample_index();
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        let ranked = gen.generate("roman empire").unwrap().into_ranked();
        assert_eq!(ranked.ids, ["Q2277"]);
    }

    #[test]
    fn test_lemma_expansion_skipped_for_long_mentions() {
        let mut lemmatizer = DictionaryLemmatizer::new();
        lemmatizer.add_form("f", &["ff"]);
        let mut index = NameIndex::new();
        index.insert("a b c d e f", vec![Candidate::new("a b c d e f", "Q1", 1)]);
        let gen = generator(&index, &lemmatizer, &LevenshteinScorer);

        // With five or fewer tokens the lemma variant would match the
        // key in tier 1 and yield Ranked hits; at six tokens only the
        // fuzzy tier can fire.
        let hits = gen.generate("a b c d e ff").unwrap();
        assert!(matches!(hits, TierHits::Fuzzy(_)));
    }

    #[test]
    fn test_substring_tier_runs_only_when_exact_is_empty() {
        let index = sample_index();
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        let hits = gen.generate("empire").unwrap();
        assert!(matches!(hits, TierHits::Ranked(_)));
        let ranked = hits.into_ranked();
        assert_eq!(ranked.ids, ["Q2277"]);
        assert_eq!(ranked.confidences, [1.0]);
    }

    #[test]
    fn test_substring_tier_lowercases_the_mention_only() {
        let index = sample_index();
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        // "Empire" lowercases to "empire" which the stored key contains.
        let ranked = gen.generate("Empire").unwrap().into_ranked();
        assert_eq!(ranked.ids, ["Q2277"]);
    }

    #[test]
    fn test_substring_tier_dedups_across_keys() {
        let mut index = NameIndex::new();
        let shared = Candidate::new("mercury", "Q925", 92);
        index.insert("mercury metal", vec![shared.clone()]);
        index.insert("mercury element", vec![shared]);
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        let ranked = gen.generate("mercur").unwrap().into_ranked();
        assert_eq!(ranked.ids, ["Q925"]);
    }

    #[test]
    fn test_fuzzy_tier_fires_last_and_rescores_surface() {
        let index = sample_index();
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        // One transposition away from "binturong"; no exact or
        // substring key contains it.
        let hits = gen.generate("bintuorng").unwrap();
        let TierHits::Fuzzy(fuzzy) = &hits else {
            panic!("expected fuzzy hits, got {hits:?}");
        };
        assert_eq!(fuzzy.len(), 1);
        assert_eq!(fuzzy[0].candidate.id, "Q5815");

        let expected = LevenshteinScorer.score("bintuorng", "binturong");
        assert_eq!(fuzzy[0].score, expected);

        let ranked = hits.into_ranked();
        assert_eq!(ranked.confidences, [f64::from(expected) / 100.0]);
    }

    #[test]
    fn test_fuzzy_tier_skips_mismatched_lengths() {
        let mut index = NameIndex::new();
        index.insert("ab", vec![Candidate::new("ab", "Q1", 1)]);
        index.insert("abcdefgh", vec![Candidate::new("abcdefgh", "Q2", 1)]);
        let gen = generator(&index, &NoopLemmatizer, &LevenshteinScorer);

        // Ratios 2/4 and 8/4 both fall outside (0.5, 1.5).
        assert!(gen.generate("abcd").is_none());
    }

    #[test]
    fn test_ranked_sort_is_stable_on_ties() {
        let hits = TierHits::Ranked(vec![
            Candidate::new("a", "Q1", 7),
            Candidate::new("b", "Q2", 7),
            Candidate::new("c", "Q3", 9),
        ]);
        let ranked = hits.into_ranked();
        assert_eq!(ranked.ids, ["Q3", "Q1", "Q2"]);
    }

    #[test]
    fn test_none_found_sentinel_shape() {
        let sentinel = RankedCandidates::none_found();
        assert_eq!(sentinel.ids, [NO_ENTITY]);
        assert_eq!(sentinel.confidences, [0.0]);
    }
}
