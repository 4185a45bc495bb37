//! kblink Linker - Mention-to-identifier resolution pipeline
//!
//! Resolves a free-text entity mention against a knowledge base in
//! four stages:
//! 1. Candidate generation: a cascading three-tier search
//!    (exact/lemma lookup, substring scan, fuzzy scan)
//! 2. Ranking with per-candidate confidence scores
//! 3. Fact retrieval for every ranked identifier
//! 4. Plausibility filtering against the question's opening template

pub mod candidates;
pub mod filter;
pub mod linker;
pub mod morphology;
pub mod similarity;

pub use candidates::{CandidateGenerator, FuzzyHit, RankedCandidates, TierHits};
pub use linker::{EntityLinker, Resolution};
pub use morphology::{DictionaryLemmatizer, NoopLemmatizer};
pub use similarity::LevenshteinScorer;
