//! Entity linker orchestrator
//!
//! Sequences candidate generation, ranking, fact retrieval, and
//! plausibility filtering. A linker instance is stateless across
//! calls: every resolve is a pure function of its inputs over the
//! shared, immutable index and store.

use std::sync::Arc;

use kblink_core::{
    Fact, FactStore, KblinkError, Lemmatizer, LinkerConfig, NameIndex, Result, SimilarityScorer,
    ENTITY_PREFIX, NO_ENTITY,
};
use tracing::info;

use crate::candidates::{CandidateGenerator, RankedCandidates};
use crate::filter::filter_implausible;
use crate::morphology::NoopLemmatizer;
use crate::similarity::LevenshteinScorer;

/// Outcome of a resolve call.
///
/// `facts` and `confidences` are position-aligned as produced by fact
/// retrieval, with two deliberate exceptions inherited from the
/// pipeline's compatibility contract:
///
/// - an *empty mention* yields one sentinel fact list but an empty
///   confidence list, while a mention with *no candidates* yields the
///   sentinel with `[0.0]`;
/// - when the plausibility filter drops a candidate, `facts` shrinks
///   while `confidences` does not.
///
/// Callers must therefore not zip the two lists by position once the
/// filter is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// One fact list per surviving candidate, best-ranked first.
    pub facts: Vec<Vec<Fact>>,
    /// Per-candidate confidence in [0.0, 1.0], pre-filter order.
    pub confidences: Vec<f64>,
}

/// Resolves entity mentions against a name index and fact store.
///
/// Holds only shared read-only structures; one instance can serve any
/// number of concurrent callers.
pub struct EntityLinker {
    index: Arc<NameIndex>,
    facts: Arc<FactStore>,
    lemmatizer: Box<dyn Lemmatizer>,
    scorer: Box<dyn SimilarityScorer>,
    config: LinkerConfig,
}

impl EntityLinker {
    /// Create a linker with the default collaborators: no-op
    /// morphology and edit-distance similarity.
    pub fn new(index: Arc<NameIndex>, facts: Arc<FactStore>, config: LinkerConfig) -> Self {
        Self {
            index,
            facts,
            lemmatizer: Box::new(NoopLemmatizer),
            scorer: Box::new(LevenshteinScorer),
            config,
        }
    }

    /// Replace the morphological normalizer.
    pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// Replace the similarity scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Resolve a mention to fact lists with parallel confidences.
    ///
    /// `question_tokens` must hold at least two tokens whenever the
    /// plausibility filter is enabled and the mention is non-empty.
    pub fn resolve(&self, mention: &str, question_tokens: &[String]) -> Result<Resolution> {
        if self.config.filter_implausible && !mention.is_empty() && question_tokens.len() < 2 {
            return Err(KblinkError::InvalidInput(format!(
                "plausibility filtering reads the first two question tokens, got {}",
                question_tokens.len()
            )));
        }

        let ranked = if mention.is_empty() {
            // The empty mention short-circuits with an empty confidence
            // list, unlike the no-candidate case below.
            RankedCandidates {
                ids: vec![NO_ENTITY.to_string()],
                confidences: Vec::new(),
            }
        } else {
            let generator = CandidateGenerator::new(
                &self.index,
                self.lemmatizer.as_ref(),
                self.scorer.as_ref(),
                self.config.lemmatize,
            );
            match generator.generate(mention) {
                Some(hits) => hits.into_ranked(),
                None => RankedCandidates::none_found(),
            }
        };

        if self.config.verbose_logging {
            let top: Vec<&str> = ranked.ids.iter().take(5).map(String::as_str).collect();
            info!(?top, "candidate identifiers");
        }

        let fact_lists = self.retrieve_facts(&ranked.ids);
        debug_assert_eq!(fact_lists.len(), ranked.ids.len());

        // Filtering an empty mention's lone empty fact list could never
        // drop anything, so the sentinel passes through untouched.
        let fact_lists = if self.config.filter_implausible && !mention.is_empty() {
            filter_implausible(fact_lists, question_tokens)
        } else {
            fact_lists
        };

        Ok(Resolution {
            facts: fact_lists,
            confidences: ranked.confidences,
        })
    }

    /// Map ranked identifiers to their fact lists, position for
    /// position. Identifiers outside the reserved prefix never touch
    /// the store and resolve to an empty list.
    fn retrieve_facts(&self, ids: &[String]) -> Vec<Vec<Fact>> {
        ids.iter()
            .map(|id| {
                if id.starts_with(ENTITY_PREFIX) {
                    self.facts.get(id).cloned().unwrap_or_default()
                } else {
                    Vec::new()
                }
            })
            .collect()
    }
}
