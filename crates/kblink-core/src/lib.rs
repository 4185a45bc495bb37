//! kblink Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the kblink
//! entity-linking system:
//! - Knowledge-base models (facts, candidates, lookup structures)
//! - Common error types
//! - Collaborator traits for morphology and string similarity
//! - Configuration management

pub mod config;
pub mod kb;

pub use config::{AppConfig, LinkerConfig, LoggingConfig};
pub use kb::{Candidate, Fact, FactStore, NameIndex};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for kblink operations
#[derive(Error, Debug)]
pub enum KblinkError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, KblinkError>;

// ============================================================================
// Knowledge-Base Constants
// ============================================================================

/// Identifiers starting with this prefix denote knowledge-base entities
/// eligible for fact lookup; any other identifier resolves to no facts.
pub const ENTITY_PREFIX: &str = "Q";

/// Sentinel identifier returned when no entity could be linked.
pub const NO_ENTITY: &str = "None";

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Trait for morphological normalizers.
///
/// Implementations must be total: an unknown token comes back
/// unchanged, never as an error.
pub trait Lemmatizer: Send + Sync {
    /// Return the dictionary (base) form of a single token.
    fn lemma(&self, token: &str) -> String;
}

/// Trait for fuzzy string similarity scorers.
///
/// Scores are integers in 0..=100 and deterministic for a given pair.
pub trait SimilarityScorer: Send + Sync {
    /// Score the similarity of two strings.
    fn score(&self, a: &str, b: &str) -> u8;
}

// ============================================================================
// Tests
// ============================================================================
