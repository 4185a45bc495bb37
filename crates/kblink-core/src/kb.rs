//! Knowledge-base models
//!
//! The linker consumes two pre-built, read-only lookup structures:
//! a [`NameIndex`] mapping surface forms to candidate entities, and a
//! [`FactStore`] mapping entity identifiers to their facts. Both are
//! loaded whole at startup and never mutated afterwards, so they can
//! be shared freely across threads.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{KblinkError, Result};

// ============================================================================
// Facts
// ============================================================================

/// A `(property, value)` pair describing an entity, e.g. `("P31", "Q5")`
/// meaning "instance of: human".
///
/// Serializes as a two-element array, matching the precomputed
/// knowledge-base dump format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact(pub String, pub String);

impl Fact {
    /// Create a fact from a property and a value identifier.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self(property.into(), value.into())
    }

    /// The property identifier, e.g. "P31".
    pub fn property(&self) -> &str {
        &self.0
    }

    /// The value identifier, e.g. "Q5".
    pub fn value(&self) -> &str {
        &self.1
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// A candidate entity stored in the name index.
///
/// Serializes as a three-element array `[surface, id, rank]`, the
/// record shape the index is dumped with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CandidateRecord", into = "CandidateRecord")]
pub struct Candidate {
    /// Canonical surface form of the entity; the fuzzy tier re-scores
    /// the mention against this field.
    pub surface: String,

    /// Knowledge-base identifier, e.g. "Q5815".
    pub id: String,

    /// Pre-ranking score assigned at index-build time
    /// (e.g. the entity's relation count).
    pub rank: i64,
}

impl Candidate {
    /// Create a candidate record.
    pub fn new(surface: impl Into<String>, id: impl Into<String>, rank: i64) -> Self {
        Self {
            surface: surface.into(),
            id: id.into(),
            rank,
        }
    }
}

/// Wire shape of a candidate in the JSON index dump.
#[derive(Serialize, Deserialize)]
struct CandidateRecord(String, String, i64);

impl From<CandidateRecord> for Candidate {
    fn from(record: CandidateRecord) -> Self {
        Self {
            surface: record.0,
            id: record.1,
            rank: record.2,
        }
    }
}

impl From<Candidate> for CandidateRecord {
    fn from(candidate: Candidate) -> Self {
        Self(candidate.surface, candidate.id, candidate.rank)
    }
}

// ============================================================================
// Name Index
// ============================================================================

/// Mapping from a surface-form string to its candidate entities.
///
/// Multiple names may map to the same identifier (aliases) and one
/// name may map to multiple identifiers (ambiguity). Keys are matched
/// case-sensitively as stored. Backed by a `BTreeMap` so full scans
/// (substring and fuzzy tiers) iterate in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameIndex(BTreeMap<String, Vec<Candidate>>);

impl NameIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the candidates for a surface form.
    pub fn insert(&mut self, name: impl Into<String>, candidates: Vec<Candidate>) {
        self.0.insert(name.into(), candidates);
    }

    /// Look up a surface form verbatim.
    pub fn get(&self, name: &str) -> Option<&Vec<Candidate>> {
        self.0.get(name)
    }

    /// Iterate all `(surface form, candidates)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Candidate>)> {
        self.0.iter()
    }

    /// Number of surface forms in the index.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize an index from its JSON dump.
    pub fn from_json_str(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| KblinkError::Store(format!("invalid name index JSON: {e}")))
    }

    /// Load an index from a JSON dump file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| KblinkError::Store(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&data)
    }
}

impl FromIterator<(String, Vec<Candidate>)> for NameIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Candidate>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Fact Store
// ============================================================================

/// Mapping from an entity identifier to its facts.
///
/// Only ever queried by key, so unordered storage is fine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactStore(HashMap<String, Vec<Fact>>);

impl FactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the facts for an identifier.
    pub fn insert(&mut self, id: impl Into<String>, facts: Vec<Fact>) {
        self.0.insert(id.into(), facts);
    }

    /// Look up the facts stored for an identifier.
    pub fn get(&self, id: &str) -> Option<&Vec<Fact>> {
        self.0.get(id)
    }

    /// Number of identifiers in the store.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize a store from its JSON dump.
    pub fn from_json_str(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| KblinkError::Store(format!("invalid fact store JSON: {e}")))
    }

    /// Load a store from a JSON dump file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| KblinkError::Store(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&data)
    }
}

impl FromIterator<(String, Vec<Fact>)> for FactStore {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Fact>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_serializes_as_pair() {
        let fact = Fact::new("P31", "Q5");
        let json = serde_json::to_string(&fact).unwrap();
        assert_eq!(json, r#"["P31","Q5"]"#);

        let back: Fact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fact);
        assert_eq!(back.property(), "P31");
        assert_eq!(back.value(), "Q5");
    }

    #[test]
    fn test_candidate_serializes_as_triple() {
        let candidate = Candidate::new("binturong", "Q5815", 20);
        let json = serde_json::to_string(&candidate).unwrap();
        assert_eq!(json, r#"["binturong","Q5815",20]"#);

        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, candidate);
    }

    #[test]
    fn test_name_index_from_json() {
        let index = NameIndex::from_json_str(
            r#"{
                "binturong": [["binturong", "Q5815", 20]],
                "mercury": [["mercury", "Q308", 410], ["mercury", "Q925", 92]]
            }"#,
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("mercury").unwrap().len(), 2);
        assert_eq!(index.get("binturong").unwrap()[0].id, "Q5815");
        assert!(index.get("Binturong").is_none());
    }

    #[test]
    fn test_name_index_rejects_malformed_json() {
        let err = NameIndex::from_json_str(r#"{"a": [["only-two", "Q1"]]}"#).unwrap_err();
        assert!(matches!(err, KblinkError::Store(_)));
    }

    #[test]
    fn test_name_index_iterates_in_key_order() {
        let mut index = NameIndex::new();
        index.insert("zebra", vec![Candidate::new("zebra", "Q32789", 3)]);
        index.insert("aardvark", vec![Candidate::new("aardvark", "Q46212", 5)]);

        let keys: Vec<&String> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["aardvark", "zebra"]);
    }

    #[test]
    fn test_fact_store_from_json() {
        let store = FactStore::from_json_str(
            r#"{"Q5815": [["P31", "Q146470"], ["P1403", "Q25265"]]}"#,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Q5815").unwrap()[0], Fact::new("P31", "Q146470"));
        assert!(store.get("Q0").is_none());
    }

    #[test]
    fn test_missing_file_is_a_store_error() {
        let err = FactStore::from_json_file("/nonexistent/facts.json").unwrap_err();
        assert!(matches!(err, KblinkError::Store(_)));
    }
}
