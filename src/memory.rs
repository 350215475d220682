//! In-memory [`CorpusProvider`] and [`ArtifactIndex`] implementations.
//!
//! Useful for tests and for embedding the engine where the documents
//! already sit in memory. Enumeration order is insertion order.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::models::{Artifact, Document};
use crate::traits::{ArtifactIndex, CorpusProvider};

/// A corpus held as `(name, text)` pairs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    docs: Vec<(String, String)>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document; `text` is split into lines on load.
    pub fn with_document(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.docs.push((name.into(), text.into()));
        self
    }
}

impl CorpusProvider for InMemoryCorpus {
    fn documents(&self) -> Vec<String> {
        self.docs.iter().map(|(name, _)| name.clone()).collect()
    }

    fn load(&self, name: &str) -> Result<Document> {
        let (_, text) = self
            .docs
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| anyhow!("document not found: {}", name))?;

        Ok(Document {
            name: name.to_string(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }
}

/// A fixed list of artifacts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    artifacts: Vec<Artifact>,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(
        mut self,
        filename: impl Into<String>,
        size: u64,
        modified: DateTime<Utc>,
    ) -> Self {
        self.artifacts.push(Artifact {
            filename: filename.into(),
            size,
            modified,
        });
        self
    }
}

impl ArtifactIndex for InMemoryArtifacts {
    fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_preserves_insertion_order() {
        let corpus = InMemoryCorpus::new()
            .with_document("b.txt", "one")
            .with_document("a.txt", "two");
        assert_eq!(corpus.documents(), vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_corpus_load_splits_lines() {
        let corpus = InMemoryCorpus::new().with_document("a.txt", "first\r\nsecond\nthird");
        let doc = corpus.load("a.txt").unwrap();
        assert_eq!(doc.lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_corpus_load_missing() {
        let corpus = InMemoryCorpus::new();
        let err = corpus.load("nope.txt").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_artifacts_roundtrip() {
        let now = Utc::now();
        let index = InMemoryArtifacts::new().with_artifact("a.pdf", 10, now);
        let listed = index.artifacts();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "a.pdf");
        assert_eq!(listed[0].size, 10);
        assert_eq!(listed[0].modified, now);
    }
}
