//! Core data models used throughout mip-search.
//!
//! These types represent the documents, artifacts, queries and match
//! results that flow between the providers, the matching engine and the
//! presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::QueryError;
use crate::normalize::normalize;

/// A validated, non-empty query.
///
/// The original text (trimmed) is kept for echoing back to callers; the
/// normalized form is what the engines compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    normalized: String,
}

impl Query {
    /// Trims `raw` and rejects it if nothing is left.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self {
            text: text.to_string(),
            normalized: normalize(text),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whitespace-delimited terms of the normalized query.
    pub fn terms(&self) -> Vec<&str> {
        self.normalized.split_whitespace().collect()
    }
}

/// A text document loaded from a corpus provider.
#[derive(Debug, Clone)]
pub struct Document {
    /// Name relative to the corpus root (e.g. `visa.txt`).
    pub name: String,
    pub lines: Vec<String>,
}

/// A stored file addressable by filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// One matching line inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLine {
    /// 1-based line number.
    pub line: usize,
    pub snippet: String,
}

/// All matching lines of one document, in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatch {
    pub file: String,
    pub matches: Vec<MatchLine>,
}

/// Result of a document search, in corpus enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub results: Vec<DocumentMatch>,
}

/// How candidate artifacts are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Whole-query similarity; keep only the single best candidate.
    BestMatch,
    /// Per-term partial similarity; keep every candidate that clears the threshold.
    MultiTerm,
}

impl std::str::FromStr for MatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best" | "best_match" => Ok(MatchPolicy::BestMatch),
            "multi" | "multi_term" => Ok(MatchPolicy::MultiTerm),
            other => anyhow::bail!("Unknown match policy: {}. Use best or multi.", other),
        }
    }
}

/// An artifact that cleared the active matching policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactMatch {
    pub filename: String,
    /// Similarity score on the policy's own scale (0–1 for best match, 0–100 for multi-term).
    pub score: f64,
    pub url: String,
    pub size_bytes: u64,
    /// Human readable size, e.g. `150.0 KB`.
    pub size: String,
    pub modified_at: DateTime<Utc>,
    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub modified: String,
}

/// Result of an artifact resolution, most recently modified first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactResult {
    pub query: String,
    pub policy: MatchPolicy,
    pub matches: Vec<ArtifactMatch>,
}

impl ArtifactResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The single accepted artifact under [`MatchPolicy::BestMatch`].
    pub fn best(&self) -> Option<&ArtifactMatch> {
        self.matches.first()
    }
}
