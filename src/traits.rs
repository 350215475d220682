//! Collaborator traits consumed by the matching engine.
//!
//! The engine never touches the filesystem directly. Document search reads
//! through a [`CorpusProvider`]; artifact resolution reads through an
//! [`ArtifactIndex`]. The built-in implementations live in
//! [`connector_fs`](crate::connector_fs) (directories on disk) and
//! [`memory`](crate::memory) (fixtures).
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │  CorpusProvider  │      │  ArtifactIndex   │
//! │  FsCorpus / mem  │      │ FsArtifacts / mem│
//! └────────┬─────────┘      └────────┬─────────┘
//!          ▼                         ▼
//!    scan_corpus()            match_artifacts()
//! ```
//!
//! # Example
//!
//! ```rust
//! use anyhow::Result;
//! use mip_search::models::{Document, Query};
//! use mip_search::search::scan_corpus;
//! use mip_search::traits::CorpusProvider;
//!
//! struct OneDoc;
//!
//! impl CorpusProvider for OneDoc {
//!     fn documents(&self) -> Vec<String> {
//!         vec!["notes.txt".to_string()]
//!     }
//!
//!     fn load(&self, name: &str) -> Result<Document> {
//!         Ok(Document {
//!             name: name.to_string(),
//!             lines: vec!["Residence permits".to_string()],
//!         })
//!     }
//! }
//!
//! let query = Query::parse("permit").unwrap();
//! let result = scan_corpus(&OneDoc, &query);
//! assert_eq!(result.results[0].file, "notes.txt");
//! ```

use anyhow::Result;

use crate::models::{Artifact, Document};

/// An enumerable set of text documents.
///
/// Implementations are read fresh on every query; nothing is cached
/// between calls.
pub trait CorpusProvider: Send + Sync {
    /// Names of every document, in the provider's natural order.
    ///
    /// The scanner reports matches in exactly this order.
    fn documents(&self) -> Vec<String>;

    /// Loads one document by name.
    ///
    /// A failure here only drops this document from the current scan.
    fn load(&self, name: &str) -> Result<Document>;
}

/// An enumerable set of named, sized, timestamped files.
pub trait ArtifactIndex: Send + Sync {
    /// Every artifact, in the index's natural order.
    ///
    /// Ties in modification time keep this order in the final result.
    fn artifacts(&self) -> Vec<Artifact>;
}
