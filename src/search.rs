//! Document search: line-level substring matching over the text corpus.
//!
//! Every line whose normalized form contains the normalized query is
//! reported with its 1-based line number and a bounded snippet. There is no
//! index; each query scans the corpus as it is on disk at that moment.
//!
//! Results keep the corpus provider's enumeration order. They are not
//! ranked.

use anyhow::Result;

use crate::config::Config;
use crate::connector_fs::FsCorpus;
use crate::models::{Document, DocumentMatch, MatchLine, Query, SearchResult};
use crate::normalize::normalize;
use crate::render;
use crate::traits::CorpusProvider;

/// Maximum number of characters of a line kept in a snippet.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Builds the snippet for a matching line.
///
/// The line is trimmed, cut to [`SNIPPET_MAX_CHARS`] characters and always
/// framed as `... <text> ...`, whether or not it was cut.
pub fn make_snippet(line: &str) -> String {
    let text: String = line.trim().chars().take(SNIPPET_MAX_CHARS).collect();
    format!("... {} ...", text)
}

/// Scans `lines` and returns a [`MatchLine`] for every line containing the query.
pub fn search_lines<S: AsRef<str>>(lines: &[S], query: &Query) -> Vec<MatchLine> {
    let needle = query.normalized();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| normalize(line.as_ref()).contains(needle))
        .map(|(idx, line)| MatchLine {
            line: idx + 1,
            snippet: make_snippet(line.as_ref()),
        })
        .collect()
}

pub fn search_document(doc: &Document, query: &Query) -> Vec<MatchLine> {
    search_lines(&doc.lines, query)
}

/// Runs the query against every document of `corpus`.
///
/// Documents without matches are left out. A document that cannot be
/// loaded is logged and skipped; it never aborts the rest of the scan.
pub fn scan_corpus(corpus: &dyn CorpusProvider, query: &Query) -> SearchResult {
    let mut results = Vec::new();

    for name in corpus.documents() {
        let doc = match corpus.load(&name) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(document = %name, error = %e, "skipping unreadable document");
                continue;
            }
        };

        let matches = search_document(&doc, query);
        if !matches.is_empty() {
            results.push(DocumentMatch {
                file: doc.name,
                matches,
            });
        }
    }

    tracing::debug!(
        query = query.as_str(),
        documents = results.len(),
        "document search finished"
    );

    SearchResult {
        query: query.as_str().to_string(),
        results,
    }
}

/// Searches the configured filesystem corpus.
///
/// Used by both the `mip-search search` CLI command and the HTTP server.
pub fn search_documents(config: &Config, query: &Query) -> Result<SearchResult> {
    let corpus = FsCorpus::from_config(&config.corpus)?;
    Ok(scan_corpus(&corpus, query))
}

/// CLI entry point for `mip-search search`.
pub fn run_search(config: &Config, raw_query: &str, json: bool) -> Result<()> {
    let query = Query::parse(raw_query)?;
    let result = search_documents(config, &query)?;

    if json {
        println!("{}", render::search_json(&result)?);
        return Ok(());
    }

    if result.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for doc in &result.results {
        println!("{} ({} matches)", doc.file, doc.matches.len());
        for m in &doc.matches {
            println!("    {:>5}: {}", m.line, m.snippet);
        }
        println!();
    }

    Ok(())
}
