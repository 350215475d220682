//! Presentation of search and artifact results.
//!
//! One adapter per output format: JSON bodies for API clients and small
//! self-contained HTML pages for browsers. Both the HTTP server and the
//! CLI's `--json` flag go through here, so the JSON shapes are identical
//! everywhere.

use anyhow::Result;
use minijinja::{context, Environment};
use serde::Serialize;

use crate::models::{ArtifactResult, MatchPolicy, SearchResult};

pub const NO_PDF_MESSAGE: &str = "No matching PDF found.";
pub const NO_PDFS_MESSAGE: &str = "No matching PDF files found.";

/// Output format requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Html,
}

impl OutputFormat {
    /// Picks the format from an explicit `format` parameter, falling back to
    /// the `Accept` header, then to `default`.
    pub fn negotiate(param: Option<&str>, accept: Option<&str>, default: OutputFormat) -> Self {
        match param.map(|p| p.trim().to_ascii_lowercase()) {
            Some(p) if p == "json" => return OutputFormat::Json,
            Some(p) if p == "html" => return OutputFormat::Html,
            _ => {}
        }
        match accept {
            Some(a) if a.contains("application/json") => OutputFormat::Json,
            Some(a) if a.contains("text/html") => OutputFormat::Html,
            _ => default,
        }
    }
}

// ============ JSON ============

#[derive(Serialize)]
struct LinkResponse<'a> {
    query: &'a str,
    link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Serialize)]
struct MatchedFile<'a> {
    filename: &'a str,
    url: &'a str,
    size: &'a str,
    modified: &'a str,
}

#[derive(Serialize)]
struct MatchedFilesResponse<'a> {
    query: &'a str,
    matched_files: Vec<MatchedFile<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// `{query, results: [{file, matches: [{line, snippet}]}]}`
pub fn search_value(result: &SearchResult) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(result)?)
}

pub fn search_json(result: &SearchResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// `{query, link}` for best match, `{query, matched_files}` for multi-term.
///
/// An empty result adds a `message` field.
pub fn artifacts_value(result: &ArtifactResult) -> Result<serde_json::Value> {
    let value = match result.policy {
        MatchPolicy::BestMatch => {
            let link = result.best().map(|m| m.url.as_str());
            serde_json::to_value(LinkResponse {
                query: &result.query,
                link,
                message: link.is_none().then_some(NO_PDF_MESSAGE),
            })?
        }
        MatchPolicy::MultiTerm => serde_json::to_value(MatchedFilesResponse {
            query: &result.query,
            matched_files: result
                .matches
                .iter()
                .map(|m| MatchedFile {
                    filename: &m.filename,
                    url: &m.url,
                    size: &m.size,
                    modified: &m.modified,
                })
                .collect(),
            message: result.is_empty().then_some(NO_PDFS_MESSAGE),
        })?,
    };
    Ok(value)
}

pub fn artifacts_json(result: &ArtifactResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&artifacts_value(result)?)?)
}

// ============ HTML ============

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const SEARCH_TEMPLATE: &str = include_str!("../templates/search.html");
const PDF_RESULTS_TEMPLATE: &str = include_str!("../templates/pdf_results.html");

/// Builds the template environment for every HTML page.
///
/// Templates are registered under `.html` names, so every interpolated
/// value is HTML-escaped.
pub fn templates() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE_TEMPLATE)?;
    env.add_template("index.html", INDEX_TEMPLATE)?;
    env.add_template("search.html", SEARCH_TEMPLATE)?;
    env.add_template("pdf_results.html", PDF_RESULTS_TEMPLATE)?;
    Ok(env)
}

/// The landing page with the search form.
pub fn index_html(env: &Environment<'_>) -> Result<String> {
    Ok(env.get_template("index.html")?.render(context! {})?)
}

pub fn search_html(env: &Environment<'_>, result: &SearchResult) -> Result<String> {
    let html = env.get_template("search.html")?.render(context! {
        query => &result.query,
        results => &result.results,
    })?;
    Ok(html)
}

pub fn artifacts_html(env: &Environment<'_>, result: &ArtifactResult) -> Result<String> {
    let html = env.get_template("pdf_results.html")?.render(context! {
        query => &result.query,
        matches => &result.matches,
    })?;
    Ok(html)
}
