//! Fuzzy artifact resolution: mapping noisy queries to PDF filenames.
//!
//! Two selection policies are supported:
//!
//! | Policy | Score | Accepts |
//! |--------|-------|---------|
//! | [`MatchPolicy::BestMatch`] | [`ratio`] of the whole query vs. the filename, 0–1 | the single best candidate scoring ≥ `best_match_cutoff` |
//! | [`MatchPolicy::MultiTerm`] | best [`partial_ratio`] of any query term vs. the filename, 0–100 | every candidate scoring ≥ `partial_threshold` |
//!
//! Query and filenames are both normalized before scoring. Accepted
//! artifacts are decorated with a download URL, a human-readable size and
//! a formatted modification time, then sorted most recent first.

use anyhow::Result;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::{ArtifactsConfig, Config, MatchingConfig};
use crate::connector_fs::FsArtifacts;
use crate::models::{Artifact, ArtifactMatch, ArtifactResult, MatchPolicy, Query};
use crate::normalize::normalize;
use crate::render;
use crate::similarity::{partial_ratio, ratio};
use crate::traits::ArtifactIndex;

/// Characters escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with the largest fitting unit, one decimal place.
///
/// ```
/// use mip_search::artifacts::format_size;
///
/// assert_eq!(format_size(153_600), "150.0 KB");
/// assert_eq!(format_size(512), "512.0 B");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

pub fn format_modified(modified: &DateTime<Utc>) -> String {
    modified.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Download link for `filename` under `url_prefix`.
pub fn download_url(url_prefix: &str, filename: &str) -> String {
    format!(
        "{}/{}",
        url_prefix.trim_end_matches('/'),
        utf8_percent_encode(filename, PATH_SEGMENT)
    )
}

/// Whole-query similarity of `filename`, 0–1.
pub fn best_match_score(query: &Query, filename: &str) -> f64 {
    ratio(query.normalized(), &normalize(filename))
}

/// Best per-term partial similarity of `filename`, 0–100.
///
/// Zero when the query has no terms.
pub fn multi_term_score(query: &Query, filename: &str) -> u8 {
    let name = normalize(filename);
    query
        .terms()
        .iter()
        .map(|term| partial_ratio(term, &name))
        .max()
        .unwrap_or(0)
}

/// Selects the artifacts of `index` that satisfy `policy`.
pub fn match_artifacts(
    index: &dyn ArtifactIndex,
    query: &Query,
    policy: MatchPolicy,
    matching: &MatchingConfig,
    artifacts: &ArtifactsConfig,
) -> ArtifactResult {
    let candidates = index.artifacts();

    let accepted: Vec<(Artifact, f64)> = match policy {
        MatchPolicy::BestMatch => select_best(candidates, query, matching.best_match_cutoff)
            .into_iter()
            .collect(),
        MatchPolicy::MultiTerm => {
            select_multi_term(candidates, query, matching.partial_threshold)
        }
    };

    let mut matches: Vec<ArtifactMatch> = accepted
        .into_iter()
        .map(|(artifact, score)| ArtifactMatch {
            url: download_url(&artifacts.url_prefix, &artifact.filename),
            size: format_size(artifact.size),
            size_bytes: artifact.size,
            modified: format_modified(&artifact.modified),
            modified_at: artifact.modified,
            filename: artifact.filename,
            score,
        })
        .collect();

    // Stable: equal timestamps keep enumeration order
    matches.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

    tracing::debug!(
        query = query.as_str(),
        ?policy,
        accepted = matches.len(),
        "artifact resolution finished"
    );

    ArtifactResult {
        query: query.as_str().to_string(),
        policy,
        matches,
    }
}

/// Highest-scoring candidate at or above `cutoff`; the first one wins ties.
fn select_best(candidates: Vec<Artifact>, query: &Query, cutoff: f64) -> Option<(Artifact, f64)> {
    let mut best: Option<(Artifact, f64)> = None;
    for artifact in candidates {
        let score = best_match_score(query, &artifact.filename);
        if score < cutoff {
            continue;
        }
        if best.as_ref().map_or(true, |(_, top)| score > *top) {
            best = Some((artifact, score));
        }
    }
    best
}

fn select_multi_term(
    candidates: Vec<Artifact>,
    query: &Query,
    threshold: u8,
) -> Vec<(Artifact, f64)> {
    candidates
        .into_iter()
        .filter_map(|artifact| {
            let score = multi_term_score(query, &artifact.filename);
            (score >= threshold).then(|| (artifact, f64::from(score)))
        })
        .collect()
}

/// Resolves the query against the configured artifact directory.
///
/// Used by both the `mip-search pdf` CLI command and the HTTP server.
pub fn resolve_artifacts(config: &Config, query: &Query, policy: MatchPolicy) -> ArtifactResult {
    let index = FsArtifacts::from_config(&config.artifacts);
    match_artifacts(&index, query, policy, &config.matching, &config.artifacts)
}

/// CLI entry point for `mip-search pdf`.
pub fn run_resolve(config: &Config, raw_query: &str, policy: &str, json: bool) -> Result<()> {
    let query = Query::parse(raw_query)?;
    let policy: MatchPolicy = policy.parse()?;
    let result = resolve_artifacts(config, &query, policy);

    if json {
        println!("{}", render::artifacts_json(&result)?);
        return Ok(());
    }

    if result.is_empty() {
        println!("No matching PDF found.");
        return Ok(());
    }

    for (i, m) in result.matches.iter().enumerate() {
        println!("{}. {}", i + 1, m.filename);
        println!("    score: {}", format_score(policy, m.score));
        println!("    size: {}", m.size);
        println!("    modified: {}", m.modified);
        println!("    url: {}", m.url);
        println!();
    }

    Ok(())
}

fn format_score(policy: MatchPolicy, score: f64) -> String {
    match policy {
        MatchPolicy::BestMatch => format!("{:.2}", score),
        MatchPolicy::MultiTerm => format!("{:.0}", score),
    }
}
