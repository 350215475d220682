//! Filesystem-backed providers.
//!
//! [`FsCorpus`] walks the corpus root and serves every file matching the
//! include globs as a [`Document`]. [`FsArtifacts`] lists the files directly
//! inside the artifact root whose extension is configured.
//!
//! Both re-read the disk on every call, so a query always sees the files
//! as they are at that moment.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{ArtifactsConfig, CorpusConfig};
use crate::models::{Artifact, Document};
use crate::traits::{ArtifactIndex, CorpusProvider};

pub struct FsCorpus {
    root: PathBuf,
    include_set: GlobSet,
    exclude_set: GlobSet,
    follow_symlinks: bool,
}

impl FsCorpus {
    pub fn from_config(config: &CorpusConfig) -> Result<Self> {
        let include_set = build_globset(&config.include_globs)?;

        let mut default_excludes = vec!["**/.git/**".to_string(), "**/.*".to_string()];
        default_excludes.extend(config.exclude_globs.clone());
        let exclude_set = build_globset(&default_excludes)?;

        Ok(Self {
            root: config.root.clone(),
            include_set,
            exclude_set,
            follow_symlinks: config.follow_symlinks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CorpusProvider for FsCorpus {
    fn documents(&self) -> Vec<String> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "corpus root does not exist");
            return Vec::new();
        }

        let mut names = Vec::new();
        let walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable corpus entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().replace('\\', "/");

            if self.exclude_set.is_match(&rel_str) {
                continue;
            }
            if !self.include_set.is_match(&rel_str) {
                continue;
            }

            names.push(rel_str);
        }

        // Sort for deterministic ordering
        names.sort();
        names
    }

    fn load(&self, name: &str) -> Result<Document> {
        let path = self.root.join(name);
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(Document {
            name: name.to_string(),
            lines: split_lines(&decode_lossy(&bytes)),
        })
    }
}

pub struct FsArtifacts {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsArtifacts {
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self {
            root: config.root.clone(),
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn has_artifact_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

impl ArtifactIndex for FsArtifacts {
    fn artifacts(&self) -> Vec<Artifact> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "cannot list artifact root");
                return Vec::new();
            }
        };

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable artifact entry");
                    continue;
                }
            };

            let path = entry.path();
            if !self.has_artifact_extension(&path) {
                continue;
            }

            match file_to_artifact(&path) {
                Ok(Some(artifact)) => artifacts.push(artifact),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping artifact");
                }
            }
        }

        artifacts.sort_by(|a, b| a.filename.cmp(&b.filename));
        artifacts
    }
}

fn file_to_artifact(path: &Path) -> Result<Option<Artifact>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let filename = match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return Ok(None),
    };

    let modified = metadata
        .modified()
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH);

    Ok(Some(Artifact {
        filename,
        size: metadata.len(),
        modified: DateTime::<Utc>::from(modified),
    }))
}

/// Decodes UTF-8, silently dropping any invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Splits on `\n`, `\r\n` and lone `\r`, without a trailing empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_string)
        .collect()
}

pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid glob pattern '{}'", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
