//! TOML configuration.
//!
//! Every section is optional; an empty file yields a configuration that
//! searches `./mip_texts/*.txt` and resolves PDFs from `./static/mip_pdfs`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::connector_fs::build_globset;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the plain-text documents live.
#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_corpus_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_corpus_root() -> PathBuf {
    PathBuf::from("./mip_texts")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.txt".to_string()]
}

/// Where the downloadable PDFs live and how they are linked.
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_root")]
    pub root: PathBuf,
    /// File extensions (without the dot) considered artifacts.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Prefix of download links; also the route the server mounts the root on
    /// when it is a path rather than an absolute URL.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root: default_artifacts_root(),
            extensions: default_extensions(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_artifacts_root() -> PathBuf {
    PathBuf::from("./static/mip_pdfs")
}
fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}
fn default_url_prefix() -> String {
    "/static/mip_pdfs".to_string()
}

impl ArtifactsConfig {
    /// The local route for static downloads, if the prefix is a path.
    pub fn mount_path(&self) -> Option<&str> {
        let prefix = self.url_prefix.trim_end_matches('/');
        if prefix.starts_with('/') && !prefix.is_empty() {
            Some(prefix)
        } else {
            None
        }
    }
}

/// Thresholds of the two artifact matching policies.
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum whole-query ratio (0.0–1.0) for the best-match policy.
    #[serde(default = "default_best_match_cutoff")]
    pub best_match_cutoff: f64,
    /// Minimum per-term partial score (0–100) for the multi-term policy.
    #[serde(default = "default_partial_threshold")]
    pub partial_threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            best_match_cutoff: default_best_match_cutoff(),
            partial_threshold: default_partial_threshold(),
        }
    }
}

fn default_best_match_cutoff() -> f64 {
    0.3
}
fn default_partial_threshold() -> u8 {
    70
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !(0.0..=1.0).contains(&config.matching.best_match_cutoff) {
        anyhow::bail!("matching.best_match_cutoff must be in [0.0, 1.0]");
    }

    if config.matching.partial_threshold > 100 {
        anyhow::bail!("matching.partial_threshold must be in [0, 100]");
    }

    if config.corpus.include_globs.is_empty() {
        anyhow::bail!("corpus.include_globs must not be empty");
    }
    build_globset(&config.corpus.include_globs).context("corpus.include_globs")?;
    build_globset(&config.corpus.exclude_globs).context("corpus.exclude_globs")?;

    if config.artifacts.extensions.is_empty() {
        anyhow::bail!("artifacts.extensions must not be empty");
    }

    let prefix = &config.artifacts.url_prefix;
    if !(prefix.starts_with('/') || prefix.starts_with("http://") || prefix.starts_with("https://"))
    {
        anyhow::bail!(
            "artifacts.url_prefix must be a path starting with '/' or an http(s) URL, got '{}'",
            prefix
        );
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.corpus.root, PathBuf::from("./mip_texts"));
        assert_eq!(cfg.corpus.include_globs, vec!["*.txt"]);
        assert_eq!(cfg.artifacts.extensions, vec!["pdf"]);
        assert_eq!(cfg.artifacts.url_prefix, "/static/mip_pdfs");
        assert!((cfg.matching.best_match_cutoff - 0.3).abs() < 1e-9);
        assert_eq!(cfg.matching.partial_threshold, 70);
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[corpus]
root = "/data/texts"

[matching]
partial_threshold = 85
"#,
        )
        .unwrap();
        assert_eq!(cfg.corpus.root, PathBuf::from("/data/texts"));
        assert_eq!(cfg.corpus.include_globs, vec!["*.txt"]);
        assert_eq!(cfg.matching.partial_threshold, 85);
        assert!((cfg.matching.best_match_cutoff - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_out_of_range_cutoff() {
        let err = parse_config("[matching]\nbest_match_cutoff = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("best_match_cutoff"));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = parse_config("[matching]\npartial_threshold = 120\n").unwrap_err();
        assert!(err.to_string().contains("partial_threshold"));
    }

    #[test]
    fn test_rejects_bad_url_prefix() {
        let err = parse_config("[artifacts]\nurl_prefix = \"static\"\n").unwrap_err();
        assert!(err.to_string().contains("url_prefix"));
    }

    #[test]
    fn test_rejects_invalid_glob() {
        let err = parse_config("[corpus]\ninclude_globs = [\"[abc\"]\n").unwrap_err();
        assert!(err.to_string().contains("include_globs"));
        assert!(format!("{:#}", err).contains("Invalid glob pattern '[abc'"));

        let err = parse_config("[corpus]\nexclude_globs = [\"{a,b\"]\n").unwrap_err();
        assert!(err.to_string().contains("exclude_globs"));
    }

    #[test]
    fn test_mount_path() {
        let mut artifacts = ArtifactsConfig::default();
        assert_eq!(artifacts.mount_path(), Some("/static/mip_pdfs"));

        artifacts.url_prefix = "https://cdn.example.org/pdfs".to_string();
        assert_eq!(artifacts.mount_path(), None);

        artifacts.url_prefix = "/".to_string();
        assert_eq!(artifacts.mount_path(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/mip.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
