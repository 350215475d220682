use anyhow::Result;

use crate::config::Config;
use crate::connector_fs::{FsArtifacts, FsCorpus};
use crate::traits::{ArtifactIndex, CorpusProvider};

/// Health of one configured collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub name: &'static str,
    pub root: String,
    pub healthy: bool,
    pub count: usize,
}

pub fn get_sources(config: &Config) -> Result<Vec<SourceStatus>> {
    let corpus = FsCorpus::from_config(&config.corpus)?;
    let artifacts = FsArtifacts::from_config(&config.artifacts);

    Ok(vec![
        SourceStatus {
            name: "corpus",
            root: corpus.root().display().to_string(),
            healthy: corpus.root().is_dir(),
            count: corpus.documents().len(),
        },
        SourceStatus {
            name: "artifacts",
            root: artifacts.root().display().to_string(),
            healthy: artifacts.root().is_dir(),
            count: artifacts.artifacts().len(),
        },
    ])
}

pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<12} {:<10} {:<8} ROOT", "SOURCE", "STATUS", "FILES");
    for source in get_sources(config)? {
        let status = if source.healthy { "OK" } else { "MISSING" };
        println!(
            "{:<12} {:<10} {:<8} {}",
            source.name, status, source.count, source.root
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArtifactsConfig, CorpusConfig};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_get_sources_counts_files() {
        let tmp = TempDir::new().unwrap();
        let texts = tmp.path().join("texts");
        fs::create_dir(&texts).unwrap();
        fs::write(texts.join("a.txt"), "a").unwrap();
        fs::write(texts.join("b.txt"), "b").unwrap();

        let config = Config {
            corpus: CorpusConfig {
                root: texts,
                ..CorpusConfig::default()
            },
            artifacts: ArtifactsConfig {
                root: tmp.path().join("missing"),
                ..ArtifactsConfig::default()
            },
            ..Config::default()
        };

        let sources = get_sources(&config).unwrap();
        assert_eq!(sources[0].name, "corpus");
        assert!(sources[0].healthy);
        assert_eq!(sources[0].count, 2);
        assert_eq!(sources[1].name, "artifacts");
        assert!(!sources[1].healthy);
        assert_eq!(sources[1].count, 0);
    }
}
