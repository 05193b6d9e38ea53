//! Chunker configuration stored in `~/.config/cli-programs/chunkctl.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChunkError, Result};

/// Default soft limit on words per chunk.
pub const DEFAULT_MAX_CHUNK_WORDS: usize = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Soft word limit per chunk. A single paragraph above it still
    /// becomes its own chunk.
    #[serde(default = "default_max_chunk_words")]
    pub max_chunk_words: usize,
}

fn default_max_chunk_words() -> usize {
    DEFAULT_MAX_CHUNK_WORDS
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_words: default_max_chunk_words(),
        }
    }
}

impl ChunkerConfig {
    /// Build a config with an explicit limit, rejecting zero.
    pub fn new(max_chunk_words: usize) -> Result<Self> {
        let config = Self { max_chunk_words };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_words == 0 {
            return Err(ChunkError::InvalidMaxChunkWords(self.max_chunk_words));
        }
        Ok(())
    }

    /// Get the config file path: ~/.config/cli-programs/chunkctl.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ChunkError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("chunkctl.toml"))
    }

    /// Load config from the default location, returning defaults if the
    /// file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ChunkerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChunkerConfig::default();
        assert_eq!(config.max_chunk_words, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = ChunkerConfig::new(0).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidMaxChunkWords(0)));
    }

    #[test]
    fn test_config_path() {
        let path = ChunkerConfig::config_path();
        assert!(path.is_ok());
        assert!(path.unwrap().ends_with("cli-programs/chunkctl.toml"));
    }

    #[test]
    fn test_parse_config() {
        let config: ChunkerConfig = toml::from_str("max_chunk_words = 800").unwrap();
        assert_eq!(config.max_chunk_words, 800);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: ChunkerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChunkerConfig::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChunkerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.max_chunk_words, DEFAULT_MAX_CHUNK_WORDS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chunkctl.toml");

        ChunkerConfig::new(250).unwrap().save_to(&path).unwrap();
        let loaded = ChunkerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.max_chunk_words, 250);
    }

    #[test]
    fn test_load_rejects_zero_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunkctl.toml");
        fs::write(&path, "max_chunk_words = 0\n").unwrap();

        assert!(matches!(
            ChunkerConfig::load_from(&path),
            Err(ChunkError::InvalidMaxChunkWords(0))
        ));
    }
}
