//! Chapter versions: the record written for each save of a chapter.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::chunker::{ContentChunk, chunk_content, reassemble, reassemble_strict};
use crate::config::ChunkerConfig;
use crate::error::{ChunkError, Result};
use crate::words::count_words;

/// One saved revision of a chapter and the chunks it was split into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterVersion {
    /// Identifier of the chapter this version belongs to
    pub chapter_id: String,
    /// Revision number, starting at 1
    pub version: u32,
    /// First 16 hex characters of the SHA-256 of the source HTML
    pub content_hash: String,
    /// Words in the whole chapter
    pub word_count: usize,
    /// Limit the chunks were packed against
    pub max_chunk_words: usize,
    pub created_at: DateTime<Utc>,
    pub chunks: Vec<ContentChunk>,
}

/// Figures kept alongside a chapter for listings and reading-time estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMetrics {
    pub word_count: usize,
    pub chunk_count: usize,
    pub largest_chunk_words: usize,
    /// Chunks above the limit (single oversized paragraphs)
    pub oversized_chunks: usize,
}

/// Hash chapter HTML for change detection.
pub fn content_hash(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}

impl ChapterVersion {
    /// Chunk `html` as version 1 of `chapter_id`.
    pub fn build(chapter_id: &str, html: &str, config: &ChunkerConfig) -> Result<Self> {
        Self::build_numbered(chapter_id, 1, html, config)
    }

    fn build_numbered(
        chapter_id: &str,
        version: u32,
        html: &str,
        config: &ChunkerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let chunks = chunk_content(html, config.max_chunk_words);
        let word_count = count_words(html);
        debug!(
            "chapter {} v{}: {} words in {} chunks",
            chapter_id,
            version,
            word_count,
            chunks.len()
        );

        Ok(Self {
            chapter_id: chapter_id.to_string(),
            version,
            content_hash: content_hash(html),
            word_count,
            max_chunk_words: config.max_chunk_words,
            created_at: Utc::now(),
            chunks,
        })
    }

    /// Re-chunk edited content from scratch as the following version.
    pub fn next(&self, html: &str, config: &ChunkerConfig) -> Result<Self> {
        let version = self
            .version
            .checked_add(1)
            .ok_or(ChunkError::VersionOverflow(self.version))?;
        Self::build_numbered(&self.chapter_id, version, html, config)
    }

    /// Like [`next`](Self::next), but keeps this version when neither the
    /// content nor the limit changed.
    pub fn next_if_changed(&self, html: &str, config: &ChunkerConfig) -> Result<Option<Self>> {
        if self.is_unchanged(html) && self.max_chunk_words == config.max_chunk_words {
            info!(
                "chapter {} unchanged, keeping version {}",
                self.chapter_id, self.version
            );
            return Ok(None);
        }
        self.next(html, config).map(Some)
    }

    pub fn is_unchanged(&self, html: &str) -> bool {
        self.content_hash == content_hash(html)
    }

    /// HTML for the editor, rebuilt from the chunks.
    pub fn content(&self) -> String {
        reassemble(&self.chunks)
    }

    /// Same as [`content`](Self::content) but fails on a broken index sequence.
    pub fn content_strict(&self) -> Result<String> {
        reassemble_strict(&self.chunks)
    }

    pub fn metrics(&self) -> ChapterMetrics {
        ChapterMetrics {
            word_count: self.word_count,
            chunk_count: self.chunks.len(),
            largest_chunk_words: self.chunks.iter().map(|c| c.word_count).max().unwrap_or(0),
            oversized_chunks: self
                .chunks
                .iter()
                .filter(|c| c.word_count > self.max_chunk_words)
                .count(),
        }
    }

    /// Read a version previously written with [`write_to`](Self::write_to).
    pub fn read_from(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = "<p>Hello world</p><p>Second paragraph here</p>";

    #[test]
    fn test_build_first_version() {
        let version = ChapterVersion::build("ch-1", HTML, &ChunkerConfig::default()).unwrap();
        assert_eq!(version.chapter_id, "ch-1");
        assert_eq!(version.version, 1);
        assert_eq!(version.word_count, 5);
        assert_eq!(version.chunks.len(), 1);
        assert_eq!(version.content_hash.len(), 16);
        assert_eq!(version.max_chunk_words, 1500);
    }

    #[test]
    fn test_build_rejects_zero_limit() {
        let config = ChunkerConfig { max_chunk_words: 0 };
        assert!(matches!(
            ChapterVersion::build("ch-1", HTML, &config),
            Err(ChunkError::InvalidMaxChunkWords(0))
        ));
    }

    #[test]
    fn test_empty_chapter() {
        let version = ChapterVersion::build("ch-1", "", &ChunkerConfig::default()).unwrap();
        assert!(version.chunks.is_empty());
        assert_eq!(version.word_count, 0);
        assert_eq!(version.content(), "");
    }

    #[test]
    fn test_content_hash_stable() {
        assert_eq!(content_hash(HTML), content_hash(HTML));
        assert_ne!(content_hash(HTML), content_hash("<p>Hello</p>"));
    }

    #[test]
    fn test_next_bumps_version_and_rechunks() {
        let config = ChunkerConfig::new(3).unwrap();
        let v1 = ChapterVersion::build("ch-1", HTML, &config).unwrap();
        assert_eq!(v1.chunks.len(), 2);

        let v2 = v1.next("<p>Rewritten</p>", &config).unwrap();
        assert_eq!(v2.version, 2);
        assert_eq!(v2.chapter_id, "ch-1");
        assert_eq!(v2.chunks.len(), 1);
        assert_eq!(v2.word_count, 1);
        assert_ne!(v1.content_hash, v2.content_hash);
    }

    #[test]
    fn test_next_at_last_version_number_fails() {
        let config = ChunkerConfig::default();
        let mut stored = ChapterVersion::build("ch-1", HTML, &config).unwrap();
        stored.version = u32::MAX;

        assert!(matches!(
            stored.next("<p>b</p>", &config),
            Err(ChunkError::VersionOverflow(u32::MAX))
        ));
        assert!(stored.next_if_changed("<p>b</p>", &config).is_err());
    }

    #[test]
    fn test_next_if_changed() {
        let config = ChunkerConfig::default();
        let v1 = ChapterVersion::build("ch-1", HTML, &config).unwrap();

        assert!(v1.is_unchanged(HTML));
        assert!(v1.next_if_changed(HTML, &config).unwrap().is_none());

        let v2 = v1.next_if_changed("<p>Edited</p>", &config).unwrap();
        assert_eq!(v2.map(|v| v.version), Some(2));
    }

    #[test]
    fn test_new_limit_forces_new_version() {
        let v1 = ChapterVersion::build("ch-1", HTML, &ChunkerConfig::default()).unwrap();
        let v2 = v1
            .next_if_changed(HTML, &ChunkerConfig::new(2).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(v2.version, 2);
        assert_eq!(v2.max_chunk_words, 2);
        assert_eq!(v2.chunks.len(), 2);
    }

    #[test]
    fn test_metrics() {
        let html = format!("<p>a b</p>{}<p>c</p>", "<p>x x x x x x</p>");
        let version =
            ChapterVersion::build("ch-1", &html, &ChunkerConfig::new(4).unwrap()).unwrap();
        let metrics = version.metrics();

        assert_eq!(metrics.word_count, 9);
        assert_eq!(metrics.chunk_count, 3);
        assert_eq!(metrics.largest_chunk_words, 6);
        assert_eq!(metrics.oversized_chunks, 1);
    }

    #[test]
    fn test_content_strict_detects_gap() {
        let mut version =
            ChapterVersion::build("ch-1", HTML, &ChunkerConfig::new(2).unwrap()).unwrap();
        assert!(version.content_strict().is_ok());

        version.chunks[1].index = 5;
        assert!(version.content_strict().is_err());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ch-1.json");
        let version = ChapterVersion::build("ch-1", HTML, &ChunkerConfig::default()).unwrap();

        version.write_to(&path, true).unwrap();
        let loaded = ChapterVersion::read_from(&path).unwrap();
        assert_eq!(loaded, version);
    }

    #[test]
    fn test_json_field_names() {
        let version = ChapterVersion::build("ch-1", HTML, &ChunkerConfig::default()).unwrap();
        let json = version.to_json(false).unwrap();
        assert!(json.contains("\"chapterId\":\"ch-1\""));
        assert!(json.contains("\"wordCount\":5"));
        assert!(json.contains("\"maxChunkWords\":1500"));
        assert!(json.contains("\"createdAt\""));
    }
}
