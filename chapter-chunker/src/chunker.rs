//! Greedy paragraph packing and reassembly.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, Result};
use crate::segment::segments;
use crate::words::count_words;

/// Separator placed between paragraphs inside one chunk.
pub const PARAGRAPH_JOIN: &str = "\n";

/// A bounded-size fragment of a chapter's HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChunk {
    /// HTML of one or more whole paragraphs
    pub content: String,
    /// Words across the chunk's paragraphs
    pub word_count: usize,
    /// Position within the chapter version, starting at 0
    pub index: usize,
}

impl ContentChunk {
    pub fn new(content: String, word_count: usize, index: usize) -> Self {
        Self {
            content,
            word_count,
            index,
        }
    }
}

/// Iterator over the chunks of one chapter.
///
/// The input is segmented up front in [`Chunks::new`]; packing happens on
/// demand, one chunk per call to `next`. Paragraphs are packed in document order until the next one would push
/// the running word count past the limit. A paragraph is never split, so
/// one that is larger than the limit on its own becomes a chunk by itself.
#[derive(Debug)]
pub struct Chunks {
    segments: std::vec::IntoIter<String>,
    max_chunk_words: usize,
    parts: Vec<String>,
    words: usize,
    next_index: usize,
}

impl Chunks {
    pub fn new(html: &str, max_chunk_words: usize) -> Self {
        Self {
            segments: segments(html).into_iter(),
            max_chunk_words,
            parts: Vec::new(),
            words: 0,
            next_index: 0,
        }
    }

    fn flush(&mut self) -> ContentChunk {
        let chunk = ContentChunk::new(
            self.parts.join(PARAGRAPH_JOIN),
            self.words,
            self.next_index,
        );
        debug!(
            "flushed chunk {} ({} paragraphs, {} words)",
            chunk.index,
            self.parts.len(),
            chunk.word_count
        );

        self.parts.clear();
        self.words = 0;
        self.next_index += 1;
        chunk
    }
}

impl Iterator for Chunks {
    type Item = ContentChunk;

    fn next(&mut self) -> Option<ContentChunk> {
        while let Some(segment) = self.segments.next() {
            let segment_words = count_words(&segment);
            trace!("segment with {} words", segment_words);

            let flushed = if self.words + segment_words > self.max_chunk_words
                && !self.parts.is_empty()
            {
                Some(self.flush())
            } else {
                None
            };

            self.parts.push(segment);
            self.words += segment_words;

            if flushed.is_some() {
                return flushed;
            }
        }

        if self.parts.is_empty() {
            None
        } else {
            Some(self.flush())
        }
    }
}

/// Split chapter HTML into ordered chunks of at most `max_chunk_words`
/// words (soft limit, see [`Chunks`]).
pub fn chunk_content(html: &str, max_chunk_words: usize) -> Vec<ContentChunk> {
    Chunks::new(html, max_chunk_words).collect()
}

/// Rebuild chapter HTML from its chunks.
///
/// Chunks are ordered by index first. Contents are concatenated with no
/// separator, so paragraphs that met at a chunk boundary lose the newline
/// they had inside a chunk.
pub fn reassemble(chunks: &[ContentChunk]) -> String {
    let mut ordered: Vec<&ContentChunk> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.index);
    ordered.iter().map(|c| c.content.as_str()).collect()
}

/// Check that indices are exactly `0..n-1`, each once, in any order.
pub fn validate_sequence(chunks: &[ContentChunk]) -> Result<()> {
    let mut indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
    indices.sort_unstable();

    for (expected, &found) in indices.iter().enumerate() {
        if found < expected {
            return Err(ChunkError::DuplicateIndex(found));
        }
        if found > expected {
            return Err(ChunkError::MissingIndex { expected, found });
        }
    }

    Ok(())
}

/// [`validate_sequence`] followed by [`reassemble`].
pub fn reassemble_strict(chunks: &[ContentChunk]) -> Result<String> {
    validate_sequence(chunks)?;
    Ok(reassemble(chunks))
}
