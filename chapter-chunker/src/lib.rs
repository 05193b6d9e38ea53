//! Chapter content chunking for the story publishing workspace
//!
//! Chapter bodies arrive as editor HTML and are stored as a sequence of
//! bounded-size chunks under a chapter version:
//! - word counting over markup ([`count_words`])
//! - paragraph segmentation ([`segments`])
//! - greedy paragraph packing ([`chunk_content`], [`Chunks`])
//! - reassembly for the editor and reader ([`reassemble`])

pub mod chunker;
pub mod config;
pub mod error;
pub mod segment;
pub mod version;
pub mod words;

pub use chunker::{
    Chunks, ContentChunk, chunk_content, reassemble, reassemble_strict, validate_sequence,
};
pub use config::{ChunkerConfig, DEFAULT_MAX_CHUNK_WORDS};
pub use error::{ChunkError, Result};
pub use segment::segments;
pub use version::{ChapterMetrics, ChapterVersion, content_hash};
pub use words::count_words;
