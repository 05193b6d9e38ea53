use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("max_chunk_words must be positive (got {0})")]
    InvalidMaxChunkWords(usize),

    #[error("Chunk sequence has a gap: expected index {expected}, found {found}")]
    MissingIndex { expected: usize, found: usize },

    #[error("Chunk index {0} appears more than once")]
    DuplicateIndex(usize),

    #[error("Version {0} cannot be followed by another version")]
    VersionOverflow(u32),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
