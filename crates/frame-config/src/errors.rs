/// Errors while reading a parameter preset.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read preset: {0}")]
    Io(String),

    #[error("failed to parse preset: {0}")]
    ParseError(String),

    #[error("unknown preset format: {0}")]
    UnknownFormat(String),

    #[error("preset version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// Errors while writing a parameter preset.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize preset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write preset: {0}")]
    Io(#[from] std::io::Error),
}
