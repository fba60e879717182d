use std::path::PathBuf;

/// Alias for `Result<T, LoadError>`.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while loading case data or configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A data file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data document is not valid JSON for its schema.
    #[error("invalid {origin}: {source}")]
    Json {
        /// Which document failed (a file path or a logical name).
        origin: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Build a JSON error for the given document.
    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}
