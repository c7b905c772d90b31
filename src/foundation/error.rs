use std::path::PathBuf;

/// Library-wide result alias.
pub type PosterResult<T> = Result<T, PosterError>;

/// Errors surfaced by a render call.
///
/// A render either fully succeeds or reports exactly one of these.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Configuration or request failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required input file (template background) does not exist.
    #[error("missing file: {}", path.display())]
    MissingFile {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// Surface setup, drawing or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// IO/decode failure carrying its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::MissingFile`].
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    /// Build a [`PosterError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PosterError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
