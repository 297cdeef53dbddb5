/// Convenience result type used across dramanet.
pub type DramaResult<T> = Result<T, DramaError>;

/// Top-level error taxonomy.
///
/// Derivations over an already-loaded dataset never fail: malformed records are skipped.
/// Errors only surface from loading, exporting, and invalid caller arguments.
#[derive(thiserror::Error, Debug)]
pub enum DramaError {
    /// The dataset source could not be read (missing file, I/O failure, non-success status).
    #[error("load error: {0}")]
    Load(String),

    /// The dataset source was read but is not a valid JSON document of the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid caller-provided arguments (unknown play key, degenerate viewport, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing derived views.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DramaError {
    /// Build a [`DramaError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`DramaError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`DramaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DramaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error came from acquiring or parsing the dataset.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Parse(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
