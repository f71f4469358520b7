/// Result alias used across the crate.
pub type MoodResult<T> = Result<T, MoodError>;

/// Failures surfaced to callers. Lookup misses (unknown emotion, blend mode, effect) are not
/// errors: they degrade to documented defaults.
#[derive(thiserror::Error, Debug)]
pub enum MoodError {
    /// Bad caller input: out-of-domain values, unknown setting names, wrong JSON types.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("malformed hex color \"{0}\" (expected #rrggbb or #rgb)")]
    Color(String),

    /// A config import lacked one or more required top-level keys; nothing was applied.
    #[error("invalid configuration file: missing {}", .0.join(", "))]
    MissingConfigKeys(Vec<&'static str>),

    #[error("canvas {width}x{height} has no pixels")]
    EmptyCanvas { width: u32, height: u32 },

    /// Buffer shape or frame-level failures inside the pixel pipeline.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MoodError {
    /// Builds a [`MoodError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Builds a [`MoodError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Builds a [`MoodError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failure came from the caller's data rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Color(_)
                | Self::MissingConfigKeys(_)
                | Self::EmptyCanvas { .. }
        )
    }
}

impl From<serde_json::Error> for MoodError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
