/// Convenience result alias used across the crate.
pub type EaselResult<T> = Result<T, EaselError>;

/// Errors surfaced by configuration, persistence and strategy plumbing.
///
/// Tick-level APIs (`draw`, `check_autonomy`) never return these: recoverable failures are logged
/// and folded into their outcome values instead.
#[derive(thiserror::Error, Debug)]
pub enum EaselError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading or writing persisted canvas state failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// An external completion hook reported a failure.
    #[error("hook error: {0}")]
    Hook(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else, with context attached by `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EaselError {
    /// Build a [`EaselError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EaselError::Persistence`].
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`EaselError::Hook`].
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Build a [`EaselError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for EaselError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
