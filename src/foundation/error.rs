/// Convenience result type used across the crate.
pub type AmbientResult<T> = Result<T, AmbientError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AmbientError {
    /// Invalid caller-provided parameter (negative duration, inverted range, zero count, ...).
    ///
    /// Raised while building behaviors and effects, before anything is registered.
    #[error("config error: {0}")]
    Config(String),

    /// Scene-graph membership violation (double removal, missing parent, ...).
    #[error("lifecycle error: {0}")]
    Lifecycle(String),
}

impl AmbientError {
    /// Build an [`AmbientError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`AmbientError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Whether this error came from parameter validation.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether this error came from a scene-graph membership violation.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
