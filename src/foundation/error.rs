/// Result alias used across the crate.
pub type KineResult<T> = Result<T, KineError>;

/// Typed failures surfaced to the caller. Nothing is recovered silently.
#[derive(thiserror::Error, Debug)]
pub enum KineError {
    /// Placement referenced a missing or unpositioned node, or a grid was too small.
    #[error("layout error: {0}")]
    Layout(String),

    /// Directive tree rejected before scheduling (bad duration, lag ratio, empty group,
    /// conflicting concurrent writes).
    #[error("invalid directive: {0}")]
    InvalidDirective(String),

    /// An external asset could not be resolved.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// Construction-time validation of nodes, styles or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame sink refused a frame or failed to flush.
    #[error("sink error: {0}")]
    Sink(String),

    /// Script or snapshot (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KineError {
    /// Build a [`KineError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`KineError::InvalidDirective`].
    pub fn directive(msg: impl Into<String>) -> Self {
        Self::InvalidDirective(msg.into())
    }

    /// Build a [`KineError::ResourceLoad`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build a [`KineError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KineError::Sink`].
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`KineError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for KineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
