use std::fmt;

/// Errors surfaced by canvas operations.
///
/// Only `Configuration` is terminal (the canvas is never created). The others are
/// reported and the canvas keeps running, so the host display loop stays alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// Incompatible device/queue/texture handles, unsupported pixel format, or an
    /// invalid render target. Raised once, at creation.
    Configuration(String),

    /// `change_example` with an index outside `0..count`.
    InvalidIndex { index: i64, count: usize },

    /// Operation on a null, destroyed, or never-issued canvas handle.
    StaleHandle(u64),

    /// An example failed to set up its GPU resources.
    ExampleSetup { name: &'static str, reason: String },
}

impl CanvasError {
    pub(crate) fn configuration(err: anyhow::Error) -> Self {
        Self::Configuration(format!("{err:#}"))
    }

    /// `true` if the error ends the canvas (only possible at creation).
    pub fn is_fatal(&self) -> bool {
        matches!(self, CanvasError::Configuration(_))
    }
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::Configuration(msg) => write!(f, "canvas configuration error: {msg}"),
            CanvasError::InvalidIndex { index, count } => {
                write!(f, "example index {index} out of range (0..{count})")
            }
            CanvasError::StaleHandle(raw) => write!(f, "stale canvas handle {raw:#x}"),
            CanvasError::ExampleSetup { name, reason } => {
                write!(f, "example `{name}` failed to set up: {reason}")
            }
        }
    }
}

impl std::error::Error for CanvasError {}
