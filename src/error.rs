use thiserror::Error;

/// Top-level error type for the clashview crate.
#[derive(Debug, Error)]
pub enum ClashViewError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Eye and target of a look-at are closer than the view tolerance.
    #[error("degenerate view: eye and target are {distance} apart")]
    DegenerateView { distance: f64 },

    #[error("zero-length vector")]
    ZeroVector,
}

/// A call into an external collaborator (viewport, store, clash source) failed.
#[derive(Debug, Clone, Error)]
#[error("host operation `{operation}` failed: {message}")]
pub struct HostError {
    /// Name of the collaborator operation that failed.
    pub operation: &'static str,
    /// Host-supplied failure description.
    pub message: String,
}

impl HostError {
    /// Creates a new host error for the given operation.
    #[must_use]
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Conditions that abort a batch before any result is processed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no clash test available")]
    NoTest,

    #[error("clash test `{test}` has no results to process")]
    NoResults { test: String },

    #[error("a batch is already running")]
    AlreadyRunning,

    #[error("host supports none of the configured framing strategies")]
    NoFramingStrategy,

    #[error("host does not support {0}")]
    UnsupportedCapability(&'static str),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors related to pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`ClashViewError`].
pub type Result<T> = std::result::Result<T, ClashViewError>;
