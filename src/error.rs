//! Error types for tracking and region counting.

use thiserror::Error;

/// Result type alias for counting operations.
pub type Result<T> = std::result::Result<T, CountError>;

/// Boxed error raised by an external collaborator (detector, frame source).
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid parameters, rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("distance threshold must be a finite non-negative number, got {0}")]
    InvalidDistanceThreshold(f64),

    #[error("history window must retain at least one entry")]
    ZeroHistoryWindow,

    #[error("minimum confidence must lie in [0, 1], got {0}")]
    InvalidConfidence(f32),

    #[error("at least one region is required")]
    NoRegions,

    #[error("duplicate region name `{0}`")]
    DuplicateRegion(String),

    #[error("region `{0}` needs at least one polygon vertex")]
    EmptyPolygon(String),

    #[error("region `{name}` has an inverted rectangle: x {x_range:?}, y {y_range:?}")]
    InvertedRegion {
        name: String,
        x_range: (u32, u32),
        y_range: (u32, u32),
    },
}

/// Errors that abort a counting run.
#[derive(Error, Debug)]
pub enum CountError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("detector failed on region `{region}` at frame {frame}")]
    Detector {
        region: String,
        frame: u64,
        #[source]
        source: BoxedError,
    },

    #[error("frame source failed at frame {frame}")]
    FrameSource {
        frame: u64,
        #[source]
        source: BoxedError,
    },
}

impl CountError {
    /// Whether this error came from construction-time validation.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
