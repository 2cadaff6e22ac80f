/// Error types for shape loading and game construction
use thiserror::Error;

/// Result type alias for load-time operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Fatal problems found while loading shapes or validating configuration.
///
/// Gameplay itself never fails: moves and rotations report `false`, and a
/// blocked spawn ends the game.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Neither an id nor a name to derive one from
    #[error("Shape #{index} has no id and no name to derive one from")]
    MissingId { index: usize },

    #[error("Duplicate shape id: {0}")]
    DuplicateId(String),

    /// Grid has no rows or no occupied cell
    #[error("Shape \"{0}\" has an empty grid")]
    EmptyGrid(String),

    #[error("Shape \"{id}\" has a malformed grid: {reason}")]
    MalformedGrid { id: String, reason: String },

    /// A kept rotation cannot fit on the board
    #[error(
        "Shape \"{id}\" is too wide for the board ({width} > {cols}). \
         Narrow it, restrict its rotations, or widen the board"
    )]
    TooWide { id: String, width: usize, cols: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No shapes loaded")]
    NoShapes,

    /// More shapes than a locked block can refer to
    #[error("Too many shapes: {count} (at most {max})")]
    TooManyShapes { count: usize, max: usize },

    /// JSON parse failure for shapes or config
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
