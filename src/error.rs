use thiserror::Error;

/// Errors raised by the drawing core.
///
/// None of these end the session: the editor reports them to the caller and
/// leaves the surface in a consistent state.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A coordinate fell outside the buffer
    #[error("point ({x}, {y}) is outside the surface")]
    OutOfBounds { x: i64, y: i64 },

    /// Pixel data could not be read as a buffer of the stated size
    #[error("unreadable pixel buffer: {width}x{height} with {len} bytes")]
    UnreadableBuffer { width: u32, height: u32, len: usize },

    /// The flood fill hit its iteration cap and was abandoned
    #[error("fill exceeded its bound of {limit} iterations")]
    FillBoundExceeded { limit: usize },

    /// The host cannot perform the requested export or share action
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// The selected tool has no implementation
    #[error("\"{0}\" tool is not implemented yet")]
    NotImplemented(&'static str),

    #[error("failed to load the bundled font")]
    FontLoad,

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for surface and editor operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur while loading surface settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read settings file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
