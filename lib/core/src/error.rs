use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain a usable image for a locator.
///
/// Cloneable so a prefetched failure can be handed out to every pairing that needs the image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Invalid image locator: {0}")]
    InvalidLocator(String),

    #[error("Request failed for {locator}: {reason}")]
    Network { locator: String, reason: String },

    #[error("Unsupported content type for {locator}: {content_type}")]
    ContentType { locator: String, content_type: String },

    #[error("Image too small: {width}x{height}, minimum {min}")]
    TooSmall { width: u32, height: u32, min: u32 },

    #[error("Could not decode image {locator}: {reason}")]
    Decode { locator: String, reason: String },

    #[error("Timed out fetching {0}")]
    Timeout(String),

    #[error("Image was not prefetched: {0}")]
    NotPrefetched(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Model inference error: {0}")]
    ModelInference(String),

    #[error("Insufficient inventory for {shape}: need at least {required}, found {found}")]
    InsufficientInventory {
        shape: String,
        required: usize,
        found: usize,
    },

    #[error("Shape {shape} takes {expected} items, got {found}")]
    ShapeMismatch {
        shape: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
