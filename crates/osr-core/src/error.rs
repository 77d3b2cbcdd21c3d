use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Unexpected end of input: {needed} bytes needed at offset {offset}, {remaining} remaining"
    )]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid game mode: {0}")]
    InvalidGameMode(u8),

    #[error("Invalid modifier bits: {0:#010x}")]
    InvalidModifiers(u32),

    #[error("Malformed {field} value: {text:?}")]
    MalformedNumericText { field: &'static str, text: String },

    #[error("Malformed length prefix at offset {offset}")]
    MalformedLength { offset: usize },

    #[error("Invalid UTF-8 text in {field}")]
    InvalidText { field: &'static str },

    #[error("Play time out of range: {0} ticks")]
    InvalidTimestamp(i64),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Payload size mismatch: declared {declared} bytes, got {actual}")]
    PayloadSizeMismatch { declared: u64, actual: u64 },

    #[error("Frame {index} uses the reserved seed time delta")]
    ReservedTimeDelta { index: usize },

    #[error("Frame payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for numeric parse failures.
    pub(crate) fn numeric(field: &'static str, text: &str) -> Self {
        Error::MalformedNumericText {
            field,
            text: text.to_string(),
        }
    }
}

impl From<lzma_rs::error::Error> for Error {
    fn from(e: lzma_rs::error::Error) -> Self {
        Error::Compression(e.to_string())
    }
}
