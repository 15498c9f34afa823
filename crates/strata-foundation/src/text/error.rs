use std::fmt;

/// Misuse of the text layout APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextLayoutError {
    /// Queried before a successful layout.
    IllegalState(&'static str),
    InvalidArgument(String),
    OffsetOutOfRange { offset: usize, len: usize },
}

impl fmt::Display for TextLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextLayoutError::IllegalState(what) => write!(f, "illegal state: {what}"),
            TextLayoutError::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            TextLayoutError::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {offset} out of range for text of length {len}")
            }
        }
    }
}

impl std::error::Error for TextLayoutError {}
