use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid glyph sheet: {0}")]
    InvalidSheet(String),
    #[error("unknown font: {0}")]
    UnknownFont(String),
    #[error("unencodable character: {0:?}")]
    UnknownChar(char),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
