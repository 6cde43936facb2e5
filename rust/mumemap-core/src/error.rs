use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// A fixed-width or length-prefixed field ran past the end of the data.
    #[error("incomplete data file")]
    IncompleteData,
    #[error("bad magic number {0:#010x}")]
    BadMagicNumber(u32),
    #[error("do not support version 0{0:o} of mmapper data")]
    UnsupportedVersion(i32),
    #[error("invalid {field} value {value}")]
    InvalidValue { field: &'static str, value: u32 },
    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("xml: {0}")]
    Xml(String),
    #[error("settings: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
