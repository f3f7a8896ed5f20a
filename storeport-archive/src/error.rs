use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("there is no payload to read")]
    MissingPayload,

    #[error("the payload exceeds the {limit} byte ceiling ({size} bytes)")]
    Oversized { size: usize, limit: usize },

    #[error("the payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("the archive contains no .json member")]
    NoJsonMember,

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
