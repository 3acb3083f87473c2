use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("Unknown track type: {0}")]
    InvalidTrackType(String),

    #[error("Invalid MSF format: {0}")]
    InvalidMSFFormat(String),

    #[error("Invalid quoted string: {0}")]
    InvalidQuotedString(String),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),
}

pub type CueResult<T> = Result<T, CueError>;
