use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    FlacError(#[from] claxon::Error),

    #[error(transparent)]
    Id3Error(#[from] id3::Error),

    #[error(transparent)]
    LoftyError(#[from] lofty::error::LoftyError),

    #[error("APE tag in {path:?} has an invalid size of {size} bytes")]
    InvalidApeTagSize { path: PathBuf, size: u32 },
}

pub type TagResult<T> = Result<T, TagError>;
