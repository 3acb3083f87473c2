use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbcueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    TemplateError(#[from] indicatif::style::TemplateError),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub type EmbcueResult<T> = result::Result<T, EmbcueError>;
