use crate::error::{EmbcueError, EmbcueResult};
use async_recursion::async_recursion;
use std::path::{Path, PathBuf};
use tokio::fs;

#[async_recursion]
pub async fn get_all_files(dir_path: &Path) -> EmbcueResult<Vec<PathBuf>> {
    let mut dir = fs::read_dir(dir_path).await?;
    let mut files = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();

        if path.is_dir() {
            files.append(&mut get_all_files(&path).await?);
        } else {
            files.push(path);
        }
    }

    Ok(files)
}

/// All files below `dir_path` accepted by `filter`, sorted so output is
/// stable between runs.
pub async fn find_files(
    dir_path: &Path,
    filter: impl Fn(&Path) -> bool,
) -> EmbcueResult<Vec<PathBuf>> {
    if !fs::metadata(dir_path).await?.is_dir() {
        return Err(EmbcueError::NotADirectory(dir_path.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = get_all_files(dir_path)
        .await?
        .into_iter()
        .filter(|file| filter(file.as_path()))
        .collect();
    files.sort();

    Ok(files)
}
