//! File system utilities for release staging.
//!
//! Provides idempotent directory creation/removal and recursive copies that
//! overwrite existing files, with errors carrying the offending path.

use crate::release::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Recursively copies a directory into another, creating any missing
/// directories of the destination path.
///
/// Existing files at the destination are overwritten; files that only exist
/// at the destination are kept. Fails if the source path is not a directory.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        for entry in walkdir::WalkDir::new(&from).follow_links(false) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else {
                if let Some(parent) = dest_path.parent() {
                    std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
                }
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file to", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_dir_overwrites_and_keeps_unrelated_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("a/b/file.txt"), "new").unwrap();
        std::fs::create_dir_all(dst.join("a/b")).unwrap();
        std::fs::write(dst.join("a/b/file.txt"), "old").unwrap();
        std::fs::write(dst.join("keep.txt"), "keep").unwrap();

        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("a/b/file.txt")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dst.join("keep.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn copy_dir_rejects_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy_dir(&tmp.path().join("missing"), &tmp.path().join("dst"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn create_dir_all_with_erase_empties_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("tmp");
        std::fs::create_dir_all(dir.join("out")).unwrap();
        std::fs::write(dir.join("r8.zip"), "stale").unwrap();

        create_dir_all(&dir, true).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all(&tmp.path().join("never-created")).await.unwrap();
    }
}
