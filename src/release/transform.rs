//! Transform stage: rewrite versions and move the artifact to its published group.
//!
//! Runs over the extracted output tree in three steps, in this order:
//! file names, pom contents, then the namespace move. The move uses the
//! upstream paths, which carry no version, so it has to come after the
//! rename but does not depend on it. All of this must finish before any
//! digest or signature is computed.

use crate::{
    bail,
    release::{
        error::{Error, ErrorExt, Result},
        settings::Relocation,
        utils::fs,
    },
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Renames every file and directory below `out_dir` whose name contains `from`,
/// replacing each occurrence with `to`. Returns the number of renamed entries.
///
/// Entries are collected deepest-first before anything is renamed, so a
/// directory is only renamed after all of its children. A name that is not
/// valid UTF-8 fails the rename.
pub async fn rewrite_file_names(out_dir: &Path, from: &str, to: &str) -> Result<usize> {
    if from == to {
        return Ok(0);
    }

    let out_dir = out_dir.to_path_buf();
    let from = from.to_string();
    let to = to.to_string();

    tokio::task::spawn_blocking(move || {
        let entries = WalkDir::new(&out_dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .map(|entry| entry.map(walkdir::DirEntry::into_path))
            .collect::<std::result::Result<Vec<PathBuf>, _>>()?;

        let mut renamed = 0;
        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                bail!("Cannot rewrite {}: file name is not valid UTF-8", path.display());
            };
            if !name.contains(from.as_str()) {
                continue;
            }

            let new_path = path.with_file_name(name.replace(from.as_str(), &to));
            std::fs::rename(&path, &new_path).fs_context("renaming", &path)?;
            log::debug!("Renamed {} -> {}", path.display(), new_path.display());
            renamed += 1;
        }

        Ok(renamed)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Rename task panicked: {}", e)))?
}

/// Rewrites every `.pom` below `out_dir`: `from` becomes `to` and the legacy
/// group id becomes the published one. Returns the number of files changed.
pub async fn rewrite_metadata(
    out_dir: &Path,
    from: &str,
    to: &str,
    relocation: &Relocation,
) -> Result<usize> {
    let out_dir = out_dir.to_path_buf();
    let from = from.to_string();
    let to = to.to_string();
    let relocation = *relocation;

    tokio::task::spawn_blocking(move || {
        let mut rewritten = 0;
        for entry in WalkDir::new(&out_dir).contents_first(true) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_pom(entry.path()) {
                continue;
            }

            let path = entry.path();
            let content = std::fs::read_to_string(path).fs_context("reading pom", path)?;
            let updated = content
                .replace(from.as_str(), &to)
                .replace(relocation.legacy_group_id, relocation.group_id);

            if updated != content {
                std::fs::write(path, updated).fs_context("writing pom", path)?;
                log::debug!("Rewrote {}", path.display());
                rewritten += 1;
            }
        }

        Ok(rewritten)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Pom rewrite task panicked: {}", e)))?
}

/// Copies the upstream artifact directory under the published group, then
/// deletes the whole upstream top-level directory.
pub async fn relocate_namespace(out_dir: &Path, relocation: &Relocation) -> Result<()> {
    let source = out_dir.join(relocation.source_artifact_dir);
    let target = relocation.target_artifact_dir(out_dir);

    fs::create_dir_all(&out_dir.join(relocation.target_group_dir), false).await?;

    log::info!("Relocating {} -> {}", source.display(), target.display());
    fs::copy_dir(&source, &target).await?;
    fs::remove_dir_all(&out_dir.join(relocation.source_root)).await
}

fn is_pom(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("pom")
}
