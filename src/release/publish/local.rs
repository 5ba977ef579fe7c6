//! Maven local publication.

use crate::release::{error::Result, utils::fs};
use std::path::Path;

/// Copies the output tree into the Maven local repository, overwriting
/// files from earlier runs. No digests, signatures or network access.
pub async fn publish_local(out_dir: &Path, repository: &Path) -> Result<()> {
    fs::create_dir_all(repository, false).await?;
    log::info!("Copying {} into {}", out_dir.display(), repository.display());
    fs::copy_dir(out_dir, repository).await
}
