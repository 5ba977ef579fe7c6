//! Signed upload to the registry.

use crate::release::{
    archive,
    checksum::calculate_digests,
    error::{ErrorExt, Result},
    registry::{PublicationType, Registry},
    signing::Signer,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Extensions that are signed and uploaded. Everything else is deleted.
pub const PUBLISHABLE_EXTENSIONS: [&str; 2] = ["jar", "pom"];

/// Prefix of the deployment name shown in the portal.
pub const UPLOAD_LABEL: &str = "R8";

/// Regular files of the versioned artifact directory, split by extension.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArtifactPartition {
    /// `jar` and `pom` files.
    pub publishable: Vec<PathBuf>,
    /// Everything else.
    pub other: Vec<PathBuf>,
}

/// Sidecar files written for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecars {
    pub md5: PathBuf,
    pub asc: PathBuf,
    pub sha1: PathBuf,
}

/// Splits the regular files directly inside `dir`. Both lists are sorted.
pub async fn partition_artifacts(dir: &Path) -> Result<ArtifactPartition> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .fs_context("reading artifact directory", dir)?;

    let mut partition = ArtifactPartition::default();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading artifact directory", dir)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("reading file type", entry.path())?;
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();
        let publishable = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| PUBLISHABLE_EXTENSIONS.contains(&e));
        if publishable {
            partition.publishable.push(path);
        } else {
            partition.other.push(path);
        }
    }

    partition.publishable.sort();
    partition.other.sort();
    Ok(partition)
}

/// `<artifact>.<suffix>`, appended to the full file name.
pub fn sidecar_path(artifact: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(artifact.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Writes the `.md5`, `.asc` and `.sha1` files next to `artifact`.
pub async fn write_sidecars<S: Signer>(artifact: &Path, signer: &S) -> Result<Sidecars> {
    let digests = calculate_digests(artifact).await?;
    let signature = signer.sign(artifact).await?;

    let sidecars = Sidecars {
        md5: sidecar_path(artifact, "md5"),
        asc: sidecar_path(artifact, "asc"),
        sha1: sidecar_path(artifact, "sha1"),
    };
    for (path, content) in [
        (&sidecars.md5, &digests.md5),
        (&sidecars.asc, &signature),
        (&sidecars.sha1, &digests.sha1),
    ] {
        tokio::fs::write(path, content)
            .await
            .fs_context("writing sidecar", path)?;
    }

    log::debug!("Signed {}", artifact.display());
    Ok(sidecars)
}

/// Prunes, signs, bundles and uploads a release. Returns the deployment id.
///
/// `artifact_dir` is the versioned directory inside `out_dir`; the whole of
/// `out_dir` goes into `bundle`.
pub async fn publish_remote<S, R>(
    out_dir: &Path,
    artifact_dir: &Path,
    bundle: &Path,
    version: &str,
    signer: &S,
    registry: &R,
) -> Result<String>
where
    S: Signer,
    R: Registry,
{
    let partition = partition_artifacts(artifact_dir).await?;
    for path in &partition.other {
        log::info!("Not publishing {}", path.display());
        tokio::fs::remove_file(path)
            .await
            .fs_context("deleting unpublished file", path)?;
    }

    for artifact in &partition.publishable {
        write_sidecars(artifact, signer).await?;
    }
    log::info!("Signed {} artifact(s)", partition.publishable.len());

    archive::create_archive(out_dir, bundle).await?;

    let name = format!("{UPLOAD_LABEL} {version}");
    registry
        .upload(bundle, &name, PublicationType::UserManaged)
        .await
}
