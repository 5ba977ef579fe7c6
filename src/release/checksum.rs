//! Artifact digests for Maven sidecar files.
//!
//! Maven repositories expect `.md5` and `.sha1` files next to each artifact,
//! holding the lowercase hex digest of the artifact bytes.

use crate::release::error::{ErrorExt, Result};
use sha1::{Digest, Sha1};
use std::path::Path;

/// Digests of one artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digests {
    /// Hex-encoded MD5 (32 characters).
    pub md5: String,
    /// Hex-encoded SHA-1 (40 characters).
    pub sha1: String,
}

/// Reads `path` once and computes both digests.
pub async fn calculate_digests(path: &Path) -> Result<Digests> {
    let bytes = tokio::fs::read(path)
        .await
        .fs_context("reading file for hashing", path)?;

    Ok(Digests {
        md5: md5_hex(&bytes),
        sha1: sha1_hex(&bytes),
    })
}

/// Lowercase hex MD5 of `bytes`.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}
