//! Zip archive creation for jars and the upload bundle.
//!
//! Entry contents are deterministic; entry order follows directory traversal
//! and is not. Nothing downstream compares archives byte for byte.

use crate::{
    bail,
    release::error::{Error, ErrorExt, Result},
};
use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};
use zip::{ZipWriter, write::SimpleFileOptions};

/// Manifest entry of the placeholder jar.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Manifest body of the placeholder jar.
pub const EMPTY_MANIFEST: &str = "Manifest-Version: 1.0\n\n";

/// Writes a jar holding only a manifest.
///
/// Maven Central requires a `-javadoc.jar` next to every artifact; this is
/// the stand-in when there is no real javadoc.
pub async fn create_empty_archive(dest: &Path) -> Result<()> {
    let dest = dest.to_path_buf();

    run_blocking("Empty archive", move || {
        let mut zip = ZipWriter::new(create_file(&dest)?);
        zip.start_file(MANIFEST_ENTRY, SimpleFileOptions::default())?;
        zip.write_all(EMPTY_MANIFEST.as_bytes())
            .fs_context("writing manifest to", &dest)?;
        zip.finish()?;
        Ok(())
    })
    .await
}

/// Zips every regular file under `source_dir` into `dest`, naming each entry
/// by its `/`-separated path relative to `source_dir`. Returns the entry count.
///
/// A missing `source_dir` yields an archive with no entries.
pub async fn create_archive(source_dir: &Path, dest: &Path) -> Result<usize> {
    if source_dir.exists() && !source_dir.is_dir() {
        bail!("Cannot archive {}: not a directory", source_dir.display());
    }
    if !source_dir.exists() {
        log::warn!(
            "{} does not exist, writing an empty {}",
            source_dir.display(),
            dest.display()
        );
    }

    let source_dir = source_dir.to_path_buf();
    let dest = dest.to_path_buf();

    run_blocking("Archive", move || {
        let mut zip = ZipWriter::new(create_file(&dest)?);
        let mut entries = 0;

        if !source_dir.exists() {
            zip.finish()?;
            return Ok(entries);
        }

        for entry in walkdir::WalkDir::new(&source_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry_name(entry.path().strip_prefix(&source_dir)?);
            zip.start_file(name, SimpleFileOptions::default())?;
            let mut file = File::open(entry.path()).fs_context("opening file", entry.path())?;
            io::copy(&mut file, &mut zip).fs_context("archiving file", entry.path())?;
            entries += 1;
        }

        zip.finish()?;
        log::debug!("Wrote {} entries to {}", entries, dest.display());
        Ok(entries)
    })
    .await
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }
    File::create(path).fs_context("creating archive", path)
}

async fn run_blocking<T, F>(what: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::GenericError(format!("{} task panicked: {}", what, e)))?
}
