//! Acquire stage: run the upstream build and unpack its output.
//!
//! Both steps are subprocesses with inherited stdio, so their output goes
//! straight to the terminal. A non-zero exit aborts the release.

use crate::release::{
    error::{Error, ErrorExt, Result},
    settings::ProjectLayout,
    tool_detection::{UNZIP, require_tool},
};
use path_absolutize::Absolutize;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tokio::process::Command;

/// Runs the build tool, which writes the Maven release zip to `release_file`.
pub async fn run_external_build(layout: &ProjectLayout, release_file: &Path) -> Result<()> {
    let build_tool = absolute(&layout.build_tool())?;
    let release_file = absolute(release_file)?;
    log::info!("Building release archive {}", release_file.display());

    exec_or_die(
        build_tool.into_os_string(),
        vec!["--out".into(), release_file.into_os_string()],
        Some(layout.root()),
    )
    .await
}

/// Extracts `archive` into `dest_dir` with `unzip`.
pub async fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    let unzip = require_tool(UNZIP)?;
    let archive = absolute(archive)?;
    let dest_dir = absolute(dest_dir)?;
    log::info!("Extracting {} into {}", archive.display(), dest_dir.display());

    exec_or_die(
        unzip.into_os_string(),
        vec![
            "-d".into(),
            dest_dir.into_os_string(),
            archive.into_os_string(),
        ],
        None,
    )
    .await
}

/// Spawns `program` with inherited stdio and waits for it.
///
/// Fails with the full command line and exit code when the status is non-zero.
pub(crate) async fn exec_or_die(
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<&Path>,
) -> Result<()> {
    let command_line = std::iter::once(&program)
        .chain(args.iter())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("Running {}", command_line);

    let mut command = Command::new(&program);
    command.args(&args);
    if let Some(dir) = current_dir {
        command.current_dir(dir);
    }

    let status = command.status().await.map_err(|error| Error::CommandFailed {
        command: command_line.clone(),
        error,
    })?;

    if !status.success() {
        return Err(Error::CommandStatus {
            command: command_line,
            code: status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "terminated by signal".to_string()),
        });
    }

    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .fs_context("resolving absolute path", path)
}
