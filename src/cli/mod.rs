//! Command line interface for r8_release.
//!
//! Parses arguments, resolves configuration and credentials, then drives
//! the [`Releaser`] stage by stage with progress output in between.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::release::{
    GpgSigner, PortalClient, ProjectLayout, PublishCredentials, ReleaseVersion, Releaser,
};
use std::path::PathBuf;

/// Where the prepared release goes.
enum PublishTarget {
    Local(PathBuf),
    Remote(PublishCredentials),
}

/// Main CLI entry point
pub async fn run() -> Result<()> {
    run_with(Args::parse_args()).await
}

/// Runs one release for already parsed arguments.
pub async fn run_with(args: Args) -> Result<()> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let runtime_config = RuntimeConfig::from(&args);

    let version = ReleaseVersion::new(args.version.clone(), args.version_to_over_write.clone())?;
    let layout = ProjectLayout::new(&args.root, args.scratch_dir.clone());
    layout.check_root()?;

    // Resolve everything the publish step needs before touching the workspace.
    let target = if args.local {
        PublishTarget::Local(args.maven_local_repository()?)
    } else {
        PublishTarget::Remote(PublishCredentials::from_env()?)
    };

    let releaser = Releaser::new(layout, version);

    runtime_config.section("Acquire")?;
    runtime_config.verbose_println(&format!(
        "Scratch workspace: {}",
        releaser.layout().scratch_dir().display()
    ))?;
    releaser.reset_scratch().await?;
    releaser.acquire().await?;
    runtime_config.success_println("Release archive built and extracted")?;

    runtime_config.section("Transform")?;
    runtime_config.progress(&format!(
        "Rewriting {} -> {}",
        releaser.version().build_version(),
        releaser.version().version()
    ))?;
    releaser.transform().await?;
    runtime_config.success_println("Versions and coordinates rewritten")?;

    runtime_config.section("Package")?;
    let prepared = releaser.package().await?;
    runtime_config.success_println(&format!(
        "Artifacts ready in {}",
        prepared.artifact_dir.display()
    ))?;

    runtime_config.section("Publish")?;
    match target {
        PublishTarget::Local(repository) => {
            runtime_config.progress(&format!("Copying to {}", repository.display()))?;
            releaser.publish_local(&prepared, &repository).await?;
            runtime_config.success_println("Published to Maven local")?;
        }
        PublishTarget::Remote(credentials) => {
            runtime_config.progress("Signing artifacts")?;
            let signer = GpgSigner::import(&credentials.signing).await?;
            let client = PortalClient::new(&args.portal_url, &credentials.registry)?;

            let deployment = releaser.publish_remote(&prepared, &signer, &client).await?;
            // Release the HTTP client's connection pool before reporting.
            drop(client);
            runtime_config.success_println(&format!(
                "Uploaded deployment {}. Publish it from the Central Portal once validated.",
                deployment
            ))?;
        }
    }

    runtime_config.success_println("done")?;
    Ok(())
}
