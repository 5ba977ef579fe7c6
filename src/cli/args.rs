//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with the
//! configuration defaults resolved from the environment.

use crate::error::CliError;
use crate::release::CENTRAL_PORTAL_URL;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Publishes the unminified R8 distribution
#[derive(Parser, Debug)]
#[command(
    name = "r8_release",
    about = "Publishes the unminified R8 distribution",
    long_about = "Builds R8's Maven release, republishes it as net.mbonnin.r8:r8 with the given version,
and installs it into Maven local or uploads a signed bundle to the Sonatype Central Portal.

Must be run from the r8 checkout root (or pass --root).

Usage:
  r8_release --version 8.2.47 --local
  r8_release --version 8.2.47 --version-to-over-write 8.2.47-dev

Remote publication reads GPG_PRIVATE_KEY, GPG_PRIVATE_KEY_PASSWORD,
SONATYPE_USERNAME and SONATYPE_PASSWORD from the environment.",
    disable_version_flag = true
)]
pub struct Args {
    /// Deploy to Maven local
    #[arg(long)]
    pub local: bool,

    /// The version to use in the published artifacts
    #[arg(long, value_name = "VERSION")]
    pub version: String,

    /// The version produced by the R8 scripts. If you're on a tag, this shouldn't be required
    #[arg(long, value_name = "VERSION")]
    pub version_to_over_write: Option<String>,

    /// Root of the r8 checkout
    #[arg(long, value_name = "DIR", env = "R8_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Scratch workspace, erased at the start of every run [default: <ROOT>/tmp]
    #[arg(long, value_name = "DIR", env = "R8_RELEASE_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Maven local repository used with --local [default: ~/.m2/repository]
    #[arg(long, value_name = "DIR", env = "R8_RELEASE_MAVEN_LOCAL")]
    pub maven_local: Option<PathBuf>,

    /// Central Portal base URL
    #[arg(long, value_name = "URL", env = "R8_RELEASE_PORTAL_URL", default_value = CENTRAL_PORTAL_URL)]
    pub portal_url: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("--version cannot be empty".to_string());
        }

        if matches!(&self.version_to_over_write, Some(v) if v.trim().is_empty()) {
            return Err("--version-to-over-write cannot be empty".to_string());
        }

        if !self.local
            && !(self.portal_url.starts_with("https://") || self.portal_url.starts_with("http://"))
        {
            return Err(format!(
                "Invalid portal URL: {}. Expected an http(s) URL",
                self.portal_url
            ));
        }

        Ok(())
    }

    /// Maven local repository, defaulting to `~/.m2/repository`.
    pub fn maven_local_repository(&self) -> Result<PathBuf, CliError> {
        if let Some(path) = &self.maven_local {
            return Ok(path.clone());
        }

        dirs::home_dir()
            .map(|home| home.join(".m2").join("repository"))
            .ok_or_else(|| CliError::MissingDefault {
                what: "the Maven local repository".to_string(),
                hint: "no home directory found, pass --maven-local".to_string(),
            })
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        let output = super::OutputManager::new(
            true,  // Always verbose
            false, // Never quiet
            std::io::stdout().is_terminal(),
        );

        Self { output }
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success_println(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }
}
