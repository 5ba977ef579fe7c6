//! Release settings: project layout, versions and Maven coordinates.

use crate::{
    bail,
    release::error::{Error, Result},
};
use std::path::{Path, PathBuf};

/// Filesystem layout of the R8 checkout and the scratch workspace.
#[derive(Clone, Debug)]
pub struct ProjectLayout {
    /// Root of the R8 checkout. The build tool runs from here.
    root: PathBuf,

    /// Scratch workspace owned by one invocation.
    ///
    /// Erased at the start of a run and left in place afterwards for inspection.
    scratch_dir: PathBuf,
}

impl ProjectLayout {
    /// Build script producing the Maven release zip, relative to the root.
    pub const BUILD_TOOL: &'static str = "tools/create_maven_release.py";

    /// Java sources packaged as the `-sources.jar`, relative to the root.
    pub const SOURCES_DIR: &'static str = "src/main/java";

    /// Creates a layout. The scratch workspace defaults to `<root>/tmp`.
    pub fn new(root: impl Into<PathBuf>, scratch_dir: Option<PathBuf>) -> Self {
        let root = root.into();
        let scratch_dir = scratch_dir.unwrap_or_else(|| root.join("tmp"));
        Self { root, scratch_dir }
    }

    /// Returns the checkout root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the scratch workspace.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Returns the build tool path.
    pub fn build_tool(&self) -> PathBuf {
        self.root.join(Self::BUILD_TOOL)
    }

    /// Returns the Java sources directory.
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(Self::SOURCES_DIR)
    }

    /// Zip written by the build tool.
    pub fn release_archive(&self) -> PathBuf {
        self.scratch_dir.join("r8.zip")
    }

    /// Directory the release zip is extracted into and transformed in place.
    pub fn output_dir(&self) -> PathBuf {
        self.scratch_dir.join("out")
    }

    /// Bundle uploaded to the registry.
    pub fn bundle_archive(&self) -> PathBuf {
        self.scratch_dir.join("r8_final.zip")
    }

    /// Fails unless the root looks like an R8 checkout.
    pub fn check_root(&self) -> Result<()> {
        if !self.build_tool().is_file() {
            bail!(
                "r8_release needs to be run from the r8 root ({} not found)",
                self.build_tool().display()
            );
        }
        Ok(())
    }
}

/// The published version and the version the build tool embeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseVersion {
    version: String,
    build_version: String,
}

impl ReleaseVersion {
    /// `build_version` defaults to `version` when the build is already on a tag.
    pub fn new(version: impl Into<String>, build_version: Option<String>) -> Result<Self> {
        let version = version.into();
        let build_version = build_version.unwrap_or_else(|| version.clone());

        for (name, value) in [("version", &version), ("version to overwrite", &build_version)] {
            if value.trim().is_empty() {
                return Err(Error::GenericError(format!("The {name} cannot be empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(Error::GenericError(format!(
                    "The {name} cannot contain path separators: {value}"
                )));
            }
        }

        Ok(Self {
            version,
            build_version,
        })
    }

    /// Version written into published names and metadata.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Version produced by the build tool, replaced everywhere by [`Self::version`].
    pub fn build_version(&self) -> &str {
        &self.build_version
    }

    /// Whether names and metadata need rewriting at all.
    pub fn needs_rewrite(&self) -> bool {
        self.version != self.build_version
    }
}

/// Move of the artifact from its upstream Maven coordinates to the published ones.
#[derive(Clone, Copy, Debug)]
pub struct Relocation {
    /// Artifact directory produced by the build, relative to the output tree.
    pub source_artifact_dir: &'static str,
    /// Top-level directory of the upstream group, deleted after the move.
    pub source_root: &'static str,
    /// Group directory of the published coordinates.
    pub target_group_dir: &'static str,
    /// Artifact id, which is also the artifact directory name under the group.
    pub artifact_id: &'static str,
    /// Upstream `<groupId>` element found in poms.
    pub legacy_group_id: &'static str,
    /// Replacement `<groupId>` element.
    pub group_id: &'static str,
}

/// `com.android.tools:r8` republished as `net.mbonnin.r8:r8`.
pub const R8_RELOCATION: Relocation = Relocation {
    source_artifact_dir: "com/android/tools/r8",
    source_root: "com",
    target_group_dir: "net/mbonnin/r8",
    artifact_id: "r8",
    legacy_group_id: "<groupId>com.android.tools</groupId>",
    group_id: "<groupId>net.mbonnin.r8</groupId>",
};

impl Relocation {
    /// Artifact directory under the published group.
    pub fn target_artifact_dir(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.target_group_dir).join(self.artifact_id)
    }

    /// Versioned directory holding the jars and poms that get published.
    pub fn versioned_dir(&self, out_dir: &Path, version: &str) -> PathBuf {
        self.target_artifact_dir(out_dir).join(version)
    }

    /// `r8-<version>-sources.jar`
    pub fn sources_jar_name(&self, version: &str) -> String {
        format!("{}-{}-sources.jar", self.artifact_id, version)
    }

    /// `r8-<version>-javadoc.jar`
    pub fn javadoc_jar_name(&self, version: &str) -> String {
        format!("{}-{}-javadoc.jar", self.artifact_id, version)
    }
}
