//! Release orchestration.
//!
//! [`Releaser`] runs the stages in order over the scratch workspace:
//! reset, acquire, transform, package, then one of the two publish paths.
//! Each stage is exposed on its own so callers can report progress between
//! them; [`Releaser::prepare`] runs everything up to publishing.

use crate::{
    bail,
    release::{
        acquire, archive,
        error::Result,
        publish,
        registry::Registry,
        settings::{ProjectLayout, R8_RELOCATION, ReleaseVersion, Relocation},
        signing::Signer,
        transform,
        utils::fs,
    },
};
use std::path::{Path, PathBuf};

/// Output of the stages before publishing.
#[derive(Clone, Debug)]
pub struct PreparedRelease {
    /// Transformed Maven repository layout.
    pub out_dir: PathBuf,
    /// Versioned directory holding the published jars and poms.
    pub artifact_dir: PathBuf,
}

/// Runs one release.
#[derive(Clone, Debug)]
pub struct Releaser {
    layout: ProjectLayout,
    version: ReleaseVersion,
    relocation: Relocation,
}

impl Releaser {
    /// Creates a releaser republishing R8 under `net.mbonnin.r8`.
    pub fn new(layout: ProjectLayout, version: ReleaseVersion) -> Self {
        Self {
            layout,
            version,
            relocation: R8_RELOCATION,
        }
    }

    /// Returns the project layout.
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Returns the versions.
    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Versioned artifact directory inside the output tree.
    pub fn artifact_dir(&self) -> PathBuf {
        self.relocation
            .versioned_dir(&self.layout.output_dir(), self.version.version())
    }

    /// Runs every stage up to publishing.
    pub async fn prepare(&self) -> Result<PreparedRelease> {
        self.reset_scratch().await?;
        self.acquire().await?;
        self.transform().await?;
        self.package().await
    }

    /// Erases and recreates the scratch workspace.
    pub async fn reset_scratch(&self) -> Result<()> {
        fs::create_dir_all(self.layout.scratch_dir(), true).await
    }

    /// Builds the release zip and extracts it into the output directory.
    pub async fn acquire(&self) -> Result<()> {
        let release_file = self.layout.release_archive();
        acquire::run_external_build(&self.layout, &release_file).await?;
        acquire::extract_archive(&release_file, &self.layout.output_dir()).await
    }

    /// Rewrites versions and moves the artifact to its published coordinates.
    pub async fn transform(&self) -> Result<()> {
        let out_dir = self.layout.output_dir();
        let from = self.version.build_version();
        let to = self.version.version();

        let renamed = transform::rewrite_file_names(&out_dir, from, to).await?;
        if self.version.needs_rewrite() && renamed == 0 {
            log::warn!(
                "No file name under {} contains {}; the build may have produced another version",
                out_dir.display(),
                from
            );
        } else {
            log::info!("Renamed {} entries from {} to {}", renamed, from, to);
        }

        let rewritten =
            transform::rewrite_metadata(&out_dir, from, to, &self.relocation).await?;
        log::info!("Rewrote {} pom file(s)", rewritten);

        transform::relocate_namespace(&out_dir, &self.relocation).await
    }

    /// Adds the javadoc placeholder and the sources jar next to the artifact.
    pub async fn package(&self) -> Result<PreparedRelease> {
        let artifact_dir = self.artifact_dir();
        if !artifact_dir.is_dir() {
            bail!(
                "{} not found after transform. Does --version-to-over-write match the version produced by the build?",
                artifact_dir.display()
            );
        }

        let version = self.version.version();
        let javadoc_jar = artifact_dir.join(self.relocation.javadoc_jar_name(version));
        let sources_jar = artifact_dir.join(self.relocation.sources_jar_name(version));

        archive::create_empty_archive(&javadoc_jar).await?;
        let entries = archive::create_archive(&self.layout.sources_dir(), &sources_jar).await?;
        log::info!("Packaged {} source file(s) into {}", entries, sources_jar.display());

        Ok(PreparedRelease {
            out_dir: self.layout.output_dir(),
            artifact_dir,
        })
    }

    /// Copies the prepared tree into the Maven local repository.
    pub async fn publish_local(&self, prepared: &PreparedRelease, repository: &Path) -> Result<()> {
        publish::publish_local(&prepared.out_dir, repository).await
    }

    /// Signs and uploads the prepared tree. Returns the deployment id.
    pub async fn publish_remote<S, R>(
        &self,
        prepared: &PreparedRelease,
        signer: &S,
        registry: &R,
    ) -> Result<String>
    where
        S: Signer,
        R: Registry,
    {
        publish::publish_remote(
            &prepared.out_dir,
            &prepared.artifact_dir,
            &self.layout.bundle_archive(),
            self.version.version(),
            signer,
            registry,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkdir::WalkDir;

    fn touch(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Lays out an extracted build output as if `acquire` had just run.
    fn extracted_checkout(build_version: &str) -> (tempfile::TempDir, ProjectLayout) {
        let root = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(root.path(), None);
        let dir = layout
            .output_dir()
            .join("com/android/tools/r8")
            .join(build_version);
        touch(&dir.join(format!("r8-{build_version}.jar")), "jar");
        touch(
            &dir.join(format!("r8-{build_version}.pom")),
            &format!(
                "<groupId>com.android.tools</groupId><artifactId>r8</artifactId><version>{build_version}</version>"
            ),
        );
        touch(&root.path().join("src/main/java/com/android/tools/r8/R8.java"), "class R8 {}");
        (root, layout)
    }

    #[tokio::test]
    async fn transform_and_package_produce_published_layout() {
        let (_root, layout) = extracted_checkout("1.0.0-dev");
        let releaser = Releaser::new(
            layout.clone(),
            ReleaseVersion::new("2.0.0", Some("1.0.0-dev".into())).unwrap(),
        );

        releaser.transform().await.unwrap();
        let prepared = releaser.package().await.unwrap();

        let mut files: Vec<String> = WalkDir::new(&prepared.out_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(&prepared.out_dir)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        files.sort();
        assert_eq!(
            files,
            vec![
                "net/mbonnin/r8/r8/2.0.0/r8-2.0.0-javadoc.jar",
                "net/mbonnin/r8/r8/2.0.0/r8-2.0.0-sources.jar",
                "net/mbonnin/r8/r8/2.0.0/r8-2.0.0.jar",
                "net/mbonnin/r8/r8/2.0.0/r8-2.0.0.pom",
            ]
        );
        let pom = std::fs::read_to_string(prepared.artifact_dir.join("r8-2.0.0.pom")).unwrap();
        assert!(pom.contains("<groupId>net.mbonnin.r8</groupId>"));
        assert!(pom.contains("<version>2.0.0</version>"));
        assert!(!layout.output_dir().join("com").exists());
    }

    #[tokio::test]
    async fn mismatched_build_version_fails_in_package() {
        let (_root, layout) = extracted_checkout("1.0.0-dev");
        let releaser = Releaser::new(
            layout,
            ReleaseVersion::new("2.0.0", Some("9.9.9".into())).unwrap(),
        );

        releaser.transform().await.unwrap();
        let err = releaser.package().await.unwrap_err();

        assert!(err.to_string().contains("--version-to-over-write"));
    }

    #[tokio::test]
    async fn package_without_sources_writes_empty_sources_jar() {
        let (root, layout) = extracted_checkout("2.0.0");
        std::fs::remove_dir_all(root.path().join("src")).unwrap();
        let releaser = Releaser::new(layout, ReleaseVersion::new("2.0.0", None).unwrap());

        releaser.transform().await.unwrap();
        let prepared = releaser.package().await.unwrap();

        let jar = prepared.artifact_dir.join("r8-2.0.0-sources.jar");
        let archive = zip::ZipArchive::new(std::fs::File::open(jar).unwrap()).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[tokio::test]
    async fn reset_scratch_removes_previous_run() {
        let (_root, layout) = extracted_checkout("2.0.0");
        let releaser = Releaser::new(layout.clone(), ReleaseVersion::new("2.0.0", None).unwrap());

        releaser.reset_scratch().await.unwrap();

        assert!(layout.scratch_dir().is_dir());
        assert!(!layout.output_dir().exists());
    }
}
