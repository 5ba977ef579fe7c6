//! Detached OpenPGP signatures for published artifacts.
//!
//! Maven Central requires an ASCII-armored `.asc` signature next to every
//! artifact. [`GpgSigner`] imports the release key into a throwaway
//! `GNUPGHOME` so the user's own keyring is never touched.

use crate::release::{
    credentials::SigningCredentials,
    error::{Error, ErrorExt, Result},
    tool_detection::{GPG, require_tool},
};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Output, Stdio},
};
use tokio::{io::AsyncWriteExt, process::Command};

const GPGCONF: &str = "gpgconf";

/// Produces detached signatures.
#[allow(async_fn_in_trait)]
pub trait Signer {
    /// Returns the ASCII-armored detached signature of the file at `path`.
    async fn sign(&self, path: &Path) -> Result<String>;
}

/// [`Signer`] backed by the `gpg` command line.
pub struct GpgSigner {
    gpg: PathBuf,
    home: tempfile::TempDir,
    passphrase: String,
}

impl std::fmt::Debug for GpgSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpgSigner")
            .field("gpg", &self.gpg)
            .field("home", &self.home.path())
            .finish_non_exhaustive()
    }
}

impl GpgSigner {
    /// Imports the private key into a fresh keyring.
    pub async fn import(credentials: &SigningCredentials) -> Result<Self> {
        let gpg = require_tool(GPG)?;
        let home = tempfile::Builder::new()
            .prefix("r8-release-gnupg")
            .tempdir()
            .map_err(Error::IoError)?;

        let key_file = home.path().join("release-key.asc");
        tokio::fs::write(&key_file, &credentials.private_key)
            .await
            .fs_context("writing signing key", &key_file)?;

        let output = run_gpg(
            &gpg,
            home.path(),
            [
                OsStr::new("--pinentry-mode"),
                OsStr::new("loopback"),
                OsStr::new("--passphrase-fd"),
                OsStr::new("0"),
                OsStr::new("--import"),
                key_file.as_os_str(),
            ],
            &credentials.passphrase,
        )
        .await?;
        tokio::fs::remove_file(&key_file)
            .await
            .fs_context("removing signing key", &key_file)?;

        if !output.status.success() {
            return Err(Error::GenericError(format!(
                "Failed to import GPG private key: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        log::info!("Imported signing key into {}", home.path().display());
        Ok(Self {
            gpg,
            home,
            passphrase: credentials.passphrase.clone(),
        })
    }
}

impl Signer for GpgSigner {
    async fn sign(&self, path: &Path) -> Result<String> {
        let output = run_gpg(
            &self.gpg,
            self.home.path(),
            [
                OsStr::new("--pinentry-mode"),
                OsStr::new("loopback"),
                OsStr::new("--passphrase-fd"),
                OsStr::new("0"),
                OsStr::new("--armor"),
                OsStr::new("--detach-sign"),
                OsStr::new("--output"),
                OsStr::new("-"),
                path.as_os_str(),
            ],
            &self.passphrase,
        )
        .await?;

        if !output.status.success() {
            return Err(Error::Signing {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| Error::Signing {
            path: path.to_path_buf(),
            reason: format!("signature is not valid UTF-8: {}", e),
        })
    }
}

impl Drop for GpgSigner {
    fn drop(&mut self) {
        // The agent started for the throwaway home outlives gpg itself.
        kill_agent(self.home.path());
    }
}

/// Stops the gpg-agent serving `home`. Returns whether gpgconf reported success.
///
/// Runs synchronously since it is called from `Drop`.
fn kill_agent(home: &Path) -> bool {
    let status = std::process::Command::new(GPGCONF)
        .arg("--homedir")
        .arg(home)
        .args(["--kill", "gpg-agent"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::debug!(
                "{} --kill gpg-agent for {} exited with {}",
                GPGCONF,
                home.display(),
                status
            );
            false
        }
        Err(e) => {
            log::debug!("Cannot run {} for {}: {}", GPGCONF, home.display(), e);
            false
        }
    }
}

/// Runs `gpg --homedir <home> --batch --yes <args>` with `passphrase` on stdin.
async fn run_gpg<'a>(
    gpg: &Path,
    home: &Path,
    args: impl IntoIterator<Item = &'a OsStr>,
    passphrase: &str,
) -> Result<Output> {
    let mut child = Command::new(gpg)
        .arg("--homedir")
        .arg(home)
        .args(["--batch", "--yes"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| Error::CommandFailed {
            command: GPG.to_string(),
            error,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(passphrase.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
    }

    child
        .wait_with_output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: GPG.to_string(),
            error,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generates an armored secret key with gpg, or `None` when gpg is unusable here.
    fn generate_key(passphrase: &str) -> Option<String> {
        let gpg = which::which(GPG).ok()?;
        let home = tempfile::tempdir().ok()?;
        let gen_status = std::process::Command::new(&gpg)
            .arg("--homedir")
            .arg(home.path())
            .args(["--batch", "--pinentry-mode", "loopback", "--passphrase", passphrase])
            .args(["--quick-gen-key", "R8 Release Test <r8@example.com>", "default", "default", "never"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?;
        if !gen_status.success() {
            return None;
        }
        let export = std::process::Command::new(&gpg)
            .arg("--homedir")
            .arg(home.path())
            .args(["--batch", "--pinentry-mode", "loopback", "--passphrase", passphrase])
            .args(["--armor", "--export-secret-keys"])
            .stderr(Stdio::null())
            .output()
            .ok()?;
        export
            .status
            .success()
            .then(|| String::from_utf8_lossy(&export.stdout).into_owned())
            .filter(|key| key.contains("BEGIN PGP PRIVATE KEY BLOCK"))
    }

    #[tokio::test]
    async fn gpg_signer_produces_armored_detached_signature() {
        let Some(private_key) = generate_key("correct horse") else {
            eprintln!("skipping: gpg not available");
            return;
        };
        let credentials = SigningCredentials {
            private_key,
            passphrase: "correct horse".into(),
        };
        let signer = GpgSigner::import(&credentials).await.unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let pom = tmp.path().join("r8-2.0.0.pom");
        std::fs::write(&pom, "<project/>").unwrap();

        let signature = signer.sign(&pom).await.unwrap();
        assert!(signature.starts_with("-----BEGIN PGP SIGNATURE-----"));
        assert!(signature.trim_end().ends_with("-----END PGP SIGNATURE-----"));

        if which::which(GPGCONF).is_ok() {
            assert!(kill_agent(signer.home.path()));
        }
    }

    #[test]
    fn kill_agent_reports_spawn_failure() {
        // A NUL byte in an argument makes the spawn itself fail.
        let home = Path::new("gnupg\0home");

        assert!(!kill_agent(home));
    }

    #[tokio::test]
    async fn import_rejects_garbage_key() {
        if which::which(GPG).is_err() {
            eprintln!("skipping: gpg not available");
            return;
        }
        let credentials = SigningCredentials {
            private_key: "not a key".into(),
            passphrase: "x".into(),
        };
        let err = GpgSigner::import(&credentials).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to import GPG private key"));
    }
}
