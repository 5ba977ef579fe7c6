//! Secrets needed by the remote publish path.
//!
//! Credentials are resolved once, up front, and handed to the publish stage
//! as a value so the remote path can run against fakes in tests.

use crate::release::error::{Error, Result};
use std::fmt;

/// ASCII-armored OpenPGP private key.
pub const GPG_PRIVATE_KEY: &str = "GPG_PRIVATE_KEY";
/// Passphrase of [`GPG_PRIVATE_KEY`].
pub const GPG_PRIVATE_KEY_PASSWORD: &str = "GPG_PRIVATE_KEY_PASSWORD";
/// Central Portal user token name.
pub const SONATYPE_USERNAME: &str = "SONATYPE_USERNAME";
/// Central Portal user token password.
pub const SONATYPE_PASSWORD: &str = "SONATYPE_PASSWORD";

/// Key material for detached artifact signatures.
#[derive(Clone)]
pub struct SigningCredentials {
    pub private_key: String,
    pub passphrase: String,
}

/// Central Portal user token.
#[derive(Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

/// Everything the remote publish path needs from the environment.
#[derive(Clone, Debug)]
pub struct PublishCredentials {
    pub signing: SigningCredentials,
    pub registry: RegistryCredentials,
}

impl PublishCredentials {
    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup`. Unset and empty values are both missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |variable: &'static str, message: String| {
            lookup(variable)
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingEnv { variable, message })
        };
        let signing_message = |v: &str| format!("Please specify {v}");
        let registry_message = |v: &str| format!("Specify {v} or --local to publish locally");

        let signing = SigningCredentials {
            private_key: get(GPG_PRIVATE_KEY, signing_message(GPG_PRIVATE_KEY))?,
            passphrase: get(
                GPG_PRIVATE_KEY_PASSWORD,
                signing_message(GPG_PRIVATE_KEY_PASSWORD),
            )?,
        };
        let registry = RegistryCredentials {
            username: get(SONATYPE_USERNAME, registry_message(SONATYPE_USERNAME))?,
            password: get(SONATYPE_PASSWORD, registry_message(SONATYPE_PASSWORD))?,
        };

        Ok(Self { signing, registry })
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("private_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
