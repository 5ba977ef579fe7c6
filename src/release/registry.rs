//! Upload of the release bundle to the Sonatype Central Portal.

use crate::release::{
    credentials::RegistryCredentials,
    error::{Context, Error, ErrorExt, Result},
};
use base64::Engine;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use url::Url;

/// Production Central Portal.
pub const CENTRAL_PORTAL_URL: &str = "https://central.sonatype.com";

const UPLOAD_ENDPOINT: &str = "api/v1/publisher/upload";

/// How the registry treats a deployment once it validates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicationType {
    /// Held until someone publishes it from the portal UI.
    UserManaged,
}

impl PublicationType {
    /// Value of the `publishingType` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserManaged => "USER_MANAGED",
        }
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for release bundles.
#[allow(async_fn_in_trait)]
pub trait Registry {
    /// Uploads `bundle` under the human-readable `name`. Returns the deployment id.
    async fn upload(&self, bundle: &Path, name: &str, publication: PublicationType)
    -> Result<String>;
}

/// Central Portal publisher API client.
pub struct PortalClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PortalClient {
    /// Creates a client authenticating with a portal user token.
    pub fn new(base_url: &str, credentials: &RegistryCredentials) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let token = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.username, credentials.password
        ));

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Upload URL carrying the deployment name and publishing type.
    pub fn upload_url(&self, name: &str, publication: PublicationType) -> Result<Url> {
        let mut url = self.base_url.join(UPLOAD_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("publishingType", publication.as_str());
        Ok(url)
    }
}

impl Registry for PortalClient {
    async fn upload(
        &self,
        bundle: &Path,
        name: &str,
        publication: PublicationType,
    ) -> Result<String> {
        let url = self.upload_url(name, publication)?;
        let file_name = bundle
            .file_name()
            .context("bundle path has no file name")?
            .to_string_lossy()
            .into_owned();

        let file = tokio::fs::File::open(bundle)
            .await
            .fs_context("opening bundle", bundle)?;
        let length = file
            .metadata()
            .await
            .fs_context("reading bundle metadata", bundle)?
            .len();
        let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        log::info!("Uploading {} ({} bytes) to {}", bundle.display(), length, url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(Form::new().part("bundle", part))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::UploadRejected { status, body });
        }

        Ok(body.trim().to_string())
    }
}
