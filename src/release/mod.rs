//! Release pipeline for the unminified R8 distribution.
//!
//! Takes the Maven release zip produced by R8's own build, republishes it
//! under `net.mbonnin.r8:r8` with the requested version, and either installs
//! it into Maven local or uploads a signed bundle to the Central Portal.
//!
//! # Example
//!
//! ```no_run
//! use r8_release::release::{ProjectLayout, ReleaseVersion, Releaser};
//!
//! # async fn example() -> r8_release::release::Result<()> {
//! let releaser = Releaser::new(
//!     ProjectLayout::new(".", None),
//!     ReleaseVersion::new("8.2.47", Some("8.2.47-dev".into()))?,
//! );
//! let prepared = releaser.prepare().await?;
//! releaser
//!     .publish_local(&prepared, std::path::Path::new("/home/me/.m2/repository"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod acquire;
pub mod archive;
pub mod checksum;
pub mod credentials;
mod error;
mod orchestrator;
pub mod publish;
pub mod registry;
mod settings;
pub mod signing;
pub mod tool_detection;
pub mod transform;
pub mod utils;

pub use credentials::{PublishCredentials, RegistryCredentials, SigningCredentials};
pub use error::{Context, Error, ErrorExt, Result};
pub use orchestrator::{PreparedRelease, Releaser};
pub use registry::{CENTRAL_PORTAL_URL, PortalClient, PublicationType, Registry};
pub use settings::{ProjectLayout, R8_RELOCATION, ReleaseVersion, Relocation};
pub use signing::{GpgSigner, Signer};
