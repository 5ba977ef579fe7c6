//! Release tooling for the unminified R8 distribution.
//!
//! Builds R8's Maven release with the upstream script, republishes it under
//! `net.mbonnin.r8:r8` with the requested version, and installs it into
//! Maven local or uploads a signed bundle to the Sonatype Central Portal.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod release;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
