//! External tool detection.
//!
//! The release shells out to `unzip` for extraction and `gpg` for signing.
//! Both are looked up on `PATH` before the first invocation so a missing
//! tool is reported by name instead of as a spawn failure.

use crate::release::error::{Error, Result};
use std::path::PathBuf;

/// Archive extraction tool.
pub const UNZIP: &str = "unzip";

/// OpenPGP signing tool.
pub const GPG: &str = "gpg";

/// Resolves `tool` on `PATH`.
pub fn require_tool(tool: &'static str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => Err(Error::MissingTool {
            tool,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_by_name() {
        let err = require_tool("r8-release-definitely-not-installed").unwrap_err();
        assert!(err.to_string().starts_with("`r8-release-definitely-not-installed` not found"));
    }
}
