//! Helpers shared by the release stages.

pub mod fs;
