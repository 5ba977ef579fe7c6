//! Publish stage: Maven local copy or signed upload to the Central Portal.

mod local;
mod remote;

pub use local::publish_local;
pub use remote::{
    ArtifactPartition, PUBLISHABLE_EXTENSIONS, Sidecars, UPLOAD_LABEL, partition_artifacts,
    publish_remote, sidecar_path, write_sidecars,
};
