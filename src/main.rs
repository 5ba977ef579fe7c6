//! r8_release - publishes the unminified R8 distribution.
//!
//! Builds the Maven release, rewrites its version and coordinates, and
//! publishes it to Maven local (`--local`) or the Sonatype Central Portal.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stage warnings show by default, RUST_LOG=info for detail
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match r8_release::cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
