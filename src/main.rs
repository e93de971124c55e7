//! # Cloud Resource Operator
//!
//! Watches `BlobStorage` resources and keeps a connection-detail secret in
//! place for each of them.
//!
//! Configuration is read from environment variables (see `ControllerConfig`).

use anyhow::Result;
use cloud_resource_operator::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;
    run_watch_loop(init.api, init.reconciler, init.server_state).await?;
    tracing::info!("Controller stopped");
    Ok(())
}
