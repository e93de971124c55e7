//! # Watch Loop
//!
//! Controller watch loop that monitors BlobStorage resources and triggers
//! reconciliation when changes are detected.

use crate::controller::reconciler::{reconcile, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::BlobStorage;
use crate::runtime::error_policy::handle_reconciliation_error;
use futures::StreamExt;
use kube::api::Api;
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run the controller until a shutdown signal is received
///
/// A watch stream that ends without a shutdown request is restarted after the
/// configured delay.
pub async fn run_watch_loop(
    api: Api<BlobStorage>,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
) -> Result<(), anyhow::Error> {
    let restart_delay = reconciler.config.watch_restart_delay_duration();

    let shutdown_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Received shutdown signal, initiating graceful shutdown...");
        shutdown_state.set_ready(false);
    });

    server_state.set_ready(true);

    loop {
        let watch_span = tracing::span!(
            tracing::Level::INFO,
            "controller.watch",
            operation = "watch_loop"
        );

        info!(parent: &watch_span, "Starting controller watch loop...");
        Controller::new(api.clone(), watcher::Config::default())
            .shutdown_on_signal()
            .run(reconcile, handle_reconciliation_error, Arc::clone(&reconciler))
            .for_each(|result| async move {
                match result {
                    Ok((obj, _action)) => debug!("Reconciled {}", obj.name),
                    Err(e) => warn!("Controller stream error: {}", e),
                }
            })
            .await;

        if !server_state.ready() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        warn!(
            "Controller stream ended unexpectedly, restarting in {}s",
            restart_delay.as_secs()
        );
        tokio::time::sleep(restart_delay).await;

        // The shutdown handler may have fired while the stream was draining
        if !server_state.ready() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }
    }

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM where available
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
