//! # Initialization
//!
//! Controller startup: rustls setup, tracing, metrics, the probe server,
//! the Kubernetes client and the provider registry.

use crate::config::ControllerConfig;
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::crd::BlobStorage;
use crate::observability;
use crate::provider::{KubeSecretStore, OpenShiftBlobStorageProvider, ProviderRegistry};
use anyhow::{Context, Result};
use kube::{api::Api, Client};
use std::sync::Arc;
use tracing::{error, info};

/// Everything the watch loop needs
pub struct InitializationResult {
    /// API for BlobStorage resources in the watched scope
    pub api: Api<BlobStorage>,
    /// Reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.ready())
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
pub async fn initialize() -> Result<InitializationResult> {
    // Must happen before any TLS connection is made
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|existing| {
            anyhow::anyhow!("Failed to install rustls crypto provider, one is already set: {existing:?}")
        })?;

    let config = ControllerConfig::from_env();
    observability::logging::init_tracing(&config).context("Failed to initialize tracing")?;

    info!("Starting Cloud Resource Operator");
    info!(
        "Build info: datetime={}, git_hash={}",
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!("Configuration: {:?}", config);

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    let server_state = Arc::new(ServerState::default());
    let server_port = config.metrics_port;
    let server_state_clone = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let api: Api<BlobStorage> = match config.watch_namespace.as_deref() {
        Some(namespace) => {
            info!("Watching BlobStorage resources in namespace '{}'", namespace);
            Api::namespaced(client.clone(), namespace)
        }
        None => {
            info!("Watching BlobStorage resources in all namespaces");
            Api::all(client.clone())
        }
    };

    let registry = build_registry(client.clone(), &config);
    info!("Registered providers: {:?}", registry.names());

    let reconciler = Arc::new(Reconciler::new(client, registry, config));

    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        api,
        reconciler,
        server_state,
    })
}

/// Providers available to the reconciler
pub fn build_registry(client: Client, config: &ControllerConfig) -> ProviderRegistry {
    let store = Arc::new(KubeSecretStore::new(client));
    let openshift = OpenShiftBlobStorageProvider::new(store)
        .with_request_timeout(config.store_request_timeout());
    ProviderRegistry::new().with_provider(Arc::new(openshift))
}
