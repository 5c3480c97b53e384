//! # winctld: winctl daemon
//!
//! Composition root that wires all adapters together and runs the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize `tracing`
//! - Construct the entity store and the GetAdmin agent client (adapters)
//! - Provision the device entities, then listen for their changes
//! - Serve the JSON API next to the bridge
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use winctl_adapter_getadmin::GetAdminClient;
use winctl_adapter_http_axum::state::AppState;
use winctl_adapter_memory::MemoryEntityStore;
use winctl_app::bootstrap::Bootstrap;
use winctl_app::dispatcher::CommandDispatcher;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.log_filter());

    // Adapters
    let store = Arc::new(MemoryEntityStore::default());
    let agent = GetAdminClient::new(config.agent.clone())?;
    let dispatcher = Arc::new(CommandDispatcher::new(agent));

    // Bridge
    let bridge = config.bridge_config();
    let devices = bridge.devices.clone();
    let bootstrap = Bootstrap::new(bridge, Arc::clone(&store), dispatcher)?;
    let base = bootstrap.plan().base.clone();
    tracing::info!(%base, devices = devices.len(), "starting bridge");

    let bridge_task = tokio::spawn(async move {
        match bootstrap.start().await {
            Ok(listener) => listener.run().await,
            Err(err) => tracing::error!(error = %err, "bridge failed to start"),
        }
    });

    // HTTP
    let state = AppState::new(store, devices, base);
    let app = winctl_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "winctld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    bridge_task.abort();
    tracing::info!("winctld stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
