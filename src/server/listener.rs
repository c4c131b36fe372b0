//! Tracker server listener
//!
//! Binds the HTTP/WebSocket listener and runs the distributor and the
//! optional device simulator next to it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::broadcast::Distributor;
use crate::error::{Error, Result};
use crate::server::config::ServerConfig;
use crate::server::routes::router;
use crate::server::state::AppState;
use crate::simulator::DeviceSimulator;
use crate::tracker::Tracker;

/// Location tracking server
pub struct TrackerServer {
    config: ServerConfig,
    tracker: Arc<Tracker>,
    distributor: Distributor,
}

impl TrackerServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let (tracker, distributor) = Tracker::new(config.tracker.clone());

        Self {
            config,
            tracker: Arc::new(tracker),
            distributor,
        }
    }

    /// Get a reference to the tracker
    pub fn tracker(&self) -> &Arc<Tracker> {
        &self.tracker
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "Geo tracker listening");
        log_endpoints();

        let distributor_handle = self.distributor.spawn();

        let simulator = if self.config.simulate_devices {
            let simulator = DeviceSimulator::new(
                self.tracker.ingest().clone(),
                self.config.simulator.clone(),
            );
            Some(simulator.spawn())
        } else {
            None
        };

        let app = router(AppState::new(
            Arc::clone(&self.tracker),
            self.config.max_subscribers,
        ));

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await
            .map_err(|e| Error::Serve(e.to_string()));

        if let Some(simulator) = simulator {
            simulator.shutdown().await;
        }

        // Stop distributor on shutdown
        distributor_handle.abort();

        result
    }
}

fn log_endpoints() {
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health - Health check");
    tracing::info!("  GET  /api/stats - Tracker counters");
    tracing::info!("  GET  /api/locations?tenantId=xxx - Latest locations of a tenant");
    tracing::info!("  GET  /api/locations/{{assetId}} - Latest location of an asset");
    tracing::info!("  POST /api/locations - Report a location");
    tracing::info!("  WS   /ws?tenantId=xxx - Real-time updates");
}
