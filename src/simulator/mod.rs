//! Synthetic device producer
//!
//! Load generation for demos and soak tests. Each simulated device runs its
//! own task doing a random walk around a configured origin and submits
//! through [`UpdateIngest`] like any other producer. All tasks stop when the
//! returned [`SimulatorHandle`] is shut down.

pub mod config;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::broadcast::UpdateIngest;
use crate::location::LocationReport;

pub use config::{Fleet, SimulatorConfig};

/// Spawns simulated devices
#[derive(Debug, Clone)]
pub struct DeviceSimulator {
    ingest: UpdateIngest,
    config: SimulatorConfig,
}

impl DeviceSimulator {
    /// Create a simulator that submits through `ingest`
    pub fn new(ingest: UpdateIngest, config: SimulatorConfig) -> Self {
        Self { ingest, config }
    }

    /// Asset id of the `index`-th (0-based) device of a tenant
    ///
    /// Carries the whole tenant id so fleets never share an asset.
    pub fn asset_id(tenant_id: &str, index: usize) -> String {
        format!("asset-{}-{}", tenant_id, index + 1)
    }

    /// Start one task per device
    pub fn spawn(self) -> SimulatorHandle {
        let token = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for fleet in &self.config.fleets {
            tracing::info!(
                tenant = %fleet.tenant_id,
                devices = fleet.devices,
                "Simulating devices"
            );

            for index in 0..fleet.devices {
                let device = SimulatedDevice::new(
                    Self::asset_id(&fleet.tenant_id, index),
                    fleet.tenant_id.clone(),
                    &self.config,
                );
                tasks.spawn(device.run(self.ingest.clone(), token.clone()));
            }
        }

        SimulatorHandle { token, tasks }
    }
}

/// Running simulator
#[derive(Debug)]
pub struct SimulatorHandle {
    token: CancellationToken,
    tasks: JoinSet<()>,
}

impl SimulatorHandle {
    /// Number of device tasks still running
    pub fn device_count(&self) -> usize {
        self.tasks.len()
    }

    /// Token that stops every device when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop every device and wait for its task to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Simulated device task failed");
            }
        }
        tracing::info!("Device simulator stopped");
    }
}

struct SimulatedDevice {
    asset_id: String,
    tenant_id: String,
    latitude: f64,
    longitude: f64,
    step: f64,
    max_speed: f64,
    min_interval: Duration,
    max_interval: Duration,
    rng: StdRng,
}

impl SimulatedDevice {
    fn new(asset_id: String, tenant_id: String, config: &SimulatorConfig) -> Self {
        let mut rng = StdRng::from_os_rng();
        let (lat, lon) = config.origin;

        Self {
            asset_id,
            tenant_id,
            latitude: lat + (rng.random::<f64>() - 0.5) * config.spread,
            longitude: lon + (rng.random::<f64>() - 0.5) * config.spread,
            step: config.step,
            max_speed: config.max_speed,
            min_interval: config.min_interval,
            max_interval: config.max_interval,
            rng,
        }
    }

    /// Advance one step and build the report for it
    fn next_report(&mut self) -> LocationReport {
        self.latitude = (self.latitude + (self.rng.random::<f64>() - 0.5) * self.step)
            .clamp(-90.0, 90.0);
        self.longitude = (self.longitude + (self.rng.random::<f64>() - 0.5) * self.step)
            .clamp(-180.0, 180.0);

        LocationReport::new(self.asset_id.clone(), self.latitude, self.longitude)
            .tenant(self.tenant_id.clone())
            .speed(self.rng.random::<f64>() * self.max_speed)
            .heading(self.rng.random::<f64>() * 360.0)
            .accuracy(self.rng.random::<f64>() * 20.0 + 5.0)
    }

    fn next_pause(&mut self) -> Duration {
        let min = self.min_interval.as_millis() as u64;
        let max = self.max_interval.as_millis() as u64;
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    async fn run(mut self, ingest: UpdateIngest, token: CancellationToken) {
        tracing::debug!(asset_id = %self.asset_id, "Simulated device started");

        while !token.is_cancelled() {
            let report = self.next_report();
            if let Err(e) = ingest.submit_report(report).await {
                tracing::warn!(asset_id = %self.asset_id, error = %e, "Simulated report rejected");
            }

            let pause = self.next_pause();
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        tracing::debug!(asset_id = %self.asset_id, "Simulated device stopped");
    }
}
