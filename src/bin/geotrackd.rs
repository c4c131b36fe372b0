//! geotrackd - real-time location tracking daemon
//!
//! Run with: cargo run --bin geotrackd -- [OPTIONS]
//!
//! Examples:
//!   geotrackd                                  # binds to 0.0.0.0:3009
//!   geotrackd --port 3010 --simulate-devices   # demo fleets on port 3010
//!   PORT=4000 LOG_JSON=true geotrackd          # env fallbacks, JSON logs
//!
//! Options are also read from the environment and from a `.env` file in the
//! working directory.
//!
//! ## Try it
//!
//!   curl -X POST localhost:3009/api/locations \
//!        -d '{"assetId":"a1","latitude":10,"longitude":20,"tenantId":"x"}' \
//!        -H 'content-type: application/json'
//!   curl 'localhost:3009/api/locations?tenantId=x'
//!   websocat 'ws://localhost:3009/ws?tenantId=x'

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use geotrack_rs::broadcast::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SUBSCRIBER_BUFFER};
use geotrack_rs::server::config::DEFAULT_PORT;
use geotrack_rs::{ServerConfig, TrackerConfig, TrackerServer};

#[derive(Parser, Debug)]
#[command(name = "geotrackd")]
#[command(version, about = "Real-time location tracking with tenant-scoped WebSocket fan-out")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Run simulated device fleets
    #[arg(long, env = "SIMULATE_DEVICES")]
    simulate_devices: bool,

    /// Pending updates held for the distributor before new ones are dropped
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Notifications buffered per subscriber before it starts missing updates
    #[arg(long, env = "SUBSCRIBER_BUFFER", default_value_t = DEFAULT_SUBSCRIBER_BUFFER)]
    subscriber_buffer: usize,

    /// Maximum concurrent WebSocket subscribers (0 = unlimited)
    #[arg(long, env = "MAX_SUBSCRIBERS", default_value_t = 0)]
    max_subscribers: usize,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        let tracker = TrackerConfig::default()
            .queue_capacity(self.queue_capacity)
            .subscriber_buffer(self.subscriber_buffer);

        ServerConfig::with_addr(SocketAddr::new(self.host, self.port))
            .simulate_devices(self.simulate_devices)
            .max_subscribers(self.max_subscribers)
            .tracker(tracker)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "geotrack_rs=info,geotrackd=info,tower_http=warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(cli.log_json);

    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded .env file");
    }

    let config = cli.server_config();
    tracing::info!(
        addr = %config.bind_addr,
        simulate_devices = config.simulate_devices,
        queue_capacity = config.tracker.queue_capacity,
        subscriber_buffer = config.tracker.subscriber_buffer,
        "Starting geo tracker"
    );

    TrackerServer::new(config)
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("geo tracker failed")?;

    tracing::info!("Geo tracker stopped");
    Ok(())
}
