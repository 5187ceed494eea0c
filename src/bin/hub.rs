use std::sync::Arc;

use clap::Parser;
use disaster_monitoring::{
    actors::generator::GeneratorContext,
    alerts::AlertBuffer,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    hub::BroadcastHub,
    supervisor::LocationSupervisor,
};
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON); built-in defaults are used when omitted
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("disaster_monitoring", LevelFilter::DEBUG),
        ("disaster_hub", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => {
            debug!("no config file given, using defaults");
            Config::default()
        }
    };
    let catalog = config.validate()?;

    let context = GeneratorContext {
        catalog: Arc::new(catalog),
        alerts: AlertBuffer::new(),
        hub: BroadcastHub::new(config.hub_capacity),
        interval: config.interval(),
        spike_probability: config.spike_probability,
    };

    let supervisor = LocationSupervisor::new(config.locations.clone(), context, config.seed);
    supervisor.start().await;

    let api_config = ApiConfig::from(config.api.clone());
    let addr = spawn_api_server(api_config, ApiState::new(supervisor.clone())).await?;
    info!("hub ready on http://{addr}");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    for handle in supervisor.stop_all().await {
        handle.stopped().await;
    }

    Ok(())
}
