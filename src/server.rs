// `server.rs` wires the service together: parse options, install logging,
// make sure the store is reachable, register metrics and mount the routes.
use crate::{cli::Cli, handlers, metrics::Metrics, state::AppState, store::InfluxClient, telemetry};
use axum::{Extension, Router, routing::{get, post}};
use clap::Parser;
use prometheus::Registry;
use std::sync::Arc;
use tracing::{error, info};

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.log_level)?;
    info!(?cli, "starting sigfox-influx-bridge");

    let influx = InfluxClient::new(&cli.influx_host, cli.influx_port, &cli.influx_db);
    if let Err(e) = influx.ensure_database().await {
        error!(error = %e, url = influx.base_url(), "cannot reach InfluxDB, check hostname");
        std::process::exit(1);
    }

    info!(database = influx.database(), "using InfluxDB at {}", influx.base_url());

    let registry = Arc::new(Registry::new());
    let metrics = Metrics::new()?;
    metrics.register(&registry)?;

    let state = AppState::new(Arc::new(influx), metrics);
    let app = router(state, registry);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!(addr = %cli.listen, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState, registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(handlers::hello_world))
        .route("/data/{device}/up", post(handlers::ingest))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(Extension(state))
        .layer(Extension(registry))
}
