// `main.rs` only declares modules and hands over to `server::run()`.
// Frame decoding lives in `frame` and `conversions`, request handling in
// `uplink` and `handlers`, and the InfluxDB client in `store`.
mod cli;
mod conversions;
mod error;
mod frame;
mod handlers;
mod metrics;
mod point;
mod server;
mod state;
mod store;
mod telemetry;
mod uplink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run().await
}
