use clap::Parser;
use std::net::SocketAddr;

/// Receive Sigfox uplink callbacks and store decoded readings in InfluxDB.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Host of InfluxDB server.
    #[arg(long, env = "INFLUX_HOST", default_value = "localhost")]
    pub influx_host: String,

    /// Port of the InfluxDB HTTP API.
    #[arg(long, env = "INFLUX_PORT", default_value_t = 8086)]
    pub influx_port: u16,

    /// Default InfluxDB database.
    #[arg(long, env = "INFLUX_DB", default_value = "sigfox")]
    pub influx_db: String,

    /// Address the callback server listens on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
