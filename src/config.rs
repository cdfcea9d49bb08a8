use clap::Parser;

/// Simulated temperature sensor served over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "sensor-server", version)]
pub struct Config {
    /// SQLite database file, created on first start.
    #[arg(long, env = "SENSOR_DATABASE", default_value = "./database.sqlite3")]
    pub database: String,

    /// Address the HTTP server listens on.
    #[arg(long, env = "SENSOR_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "SENSOR_POOL_SIZE", default_value = "4")]
    pub pool_size: u32,
}
