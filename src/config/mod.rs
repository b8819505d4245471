//! Configuration module entry point
//!
//! Loads layered configuration and owns the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, CorruptPolicy, HealthConfig, StorageConfig};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest priority first: built-in defaults, the config file
    /// (if present), then `BLOG_*` environment variables such as
    /// `BLOG_SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("storage.path", "blog_posts.json")?
            .set_default("storage.on_corrupt", "empty")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace", 5)?
            .set_default("http.server_name", "blogpost-server")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
pub(crate) fn test_config(store_path: &std::path::Path) -> Config {
    use types::{HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        storage: StorageConfig {
            path: store_path.display().to_string(),
            on_corrupt: CorruptPolicy::Empty,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
            shutdown_grace: 5,
        },
        http: HttpConfig {
            server_name: "blogpost-server".to_string(),
            max_body_size: 1024,
        },
        health: HealthConfig::default(),
    }
}
