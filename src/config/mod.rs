// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, DatabaseConfig, HealthConfig, StaticFilesConfig, StoreBackend};

/// Default config file, resolved without extension by the `config` crate
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the file (optional),
    /// then `BRAND__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3009)?
            .set_default("database.backend", "mongo")?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "branddb")?
            .set_default("database.collection", "brands")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.server_name", "brand_server")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.keep_alive", true)?
            .set_default("static_files.dir", "public")?
            .set_default("static_files.index_files", vec!["index.html"])?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BRAND")
                    .prefix_separator("__")
                    .separator("__"),
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
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/brand-config").unwrap();
        assert_eq!(cfg.server.port, 3009);
        assert_eq!(cfg.database.name, "branddb");
        assert_eq!(cfg.database.collection, "brands");
        assert_eq!(cfg.static_files.index_files, vec!["index.html".to_string()]);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.readiness_path, "/readyz");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does-not-exist/brand-config").unwrap();
        cfg.server.host = "0.0.0.0".to_string();
        cfg.server.port = 8080;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
