// Configuration module entry point
// Loads layered configuration: defaults, optional config file, environment

mod types;

use std::net::SocketAddr;

pub use types::{AssetsConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; environment variables with the `SERVER` prefix
    /// override file values (nested keys separated by `__`, e.g.
    /// `SERVER__SERVER__PORT=8080`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("assets.root", "detect-js")?
            .set_default("assets.index", "index.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.assets.root, "detect-js");
        assert_eq!(cfg.assets.index, "index.html");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 3000;
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn socket_addr_rejects_garbage_host() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
