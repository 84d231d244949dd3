// Configuration module
// One immutable value object built at startup and passed into the server.

use serde::Deserialize;
use std::net::SocketAddr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub serve: ServeConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Static content configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    /// Root directory exposed over HTTP, relative paths resolve against the
    /// pinned working directory
    pub root: String,
    /// Index files tried in order when a directory is requested
    pub index_files: Vec<String>,
    /// Render a listing for directories without an index file (404 otherwise)
    pub directory_listing: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration with the default file name
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("playground")
    }

    /// Load configuration from the given file path (without extension).
    /// The file is optional; without it the defaults describe the stock
    /// playground setup: port 8085 serving `public/` next to the binary.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8085)?
            .set_default("serve.root", "public")?
            .set_default(
                "serve.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("serve.directory_listing", true)?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}
