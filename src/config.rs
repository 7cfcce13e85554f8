//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Wallet Credentials ===
    /// Wallet private key (hex, starts with 0x). Required.
    pub private_key: String,

    /// Signature type: 0=EOA, 1=Magic.link, 2=Gnosis Safe.
    #[serde(default)]
    pub signature_type: u8,

    /// Proxy wallet address (required for Magic.link).
    #[serde(default)]
    pub funder: Option<String>,

    // === Venue Endpoints ===
    /// CLOB API base URL.
    #[serde(default = "default_clob_url")]
    pub clob_url: String,

    /// Gamma catalog API base URL.
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,

    // === Execution Parameters ===
    /// Per-order submission deadline in milliseconds.
    #[serde(default = "default_execution_timeout_ms")]
    pub execution_timeout_ms: u64,

    /// Simulation mode (no real orders).
    #[serde(default = "default_true")]
    pub dry_run: bool,

    // === HTTP Tuning ===
    /// Outbound HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connection pool size per host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// Listen port for the operator console and live channel.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable the Prometheus exporter.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Prometheus exporter port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_execution_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_http_timeout_ms() -> u64 {
    2000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    3000
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid. Failures here are fatal at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.private_key.is_empty() {
            return Err("PRIVATE_KEY is required".to_string());
        }

        if !self.private_key.starts_with("0x") {
            return Err("PRIVATE_KEY must start with 0x".to_string());
        }

        for (name, value) in [("CLOB_URL", &self.clob_url), ("GAMMA_URL", &self.gamma_url)] {
            url::Url::parse(value).map_err(|e| format!("{name} is not a valid URL: {e}"))?;
        }

        if self.execution_timeout_ms == 0 {
            return Err("EXECUTION_TIMEOUT_MS must be positive".to_string());
        }

        Ok(())
    }

    /// Check if using Magic.link (signature_type == 1).
    pub fn is_magic_link(&self) -> bool {
        self.signature_type == 1
    }
}

#[cfg(test)]
impl Config {
    /// A valid dry-run configuration for unit tests.
    pub(crate) fn test_defaults() -> Self {
        Self {
            private_key: "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
                .to_string(),
            signature_type: 0,
            funder: None,
            clob_url: default_clob_url(),
            gamma_url: default_gamma_url(),
            execution_timeout_ms: default_execution_timeout_ms(),
            dry_run: true,
            http_timeout_ms: default_http_timeout_ms(),
            http_pool_size: default_http_pool_size(),
            port: default_port(),
            metrics_enabled: true,
            metrics_port: default_metrics_port(),
            rust_log: default_log_level(),
        }
    }
}
