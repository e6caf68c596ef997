//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VENDOR_API_BASE_URL` - Base URL of the vendor platform API
//! - `VENDOR_ACCESS_TOKEN` - Vendor API access token
//!
//! ## Optional
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 3000)
//! - `CATALOG_TTL_SECS` - Catalog snapshot TTL in seconds (default: 86400)
//! - `INVENTORY_TTL_SECS` - Inventory snapshot TTL in seconds (default: 300)
//! - `PRODUCT_FLAGS_PATH` - Flag store file path (default: productFlags.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::cache::{CacheConfig, DEFAULT_CATALOG_TTL, DEFAULT_INVENTORY_TTL};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Vendor platform API configuration
    pub vendor: VendorConfig,
    /// Cache tier staleness tolerances
    pub cache: CacheConfig,
    /// Flag store file path
    pub flags_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Vendor platform API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct VendorConfig {
    /// Base URL of the vendor API (e.g., `https://connect.vendor.example/v2`)
    pub base_url: String,
    /// Vendor API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_PORT".to_string(), e.to_string()))?;

        let vendor = VendorConfig::from_env()?;

        let cache = CacheConfig {
            catalog_ttl: get_duration_secs("CATALOG_TTL_SECS", DEFAULT_CATALOG_TTL)?,
            inventory_ttl: get_duration_secs("INVENTORY_TTL_SECS", DEFAULT_INVENTORY_TTL)?,
        };

        let flags_path = PathBuf::from(get_env_or_default(
            "PRODUCT_FLAGS_PATH",
            "productFlags.json",
        ));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            vendor,
            cache,
            flags_path,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VendorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_env("VENDOR_API_BASE_URL")?,
            access_token: SecretString::from(get_required_env("VENDOR_ACCESS_TOKEN")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a duration in whole seconds, falling back to a default when the
/// variable is unset.
fn get_duration_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_duration_secs(&raw)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Parse a non-zero whole-second duration string.
fn parse_duration_secs(raw: &str) -> Option<Duration> {
    let secs = raw.trim().parse::<u64>().ok()?;
    if secs == 0 {
        return None;
    }
    Some(Duration::from_secs(secs))
}
