use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// TTL for cached admin listing pages in seconds (default: `300`).
    pub listing_cache_ttl_secs: u64,
    /// Cache reaper scan interval in seconds (default: `300`).
    pub cache_reaper_interval_secs: u64,
    /// Low-demand sweep interval in seconds (default: `86400`, one day;
    /// `0` disables the scheduled sweep, leaving the manual trigger).
    pub sweep_interval_secs: u64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `LISTING_CACHE_TTL_SECS`     | `300`                      |
    /// | `CACHE_REAPER_INTERVAL_SECS` | `300`                      |
    /// | `SWEEP_INTERVAL_SECS`        | `86400`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);
        let listing_cache_ttl_secs = env_u64("LISTING_CACHE_TTL_SECS", 300);
        let cache_reaper_interval_secs = env_u64("CACHE_REAPER_INTERVAL_SECS", 300);
        let sweep_interval_secs = env_u64("SWEEP_INTERVAL_SECS", 86_400);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            listing_cache_ttl_secs,
            cache_reaper_interval_secs,
            sweep_interval_secs,
            jwt,
        }
    }
}

/// Parse an env var as u64, panicking on malformed values so
/// misconfiguration fails at startup rather than mid-request.
fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
