//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; no config is re-read at runtime.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID for the Firestore store.
    /// For local development with the emulator, set FIRESTORE_EMULATOR_HOST.
    pub gcp_project_id: String,
    /// Allowed cross-origin caller (the web client)
    pub cors_origin: String,

    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime in days
    pub jwt_expiry_days: i64,

    /// YouTube Data API key; solution enrichment is disabled when absent
    pub youtube_api_key: Option<String>,
    /// Per-platform solution playlist IDs
    pub codeforces_playlist_id: Option<String>,
    pub codechef_playlist_id: Option<String>,
    pub leetcode_playlist_id: Option<String>,

    /// Contest refresh period in milliseconds
    pub contest_refresh_interval_ms: u64,
    /// Solution enrichment period in milliseconds
    pub solution_refresh_interval_ms: u64,
}

const DEFAULT_CONTEST_REFRESH_MS: u64 = 60 * 60 * 1000; // hourly
const DEFAULT_SOLUTION_REFRESH_MS: u64 = 24 * 60 * 60 * 1000; // daily

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            gcp_project_id: "test-project".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_expiry_days: 7,
            youtube_api_key: None,
            codeforces_playlist_id: None,
            codechef_playlist_id: None,
            leetcode_playlist_id: None,
            contest_refresh_interval_ms: DEFAULT_CONTEST_REFRESH_MS,
            solution_refresh_interval_ms: DEFAULT_SOLUTION_REFRESH_MS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            jwt_expiry_days: env::var("JWT_EXPIRY_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),

            youtube_api_key: env::var("YOUTUBE_API_KEY").ok().map(|v| v.trim().to_string()),
            codeforces_playlist_id: env::var("CODEFORCES_PLAYLIST_ID").ok(),
            codechef_playlist_id: env::var("CODECHEF_PLAYLIST_ID").ok(),
            leetcode_playlist_id: env::var("LEETCODE_PLAYLIST_ID").ok(),

            contest_refresh_interval_ms: env::var("CONTEST_REFRESH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONTEST_REFRESH_MS),
            solution_refresh_interval_ms: env::var("SOLUTION_REFRESH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SOLUTION_REFRESH_MS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations don't race across test threads.
    #[test]
    fn test_config_from_env() {
        env::remove_var("JWT_SIGNING_KEY");
        assert!(Config::from_env().is_err());

        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("CONTEST_REFRESH_INTERVAL", "120000");
        env::remove_var("YOUTUBE_API_KEY");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.contest_refresh_interval_ms, 120_000);
        assert_eq!(config.youtube_api_key, None);
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }
}
