//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and cached in memory; nothing in the
//! request path touches the environment.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for post-auth redirects and CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Name of the database inside the document store
    pub database_name: String,

    // --- Secrets ---
    /// Document store connection URI (absence is fatal at startup)
    pub mongodb_uri: String,
    /// Session signing secret (raw bytes)
    pub session_secret: Vec<u8>,
    /// Google OAuth client ID (external identity, optional)
    pub google_client_id: Option<String>,
    /// Google OAuth client secret (external identity, optional)
    pub google_client_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `MONGODB_URI` is the only hard requirement; every other value has a
    /// development default or disables its feature when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(v) => v.into_bytes(),
            Err(_) => {
                tracing::warn!("SESSION_SECRET not set, using development default");
                b"dev-session-secret-change-me!!".to_vec()
            }
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_name: env::var("MONGODB_DB").unwrap_or_else(|_| "wellness".to_string()),

            mongodb_uri: env::var("MONGODB_URI")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("MONGODB_URI"))?,
            session_secret,
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            database_name: "wellness_test".to_string(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            session_secret: b"test_session_secret_32_bytes!!!!".to_vec(),
            google_client_id: None,
            google_client_secret: None,
        }
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

    // Single test because env vars are process-global and tests run in
    // parallel threads.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MONGODB_URI");
        env::set_var("SESSION_SECRET", "test_session_secret_32_bytes!!!!");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MONGODB_URI")));

        env::set_var("MONGODB_URI", "mongodb://localhost:27017/test ");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017/test");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "wellness");
    }
}
