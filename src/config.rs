//! Application configuration.
//!
//! The backend base address and the session storage directory both come
//! from the environment, with local-development defaults when unset.
//! `.env` files are loaded at startup before this module reads anything.

use std::path::PathBuf;

use anyhow::Result;

/// Application name used for data directory paths
const APP_NAME: &str = "nokori";

/// Backend origin used when NOKORI_API_BASE_URL is unset.
/// Matches the local development address of the backend service.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api/v1";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base address every API path is joined onto, without a trailing slash
    pub api_base_url: String,
    /// Directory holding the persisted session keys
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment
    pub fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("NOKORI_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let data_dir = match std::env::var_os("NOKORI_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
                .join(APP_NAME),
        };

        Ok(Self {
            api_base_url,
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything touching them
    // lives in one test.
    #[test]
    fn test_from_env_overrides_and_defaults() {
        std::env::remove_var("NOKORI_API_BASE_URL");
        std::env::remove_var("NOKORI_DATA_DIR");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        std::env::set_var("NOKORI_API_BASE_URL", "https://api.example.com/api/v1/");
        std::env::set_var("NOKORI_DATA_DIR", "/tmp/nokori-test");
        let config = Config::from_env().unwrap();
        // Trailing slash is trimmed so path joining stays predictable
        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/nokori-test"));

        std::env::remove_var("NOKORI_API_BASE_URL");
        std::env::remove_var("NOKORI_DATA_DIR");
    }
}
