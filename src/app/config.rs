//! Application configuration

/// Default backend origin when `SKRIBER_API_URL` is not set.
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Runtime configuration for the desktop client.
#[derive(Debug, Clone)]
pub struct Config {
    api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        let api_url =
            std::env::var("SKRIBER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self { api_url }
    }
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Backend base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_api_url() {
        std::env::remove_var("SKRIBER_API_URL");
        let config = Config::from_env();
        assert_eq!(config.api_url(), "http://127.0.0.1:8000");
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("SKRIBER_API_URL", "https://api.skriber.example");
        let config = Config::from_env();
        assert_eq!(config.api_url(), "https://api.skriber.example");
        std::env::remove_var("SKRIBER_API_URL");
    }

    #[test]
    fn test_explicit_api_url() {
        let config = Config::with_api_url("http://localhost:9000");
        assert_eq!(config.api_url(), "http://localhost:9000");
    }
}
