//! Server settings read from the environment once at startup.

use std::net::SocketAddr;

use anyhow::Context as _;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The only origin allowed by CORS.
    pub frontend_url: String,
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `FRONTEND_URL`, and `FETCH_TIMEOUT_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(port) => port.parse().with_context(|| format!("invalid PORT: {port}"))?,
            None => defaults.port,
        };
        let fetch_timeout_secs = match get("FETCH_TIMEOUT_SECS") {
            Some(secs) => secs.parse().with_context(|| format!("invalid FETCH_TIMEOUT_SECS: {secs}"))?,
            None => defaults.fetch_timeout_secs,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            frontend_url: get("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            fetch_timeout_secs,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("HOST", "127.0.0.1"),
            ("FRONTEND_URL", "https://app.example.com"),
            ("FETCH_TIMEOUT_SECS", " 30 "),
        ]))
        .unwrap();

        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(config.frontend_url, "https://app.example.com");
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "  "), ("HOST", "")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }
}
