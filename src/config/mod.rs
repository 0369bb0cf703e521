use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Key/value configuration service seeded from the process environment.
#[derive(Clone, Default)]
pub struct ConfigService {
    entries: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Build a service preloaded with every environment variable.
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Typed view over the server keys, with defaults for anything unset.
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: self
                .get("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let config = ConfigService::default();
        config.set("HOST", "127.0.0.1");
        assert_eq!(config.get("HOST").as_deref(), Some("127.0.0.1"));
        assert_eq!(config.get("MISSING"), None);
    }

    #[test]
    fn server_config_falls_back_to_defaults() {
        let config = ConfigService::default();
        assert_eq!(config.server().addr(), "0.0.0.0:3000");

        config.set("HOST", "localhost");
        config.set("PORT", "8080");
        assert_eq!(config.server().addr(), "localhost:8080");
    }

    #[test]
    fn unparsable_port_falls_back() {
        let config = ConfigService::default();
        config.set("PORT", "not-a-port");
        assert_eq!(config.server().port, 3000);
    }
}
