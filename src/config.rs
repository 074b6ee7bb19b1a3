//! Server settings from the environment: HOST, PORT, DEFAULT_MAX_TEAMS.

use crate::models::DEFAULT_MAX_TEAMS;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity used when a create request does not give `max_teams`.
    pub default_max_teams: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_max_teams: DEFAULT_MAX_TEAMS,
        }
    }
}

impl ServerConfig {
    /// Read from the process environment. Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            default_max_teams: lookup("DEFAULT_MAX_TEAMS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.default_max_teams),
        }
    }
}
