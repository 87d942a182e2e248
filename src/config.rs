/// Configuration management
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    pub database_url: String,
    /// Symmetric signing secret, loaded once at process start and immutable
    /// thereafter.
    pub jwt_secret: String,
    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: i64,
    #[serde(default = "default_jwt_refresh_expiration_hours")]
    pub jwt_refresh_expiration_hours: i64,
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: usize,
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_jwt_expiration_hours() -> i64 {
    24
}

fn default_jwt_refresh_expiration_hours() -> i64 {
    168
}

fn default_rate_limit_requests() -> usize {
    100
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
