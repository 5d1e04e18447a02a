use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::ConnectOptions;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub database_name: String,

    // Require demands TLS; Prefer falls back when the server lacks it
    #[serde(default)]
    pub require_ssl: bool,

    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,

    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "DatabaseSettings::default_acquire_timeout", rename = "acquire_timeout_secs")]
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    const fn default_max_connections() -> u32 {
        10
    }

    const fn default_acquire_timeout() -> Duration {
        Duration::from_secs(2)
    }

    pub fn pg_connect_options_without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl { PgSslMode::Require } else { PgSslMode::Prefer };
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(ssl_mode)
    }

    pub fn pg_connect_options_with_db(&self) -> PgConnectOptions {
        let mut options = self.pg_connect_options_without_db().database(&self.database_name);
        options.log_statements(tracing_log::log::LevelFilter::Trace);
        options
    }

    pub fn pg_pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}
