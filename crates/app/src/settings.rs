//! Application settings.
//!
//! Read from `config/settings.toml` (or the file named by
//! `LEDGERBOARD_CONFIG`), then overridden by `LEDGERBOARD__SECTION__KEY`
//! environment variables.
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "LEDGERBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct Seed {
    pub demo_users: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub seed: Seed,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(File::with_name(&path).required(false))
    }

    /// Defaults, then `file`, then the environment.
    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:./ledgerboard.db?mode=rwc")?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("seed.demo_users", true)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("LEDGERBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
