use crate::application::mutation::Role;
use crate::domain::grid::GridSettings;
use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub grid: GridSettings,
    pub history: HistorySettings,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

/// Remote data-source and dashboard API.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub store_path: String,
    pub default_role: Role,
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("server.bind_address", "0.0.0.0:8080")?
        .set_default("api.base_url", "http://localhost:4000")?
        .set_default("api.timeout_secs", 10)?
        .set_default("grid.columns", 12)?
        .set_default("grid.min_w", 2)?
        .set_default("grid.min_h", 2)?
        .set_default("grid.duplicate_offset_x", 2)?
        .set_default("grid.duplicate_offset_y", 1)?
        .set_default("history.capacity", 10)?
        .set_default("session.store_path", "data/session.json")?
        .set_default("session.default_role", "editor")
}

/// Load `config/dashboard.{toml,json,yaml}` if present, then `DASHBOARD__*`
/// environment overrides (e.g. `DASHBOARD__API__BASE_URL`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
