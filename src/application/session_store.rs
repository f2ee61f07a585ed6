// Store trait for persisting the local editing session between restarts
use crate::application::mutation::Role;
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub dashboard: Option<Dashboard>,
    /// Absent in files written before roles were persisted; the configured
    /// default role applies then.
    #[serde(default)]
    pub role: Option<Role>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Previously saved session, `None` when nothing was stored yet
    async fn load(&self) -> anyhow::Result<Option<PersistedSession>>;

    async fn save(&self, session: &PersistedSession) -> anyhow::Result<()>;
}
