// Repository trait for the remote dashboard store
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// List all stored dashboards
    async fn list_dashboards(&self) -> anyhow::Result<Vec<Dashboard>>;

    /// Fetch one dashboard, `None` when the store does not know the id
    async fn get_dashboard(&self, id: &str) -> anyhow::Result<Option<Dashboard>>;

    /// Create a dashboard; the store may assign the id
    async fn create_dashboard(&self, dashboard: &Dashboard) -> anyhow::Result<Dashboard>;

    /// Partial update (last write wins, no version check)
    async fn update_dashboard(&self, id: &str, dashboard: &Dashboard) -> anyhow::Result<Dashboard>;

    /// Delete a dashboard, `false` when it did not exist
    async fn delete_dashboard(&self, id: &str) -> anyhow::Result<bool>;
}
