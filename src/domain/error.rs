// Error taxonomy of the composition engine
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    #[error("Widget id already present: {0}")]
    DuplicateId(String),

    #[error("Widget not found: {0}")]
    NotFound(String),

    #[error("Dashboard not found: {0}")]
    DashboardNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No dashboard is loaded")]
    NoDashboard,

    /// Network or persistence failure of an external collaborator.
    #[error("Remote failure: {0:#}")]
    RemoteFailure(anyhow::Error),
}

impl DashboardError {
    pub fn remote(error: anyhow::Error) -> Self {
        DashboardError::RemoteFailure(error)
    }
}
