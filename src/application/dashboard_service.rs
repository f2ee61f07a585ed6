// Dashboard service - Use cases over the editing session and the remote store
use crate::application::dashboard_repository::DashboardRepository;
use crate::application::mutation::{MutationOutcome, Operation, Role};
use crate::application::session::DashboardSession;
use crate::application::session_store::{PersistedSession, SessionStore};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, Result};
use crate::domain::widget::WidgetInstance;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the renderer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub dashboard: Option<Dashboard>,
    pub role: Role,
    pub can_edit: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl SessionView {
    fn of(session: &DashboardSession) -> Self {
        Self {
            dashboard: session.current().cloned(),
            role: session.role(),
            can_edit: session.role().capability().can_mutate(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadOutcome {
    Loaded,
    /// The session changed while the fetch was in flight; the response was dropped.
    Stale,
}

#[derive(Clone)]
pub struct DashboardService {
    session: Arc<Mutex<DashboardSession>>,
    repository: Arc<dyn DashboardRepository>,
    store: Arc<dyn SessionStore>,
    /// Serializes local checkpoints so an older snapshot never lands last.
    checkpoint_lock: Arc<Mutex<()>>,
}

impl DashboardService {
    pub fn new(
        session: DashboardSession,
        repository: Arc<dyn DashboardRepository>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            repository,
            store,
            checkpoint_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Restore the last local session, or load the first remote dashboard.
    /// Falls back to an empty dashboard when the store cannot be reached.
    pub async fn initialize(&self) -> SessionView {
        match self.store.load().await {
            Ok(Some(saved)) => {
                let mut session = self.session.lock().await;
                if let Some(role) = saved.role {
                    session.set_role(role);
                }
                if let Some(dashboard) = saved.dashboard {
                    tracing::info!(dashboard_id = %dashboard.id, "Restored local session");
                    session.load(dashboard);
                    return SessionView::of(&session);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Could not read local session, starting fresh"),
        }

        let ticket = self.session.lock().await.begin_fetch();

        let dashboard = match self.repository.list_dashboards().await {
            Ok(dashboards) => dashboards
                .into_iter()
                .next()
                .unwrap_or_else(Dashboard::empty_default),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load dashboards, using an empty one");
                Dashboard::empty_default()
            }
        };

        let view = {
            let mut session = self.session.lock().await;
            if session.is_fresh(ticket) {
                session.load(dashboard);
            } else {
                tracing::info!(dashboard_id = %dashboard.id, "Discarded stale initial load");
            }
            SessionView::of(&session)
        };

        self.checkpoint().await;
        view
    }

    pub async fn view(&self) -> SessionView {
        SessionView::of(&*self.session.lock().await)
    }

    pub async fn current_dashboard(&self) -> Result<Dashboard> {
        self.session
            .lock()
            .await
            .current()
            .cloned()
            .ok_or(DashboardError::NoDashboard)
    }

    pub async fn widget(&self, id: &str) -> Result<WidgetInstance> {
        let session = self.session.lock().await;
        let dashboard = session.current().ok_or(DashboardError::NoDashboard)?;
        dashboard
            .widget(id)
            .cloned()
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))
    }

    pub async fn dispatch(&self, operation: Operation) -> Result<(MutationOutcome, SessionView)> {
        let (outcome, view) = {
            let mut session = self.session.lock().await;
            let outcome = session.dispatch(operation)?;
            (outcome, SessionView::of(&session))
        };

        if outcome.is_changed() {
            self.checkpoint().await;
        }
        Ok((outcome, view))
    }

    pub async fn undo(&self) -> SessionView {
        let (moved, view) = {
            let mut session = self.session.lock().await;
            let moved = session.undo();
            (moved, SessionView::of(&session))
        };

        if moved {
            self.checkpoint().await;
        }
        view
    }

    pub async fn redo(&self) -> SessionView {
        let (moved, view) = {
            let mut session = self.session.lock().await;
            let moved = session.redo();
            (moved, SessionView::of(&session))
        };

        if moved {
            self.checkpoint().await;
        }
        view
    }

    pub async fn set_role(&self, role: Role) -> SessionView {
        let view = {
            let mut session = self.session.lock().await;
            session.set_role(role);
            SessionView::of(&session)
        };

        self.checkpoint().await;
        view
    }

    /// Write the current dashboard to the remote store (last write wins).
    /// A failure leaves the local dashboard untouched and editable.
    pub async fn save(&self) -> Result<Dashboard> {
        let snapshot = self.current_dashboard().await?;

        let saved = self
            .repository
            .update_dashboard(&snapshot.id, &snapshot)
            .await
            .map_err(|e| {
                tracing::error!(dashboard_id = %snapshot.id, error = %e, "Save failed");
                DashboardError::remote(e)
            })?;

        tracing::info!(dashboard_id = %saved.id, "Dashboard saved");
        Ok(saved)
    }

    pub async fn list_remote(&self) -> Result<Vec<Dashboard>> {
        self.repository
            .list_dashboards()
            .await
            .map_err(DashboardError::remote)
    }

    /// Switch the session to another stored dashboard.
    pub async fn switch_to(&self, id: &str) -> Result<LoadOutcome> {
        let ticket = self.session.lock().await.begin_fetch();

        let dashboard = self
            .repository
            .get_dashboard(id)
            .await
            .map_err(DashboardError::remote)?
            .ok_or_else(|| DashboardError::DashboardNotFound(id.to_string()))?;

        let outcome = {
            let mut session = self.session.lock().await;
            if session.is_fresh(ticket) {
                session.load(dashboard);
                LoadOutcome::Loaded
            } else {
                tracing::info!(dashboard_id = %id, "Discarded stale dashboard response");
                LoadOutcome::Stale
            }
        };

        if outcome == LoadOutcome::Loaded {
            self.checkpoint().await;
        }
        Ok(outcome)
    }

    /// Create an empty dashboard remotely and open it.
    pub async fn create(&self, name: &str) -> Result<Dashboard> {
        let draft = Dashboard::new(
            format!("dashboard-{}", Utc::now().timestamp_millis()),
            name.to_string(),
        );

        let created = self
            .repository
            .create_dashboard(&draft)
            .await
            .map_err(DashboardError::remote)?;

        self.session.lock().await.load(created.clone());
        self.checkpoint().await;
        Ok(created)
    }

    /// Delete a stored dashboard. Deleting the open one leaves an empty default.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let existed = self
            .repository
            .delete_dashboard(id)
            .await
            .map_err(DashboardError::remote)?;
        if !existed {
            return Err(DashboardError::DashboardNotFound(id.to_string()));
        }

        let reset = {
            let mut session = self.session.lock().await;
            let is_open = session.current().is_some_and(|d| d.id == id);
            if is_open {
                session.load(Dashboard::empty_default());
            }
            is_open
        };

        if reset {
            self.checkpoint().await;
        }
        Ok(())
    }

    async fn checkpoint(&self) {
        // Snapshot under the checkpoint lock: writes happen in snapshot order.
        let _guard = self.checkpoint_lock.lock().await;
        let snapshot = {
            let session = self.session.lock().await;
            PersistedSession {
                dashboard: session.current().cloned(),
                role: Some(session.role()),
            }
        };

        if let Err(e) = self.store.save(&snapshot).await {
            tracing::warn!(error = %e, "Could not persist local session");
        }
    }
}
