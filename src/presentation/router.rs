// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_operation, create_dashboard, delete_dashboard, get_session, health_check,
    list_dashboards, list_data_sources, list_widgets, open_dashboard, redo, save, set_role,
    stream_session, undo, widget_data,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/widgets", get(list_widgets))
        .route("/datasources", get(list_data_sources))
        .route("/session", get(get_session))
        .route("/session/role", put(set_role))
        .route("/session/operations", post(apply_operation))
        .route("/session/undo", post(undo))
        .route("/session/redo", post(redo))
        .route("/session/save", post(save))
        .route("/session/stream", get(stream_session))
        .route("/session/widgets/:id/data", get(widget_data))
        .route("/dashboards", get(list_dashboards).post(create_dashboard))
        .route("/dashboards/:id/open", post(open_dashboard))
        .route("/dashboards/:id", delete(delete_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::history::HistoryManager;
    use crate::application::layout::LayoutModel;
    use crate::application::mutation::{MutationPipeline, Role};
    use crate::application::session::DashboardSession;
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::application::widget_catalog::WidgetCatalog;
    use crate::application::widget_data_service::WidgetDataService;
    use crate::infrastructure::file_session_store::FileSessionStore;
    use crate::infrastructure::http_api_repository::HttpApiRepository;
    use serde_json::{json, Value};
    use std::time::Duration;

    /// Serve the app against an unreachable remote API so every remote call fails.
    async fn spawn_app(dir: &tempfile::TempDir, role: Role) -> String {
        let catalog = Arc::new(WidgetCatalog::with_defaults());
        let remote = Arc::new(
            HttpApiRepository::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1))
                .unwrap(),
        );
        let session = DashboardSession::new(
            MutationPipeline::new(catalog.clone(), LayoutModel::default()),
            HistoryManager::default(),
            role,
        );
        let dashboard_service = DashboardService::new(
            session,
            remote.clone(),
            Arc::new(FileSessionStore::new(dir.path().join("session.json"))),
        );
        dashboard_service.initialize().await;

        let data_service = WidgetDataService::new(remote);
        let state = Arc::new(AppState {
            catalog: catalog.clone(),
            dashboard_service,
            data_service: data_service.clone(),
            streaming_service: StreamingDashboardService::new(catalog, data_service),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_edit_undo_redo_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_app(&dir, Role::Editor).await;
        let client = reqwest::Client::new();

        let session: Value = client
            .get(format!("{}/session", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(session["dashboard"]["id"], "default");

        let response: Value = client
            .post(format!("{}/session/operations", base))
            .json(&json!({ "op": "addFromCatalog", "widgetType": "kpi.simple" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(response["outcome"]["result"], "changed");
        assert_eq!(response["session"]["canUndo"], true);

        let undone: Value = client
            .post(format!("{}/session/undo", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(undone["dashboard"]["layout"], json!([]));

        let redone: Value = client
            .post(format!("{}/session/redo", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(redone["dashboard"]["layout"][0]["widgetType"], "kpi.simple");
    }

    #[tokio::test]
    async fn test_viewer_gets_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_app(&dir, Role::Viewer).await;

        let response = reqwest::Client::new()
            .post(format!("{}/session/operations", base))
            .json(&json!({ "op": "removeWidget", "id": "w1" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "PermissionDenied");
    }

    #[tokio::test]
    async fn test_unknown_widget_type_is_unprocessable() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_app(&dir, Role::Editor).await;

        let response = reqwest::Client::new()
            .post(format!("{}/session/operations", base))
            .json(&json!({ "op": "addFromCatalog", "widgetType": "unknown.type" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_save_against_unreachable_store_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_app(&dir, Role::Editor).await;

        let response = reqwest::Client::new()
            .post(format!("{}/session/save", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_widget_gallery_lists_categories() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_app(&dir, Role::Editor).await;

        let groups: Value = reqwest::get(format!("{}/widgets", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(groups[0]["category"], "Charts");
        assert_eq!(groups[0]["widgets"][0]["id"], "chart.timeseries");
        assert_eq!(groups[0]["widgets"][0]["defaultSize"], json!({ "w": 6, "h": 4 }));
    }
}
