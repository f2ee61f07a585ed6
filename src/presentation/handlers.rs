// HTTP request handlers
use crate::application::dashboard_service::SessionView;
use crate::application::mutation::{MutationOutcome, Operation, Role};
use crate::domain::error::DashboardError;
use crate::infrastructure::chunked_frames::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Deserialize)]
pub struct CreateDashboardRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct OperationResponse {
    pub outcome: MutationOutcome,
    pub session: SessionView,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Widget gallery grouped by category
pub async fn list_widgets(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(StatusCode::OK, &state.catalog.list_by_category(), &headers).await
}

pub async fn get_session(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.dashboard_service.view().await;
    respond(StatusCode::OK, &view, &headers).await
}

pub async fn set_role(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RoleRequest>,
) -> Response {
    let view = state.dashboard_service.set_role(request.role).await;
    respond(StatusCode::OK, &view, &headers).await
}

/// Apply one structural operation to the open dashboard
pub async fn apply_operation(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(operation): Json<Operation>,
) -> Result<Response, ApiError> {
    let name = operation.name();
    let (outcome, session) = state.dashboard_service.dispatch(operation).await?;
    tracing::info!(operation = name, changed = outcome.is_changed(), "Operation applied");

    let body = OperationResponse { outcome, session };
    Ok(respond(StatusCode::OK, &body, &headers).await)
}

pub async fn undo(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.dashboard_service.undo().await;
    respond(StatusCode::OK, &view, &headers).await
}

pub async fn redo(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.dashboard_service.redo().await;
    respond(StatusCode::OK, &view, &headers).await
}

pub async fn save(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let saved = state.dashboard_service.save().await?;
    Ok(respond(StatusCode::OK, &saved, &headers).await)
}

/// Stream data for every widget of the open dashboard (progressive loading)
pub async fn stream_session(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state.dashboard_service.current_dashboard().await?;
    let rx = state.streaming_service.stream_dashboard(dashboard).await;
    Ok(stream_from_receiver(rx, accepts_brotli(&headers)).await)
}

pub async fn widget_data(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let widget = state.dashboard_service.widget(&id).await?;
    let payload = state
        .data_service
        .fetch(&widget)
        .await
        .map_err(DashboardError::remote)?;
    Ok(respond(StatusCode::OK, &payload, &headers).await)
}

pub async fn list_data_sources(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let sources = state
        .data_service
        .list_data_sources()
        .await
        .map_err(DashboardError::remote)?;
    Ok(respond(StatusCode::OK, &sources, &headers).await)
}

pub async fn list_dashboards(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let dashboards = state.dashboard_service.list_remote().await?;
    Ok(respond(StatusCode::OK, &dashboards, &headers).await)
}

pub async fn create_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDashboardRequest>,
) -> Result<Response, ApiError> {
    let created = state.dashboard_service.create(&request.name).await?;
    Ok(respond(StatusCode::CREATED, &created, &headers).await)
}

pub async fn open_dashboard(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let outcome = state.dashboard_service.switch_to(&id).await?;
    let view = state.dashboard_service.view().await;
    let body = serde_json::json!({ "load": outcome, "session": view });
    Ok(respond(StatusCode::OK, &body, &headers).await)
}

pub async fn delete_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.dashboard_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
