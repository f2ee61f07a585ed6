// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::history::HistoryManager;
use crate::application::layout::LayoutModel;
use crate::application::mutation::MutationPipeline;
use crate::application::session::DashboardSession;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::widget_catalog::WidgetCatalog;
use crate::application::widget_data_service::WidgetDataService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_session_store::FileSessionStore;
use crate::infrastructure::http_api_repository::HttpApiRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let remote = Arc::new(HttpApiRepository::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?);
    let store = Arc::new(FileSessionStore::new(&config.session.store_path));

    // Create the editing engine and services (application layer)
    let catalog = Arc::new(WidgetCatalog::with_defaults());
    let session = DashboardSession::new(
        MutationPipeline::new(catalog.clone(), LayoutModel::new(config.grid)),
        HistoryManager::new(config.history.capacity),
        config.session.default_role,
    );
    let dashboard_service = DashboardService::new(session, remote.clone(), store);
    let data_service = WidgetDataService::new(remote);
    let streaming_service = StreamingDashboardService::new(catalog.clone(), data_service.clone());

    let initial = dashboard_service.initialize().await;
    tracing::info!(
        dashboard = initial.dashboard.as_ref().map(|d| d.id.as_str()).unwrap_or("none"),
        role = ?initial.role,
        "Session initialized"
    );

    // Create application state
    let state = Arc::new(AppState {
        catalog,
        dashboard_service,
        data_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("Starting dashboard-composer service on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
