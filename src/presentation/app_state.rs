// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::widget_catalog::WidgetCatalog;
use crate::application::widget_data_service::WidgetDataService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<WidgetCatalog>,
    pub dashboard_service: DashboardService,
    pub data_service: WidgetDataService,
    pub streaming_service: StreamingDashboardService,
}
