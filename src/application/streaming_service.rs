// Streaming dashboard service - Progressive loading of widget data
use crate::application::widget_catalog::WidgetCatalog;
use crate::application::widget_data_service::WidgetDataService;
use crate::domain::dashboard::Dashboard;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSkeleton {
    pub id: String,
    pub widget_type: String,
    pub title: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub dashboard_id: String,
    pub name: String,
    pub widgets: Vec<WidgetSkeleton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    WidgetData {
        id: String,
        payload: Value,
    },
    WidgetError {
        id: String,
        message: String,
    },
    Complete {
        #[serde(rename = "totalWidgets")]
        total_widgets: usize,
        #[serde(rename = "durationMs")]
        duration_ms: i64,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    catalog: Arc<WidgetCatalog>,
    data_service: WidgetDataService,
}

impl StreamingDashboardService {
    pub fn new(catalog: Arc<WidgetCatalog>, data_service: WidgetDataService) -> Self {
        Self {
            catalog,
            data_service,
        }
    }

    /// Send the skeleton right away, then one message per widget as its data
    /// arrives, then a completion event once every fetch has finished.
    pub async fn stream_dashboard(&self, dashboard: Dashboard) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let start_time = Instant::now();

        let skeleton = self.build_skeleton(&dashboard);
        let total_widgets = skeleton.widgets.len();
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        let mut tasks = JoinSet::new();
        for widget in dashboard.layout {
            let tx = tx.clone();
            let data_service = self.data_service.clone();

            tasks.spawn(async move {
                let msg = match data_service.fetch(&widget).await {
                    Ok(payload) => StreamMessage::WidgetData {
                        id: widget.id,
                        payload,
                    },
                    Err(e) => {
                        tracing::warn!(widget_id = %widget.id, error = %e, "Widget data fetch failed");
                        StreamMessage::WidgetError {
                            id: widget.id,
                            message: e.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg).await;
            });
        }

        tokio::spawn(async move {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Widget data task failed");
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            tracing::debug!(total_widgets, duration_ms, "Dashboard stream complete");
            let _ = tx
                .send(StreamMessage::Complete {
                    total_widgets,
                    duration_ms,
                })
                .await;
        });

        rx
    }

    fn build_skeleton(&self, dashboard: &Dashboard) -> DashboardSkeleton {
        let widgets = dashboard
            .layout
            .iter()
            .map(|w| WidgetSkeleton {
                id: w.id.clone(),
                widget_type: w.kind.tag().to_string(),
                title: self.catalog.display_title(w),
                x: w.x,
                y: w.y,
                w: w.w,
                h: w.h,
            })
            .collect();

        DashboardSkeleton {
            dashboard_id: dashboard.id.clone(),
            name: dashboard.name.clone(),
            widgets,
        }
    }
}
