// Widget data service - Maps a widget's type and config to a data-source query
use crate::application::data_source_repository::{DataQuery, DataSourceRepository};
use crate::domain::widget::{WidgetConfig, WidgetInstance, WidgetKind};
use serde_json::{json, Value};
use std::sync::Arc;

/// How the data of one widget is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetDataPlan {
    Remote(DataQuery),
    /// Rendered from the widget's own config, nothing to fetch.
    Local(Value),
}

pub fn plan_for(widget: &WidgetInstance) -> WidgetDataPlan {
    let config = &widget.config;

    match &widget.kind {
        WidgetKind::TimeSeries => WidgetDataPlan::Remote(DataQuery::TimeSeries {
            source: str_or(config, "source", "sales"),
            range: str_or(config, "range", "30d"),
            granularity: str_or(config, "granularity", "day"),
        }),
        WidgetKind::Bar => WidgetDataPlan::Remote(DataQuery::Categorical {
            source: str_or(config, "source", "topProducts"),
            limit: Some(u64_or(config, "limit", 5)),
        }),
        WidgetKind::Pie => WidgetDataPlan::Remote(DataQuery::Categorical {
            source: str_or(config, "source", "mixByStatus"),
            limit: config.get("limit").and_then(Value::as_u64),
        }),
        WidgetKind::OrdersTable => WidgetDataPlan::Remote(table_query(config, "orders", "status")),
        WidgetKind::UsersTable => WidgetDataPlan::Remote(table_query(config, "users", "role")),
        WidgetKind::KpiSimple => WidgetDataPlan::Remote(DataQuery::Kpi {
            metric: str_or(config, "metric", "todaySales"),
        }),
        WidgetKind::KpiMulti => {
            let metrics = config
                .get("metrics")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    ["todaySales", "ordersToday", "convRate"]
                        .iter()
                        .map(|m| m.to_string())
                        .collect()
                });
            WidgetDataPlan::Remote(DataQuery::MultiKpi { metrics })
        }
        WidgetKind::Markdown => WidgetDataPlan::Local(json!({
            "title": str_or(config, "title", "Notes"),
            "content": str_or(config, "content", ""),
        })),
        WidgetKind::Unknown(tag) => WidgetDataPlan::Local(json!({ "unknownWidget": tag })),
    }
}

fn table_query(config: &WidgetConfig, source: &str, filter_key: &str) -> DataQuery {
    let mut filters = Vec::new();
    if let Some(value) = config.get(filter_key).and_then(Value::as_str) {
        if value != "all" {
            filters.push((filter_key.to_string(), value.to_string()));
        }
    }

    DataQuery::Table {
        source: source.to_string(),
        page: u64_or(config, "page", 1),
        size: u64_or(config, "pageSize", 10),
        filters,
    }
}

fn str_or(config: &WidgetConfig, key: &str, default: &str) -> String {
    config
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn u64_or(config: &WidgetConfig, key: &str, default: u64) -> u64 {
    config.get(key).and_then(Value::as_u64).unwrap_or(default)
}

#[derive(Clone)]
pub struct WidgetDataService {
    repository: Arc<dyn DataSourceRepository>,
}

impl WidgetDataService {
    pub fn new(repository: Arc<dyn DataSourceRepository>) -> Self {
        Self { repository }
    }

    pub async fn fetch(&self, widget: &WidgetInstance) -> anyhow::Result<Value> {
        match plan_for(widget) {
            WidgetDataPlan::Local(payload) => Ok(payload),
            WidgetDataPlan::Remote(query) => {
                tracing::debug!(widget_id = %widget.id, ?query, "Fetching widget data");
                self.repository.query(&query).await
            }
        }
    }

    pub async fn list_data_sources(&self) -> anyhow::Result<Value> {
        self.repository.list_data_sources().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(kind: WidgetKind, config: Value) -> WidgetInstance {
        WidgetInstance {
            id: "w".to_string(),
            x: 0,
            y: 0,
            w: 4,
            h: 4,
            kind,
            config: config.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_time_series_plan() {
        let plan = plan_for(&widget(
            WidgetKind::TimeSeries,
            json!({ "source": "sessions", "range": "7d" }),
        ));
        assert_eq!(
            plan,
            WidgetDataPlan::Remote(DataQuery::TimeSeries {
                source: "sessions".to_string(),
                range: "7d".to_string(),
                granularity: "day".to_string(),
            })
        );
    }

    #[test]
    fn test_orders_table_drops_all_filter() {
        let plan = plan_for(&widget(
            WidgetKind::OrdersTable,
            json!({ "status": "all", "pageSize": 20 }),
        ));
        assert_eq!(
            plan,
            WidgetDataPlan::Remote(DataQuery::Table {
                source: "orders".to_string(),
                page: 1,
                size: 20,
                filters: Vec::new(),
            })
        );
    }

    #[test]
    fn test_users_table_keeps_role_filter() {
        let WidgetDataPlan::Remote(DataQuery::Table { filters, source, .. }) =
            plan_for(&widget(WidgetKind::UsersTable, json!({ "role": "admin" })))
        else {
            panic!("expected table query");
        };
        assert_eq!(source, "users");
        assert_eq!(filters, vec![("role".to_string(), "admin".to_string())]);
    }

    #[test]
    fn test_multi_kpi_falls_back_to_default_metrics() {
        let plan = plan_for(&widget(WidgetKind::KpiMulti, json!({ "metrics": [] })));
        assert_eq!(
            plan,
            WidgetDataPlan::Remote(DataQuery::MultiKpi {
                metrics: vec![
                    "todaySales".to_string(),
                    "ordersToday".to_string(),
                    "convRate".to_string()
                ],
            })
        );
    }

    #[test]
    fn test_markdown_and_unknown_are_local() {
        assert_eq!(
            plan_for(&widget(WidgetKind::Markdown, json!({ "content": "# Hi" }))),
            WidgetDataPlan::Local(json!({ "title": "Notes", "content": "# Hi" }))
        );
        assert_eq!(
            plan_for(&widget(WidgetKind::Unknown("map.geo".to_string()), json!({}))),
            WidgetDataPlan::Local(json!({ "unknownWidget": "map.geo" }))
        );
    }
}
