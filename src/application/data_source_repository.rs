// Repository trait for the remote data-source API
use async_trait::async_trait;
use serde_json::Value;

/// Query parameters understood by the data-source API. Payloads coming back
/// are opaque and handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQuery {
    TimeSeries {
        source: String,
        range: String,
        granularity: String,
    },
    Categorical {
        source: String,
        limit: Option<u64>,
    },
    Table {
        source: String,
        page: u64,
        size: u64,
        filters: Vec<(String, String)>,
    },
    Kpi {
        metric: String,
    },
    MultiKpi {
        metrics: Vec<String>,
    },
}

impl DataQuery {
    /// Endpoint path and query-string pairs for this query
    pub fn to_request(&self) -> (&'static str, Vec<(String, String)>) {
        match self {
            DataQuery::TimeSeries {
                source,
                range,
                granularity,
            } => (
                "/timeseries",
                vec![
                    ("source".to_string(), source.clone()),
                    ("range".to_string(), range.clone()),
                    ("granularity".to_string(), granularity.clone()),
                ],
            ),
            DataQuery::Categorical { source, limit } => {
                let mut params = vec![("source".to_string(), source.clone())];
                if let Some(limit) = limit {
                    params.push(("limit".to_string(), limit.to_string()));
                }
                ("/categorical", params)
            }
            DataQuery::Table {
                source,
                page,
                size,
                filters,
            } => {
                let mut params = vec![
                    ("source".to_string(), source.clone()),
                    ("page".to_string(), page.to_string()),
                    ("size".to_string(), size.to_string()),
                ];
                params.extend(filters.iter().cloned());
                ("/table", params)
            }
            DataQuery::Kpi { metric } => ("/kpi", vec![("metric".to_string(), metric.clone())]),
            DataQuery::MultiKpi { metrics } => (
                "/kpi/multi",
                vec![("metrics".to_string(), metrics.join(","))],
            ),
        }
    }
}

#[async_trait]
pub trait DataSourceRepository: Send + Sync {
    /// List the data sources the API offers
    async fn list_data_sources(&self) -> anyhow::Result<Value>;

    /// Run one widget data query
    async fn query(&self, query: &DataQuery) -> anyhow::Result<Value>;
}
