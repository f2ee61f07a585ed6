// HTTP adapter for the remote data-source and dashboard APIs
use crate::application::dashboard_repository::DashboardRepository;
use crate::application::data_source_repository::{DataQuery, DataSourceRepository};
use crate::domain::dashboard::Dashboard;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpApiRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApiRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            return format!("{}{}", self.base_url, path);
        }

        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}{}?{}", self.base_url, path, query.join("&"))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/json")
    }

    /// Send a request; `Ok(None)` on 404, error on any other failure status.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request
            .send()
            .await
            .context("Failed to send request to dashboard API")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {}: {}", status, body);
        }

        let data = response
            .json::<T>()
            .await
            .context("Failed to parse API response")?;
        Ok(Some(data))
    }

    async fn get_required<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        self.execute(self.request(Method::GET, &url))
            .await?
            .with_context(|| format!("API returned 404 for {}", url))
    }
}

#[async_trait]
impl DataSourceRepository for HttpApiRepository {
    async fn list_data_sources(&self) -> Result<Value> {
        self.get_required(self.build_url("/datasources", &[])).await
    }

    async fn query(&self, query: &DataQuery) -> Result<Value> {
        let (path, params) = query.to_request();
        let url = self.build_url(path, &params);
        tracing::debug!("Executing data query: {}", url);
        self.get_required(url).await
    }
}

#[async_trait]
impl DashboardRepository for HttpApiRepository {
    async fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
        self.get_required(self.build_url("/dashboards", &[])).await
    }

    async fn get_dashboard(&self, id: &str) -> Result<Option<Dashboard>> {
        let url = self.build_url(&format!("/dashboards/{}", urlencoding::encode(id)), &[]);
        self.execute(self.request(Method::GET, &url)).await
    }

    async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<Dashboard> {
        let url = self.build_url("/dashboards", &[]);
        self.execute(self.request(Method::POST, &url).json(dashboard))
            .await?
            .context("API returned 404 when creating a dashboard")
    }

    async fn update_dashboard(&self, id: &str, dashboard: &Dashboard) -> Result<Dashboard> {
        let url = self.build_url(&format!("/dashboards/{}", urlencoding::encode(id)), &[]);
        self.execute(self.request(Method::PATCH, &url).json(dashboard))
            .await?
            .with_context(|| format!("Dashboard {} does not exist in the store", id))
    }

    async fn delete_dashboard(&self, id: &str) -> Result<bool> {
        let url = self.build_url(&format!("/dashboards/{}", urlencoding::encode(id)), &[]);
        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .context("Failed to send request to dashboard API")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("API request failed with status {}: {}", status, body)
            }
        }
    }
}
