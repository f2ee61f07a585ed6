// Mapping of engine errors to HTTP responses
use crate::domain::error::DashboardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub DashboardError);

impl From<DashboardError> for ApiError {
    fn from(error: DashboardError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DashboardError::UnknownWidgetType(_) | DashboardError::DuplicateId(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DashboardError::NotFound(_) | DashboardError::DashboardNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DashboardError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            DashboardError::NoDashboard => StatusCode::CONFLICT,
            DashboardError::RemoteFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match &self.0 {
            DashboardError::UnknownWidgetType(_) => "UnknownWidgetType",
            DashboardError::DuplicateId(_) => "DuplicateId",
            DashboardError::NotFound(_) => "NotFound",
            DashboardError::DashboardNotFound(_) => "DashboardNotFound",
            DashboardError::PermissionDenied(_) => "PermissionDenied",
            DashboardError::NoDashboard => "NoDashboard",
            DashboardError::RemoteFailure(_) => "RemoteFailure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let body = json!({ "error": self.code(), "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(DashboardError::PermissionDenied("x".to_string())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError(DashboardError::UnknownWidgetType("x".to_string())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError(DashboardError::remote(anyhow::anyhow!("down"))).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(ApiError(DashboardError::NoDashboard).status(), StatusCode::CONFLICT);
    }
}
