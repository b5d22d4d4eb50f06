use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    /// Set when the request was understood but refused; the envelope then
    /// reports `success: false` while still carrying `data`
    pub rejection: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
            rejection: None,
        }
    }

    /// A refused request that still returns a body, e.g. a blocked delete
    pub fn rejected(data: T, status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data,
            status_code: Some(status_code),
            rejection: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match self.rejection {
            Some(message) => json!({
                "success": false,
                "error": message,
                "data": data_value
            }),
            None => json!({
                "success": true,
                "data": data_value
            }),
        };

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_is_wrapped_in_envelope() {
        let response = ApiResponse::success(json!({ "shows": 7 })).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "success": true, "data": { "shows": 7 } }));
    }

    #[tokio::test]
    async fn rejected_keeps_data_and_reports_failure() {
        let response =
            ApiResponse::rejected(json!({ "blocked": true }), StatusCode::CONFLICT, "still referenced").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "still referenced");
        assert_eq!(body["data"]["blocked"], true);
    }
}
