use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::auth::Credential;

/// Success envelope: `{"success": true, "message"?: ..., <payload keys>}`
#[derive(Debug)]
pub struct ApiResponse {
    status_code: StatusCode,
    message: Option<String>,
    fields: Map<String, Value>,
    headers: HeaderMap,
    serialization_error: Option<String>,
}

impl ApiResponse {
    /// Create a successful API response with default 200 status
    pub fn success() -> Self {
        Self {
            status_code: StatusCode::OK,
            message: None,
            fields: Map::new(),
            headers: HeaderMap::new(),
            serialization_error: None,
        }
    }

    /// Create a 201 Created response
    pub fn created() -> Self {
        Self::success().with_status(StatusCode::CREATED)
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::success().with_message(message)
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add a top-level payload key
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.fields.insert(key.to_string(), value);
            }
            Err(e) => self.serialization_error = Some(e.to_string()),
        }
        self
    }

    /// Hand the client its credential: a cookie header or token keys in the body
    pub fn with_credential(mut self, credential: Credential) -> Self {
        match credential {
            Credential::Cookie(cookie) => match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    self.headers.append(header::SET_COOKIE, value);
                }
                Err(e) => self.serialization_error = Some(e.to_string()),
            },
            Credential::Token { token, expires_in } => {
                self = self.with("token", token).with("expires_in", expires_in);
            }
            Credential::None => {}
        }
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        if let Some(e) = self.serialization_error {
            tracing::error!("Failed to serialize response data: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to serialize response data",
                    "code": "INTERNAL_SERVER_ERROR"
                })),
            )
                .into_response();
        }

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        if let Some(message) = self.message {
            envelope.insert("message".to_string(), Value::String(message));
        }
        envelope.extend(self.fields);

        (self.status_code, self.headers, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult = Result<ApiResponse, crate::error::ApiError>;
