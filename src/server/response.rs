//! server::response
//!
//! Response rendering: the `{success, data | message}` envelope in JSON or
//! YAML, raw file bytes, and error-to-status mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::service::{ErrorKind, ServiceError};

/// Structured output format, selected with `?f=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Parse the `f` query value; absent means JSON.
    pub fn from_query(value: Option<&str>) -> Result<Self, ServiceError> {
        match value {
            None | Some("") | Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some(other) => Err(ServiceError::validation(format!(
                "unknown format '{other}', must be one of: json, yaml"
            ))),
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Yaml => "application/yaml",
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// A successful operation's named result plus its details, e.g.
/// `{"result": "saved", "commit": {...}}`.
#[derive(Debug, Serialize)]
pub struct Outcome<T: Serialize> {
    pub result: &'static str,
    #[serde(flatten)]
    pub detail: T,
}

fn render<T: Serialize>(format: Format, status: StatusCode, envelope: &Envelope<'_, T>) -> Response {
    let body = match format {
        Format::Json => serde_json::to_vec(envelope).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::to_string(envelope)
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    };

    match body {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(format.content_type()))],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to serialize response").into_response()
        }
    }
}

/// Render `data` as a successful envelope.
pub fn success<T: Serialize>(format: Format, data: &T) -> Response {
    render(
        format,
        StatusCode::OK,
        &Envelope {
            success: true,
            data: Some(data),
            message: None,
        },
    )
}

/// Render raw file bytes with a content type guessed from the path.
pub fn raw(path: &str, bytes: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path)
        .first_raw()
        .filter(|m| !m.starts_with("text/"))
        .unwrap_or("text/plain; charset=utf-8");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(mime))],
        bytes,
    )
        .into_response()
}

pub fn status_code(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::LockTimeout => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Io | ErrorKind::VersionControl => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A failed request, rendered in the requested format.
#[derive(Debug)]
pub struct ApiError {
    pub format: Format,
    pub status: StatusCode,
    pub error: ServiceError,
}

impl ApiError {
    pub fn new(format: Format, error: impl Into<ServiceError>) -> Self {
        let error = error.into();
        Self {
            format,
            status: status_code(error.kind()),
            error,
        }
    }

    /// A request refused while extracting it, keeping the extractor's status
    /// (e.g. 413 for an oversized body).
    pub fn rejected(format: Format, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            format,
            status,
            error: ServiceError::validation(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        if status.is_server_error() {
            tracing::error!(%status, kind = ?self.error.kind(), error = %self.error, "request failed");
        } else {
            tracing::warn!(%status, kind = ?self.error.kind(), error = %self.error, "request rejected");
        }

        render::<()>(
            self.format,
            status,
            &Envelope {
                success: false,
                data: None,
                message: Some(self.error.message()),
            },
        )
    }
}
