//! # Controllers
//!
//! The controller trait and the request/response types that flow through
//! `dispatch`. Controllers declare their routes as data and receive plain
//! values; everything axum-specific stays in the bootstrap glue.

use crate::bootstrap::AppContext;
use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use sponge_core::{RouteSpec, SpongeError};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// CONTROLLER TRAIT
// =============================================================================

/// A user-defined request handler, mounted onto a URL prefix by settings.
///
/// `routes` is the declarative table: patterns relative to the mount point,
/// each naming the action it dispatches to. Controllers that return `None`
/// are mounted plain, with the first path segment picking the action
/// (`index` by default).
pub trait Controller: Send + Sync {
    /// The routes this controller declares, if any.
    fn routes(&self) -> Option<Vec<RouteSpec>> {
        None
    }

    /// Handle one request for the named action.
    fn dispatch(
        &self,
        action: &str,
        request: &SpongeRequest,
    ) -> Result<SpongeResponse, SpongeError>;
}

// =============================================================================
// REQUEST
// =============================================================================

/// Everything a controller gets to see about one request.
#[derive(Debug, Clone)]
pub struct SpongeRequest {
    /// The application context (settings, view engine, directories).
    pub app: Arc<AppContext>,
    /// HTTP method.
    pub method: Method,
    /// Request path as received.
    pub path: String,
    /// Scheme and authority for building absolute URLs.
    pub base_url: String,
    /// Path parameters captured by the route pattern.
    pub params: BTreeMap<String, String>,
    /// Query string parameters.
    pub query: BTreeMap<String, String>,
    /// Request body.
    pub body: Bytes,
}

impl SpongeRequest {
    /// A path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// A query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Join a site-relative URL onto this request's base.
    #[must_use]
    pub fn make_url(&self, url: &str) -> String {
        crate::view::make_url(&self.base_url, url)
    }

    /// Render a template through the application's view engine.
    ///
    /// The context must be a JSON object; the request's base URL is
    /// injected under the reserved `base_url` key.
    pub fn render(
        &self,
        filename: &str,
        context: serde_json::Value,
    ) -> Result<SpongeResponse, SpongeError> {
        let views = self.app.views.as_ref().ok_or(SpongeError::TemplateDirUnset)?;
        let html = views.render_html(filename, context, &self.base_url)?;
        Ok(SpongeResponse::html(html))
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A controller's answer: status, content type and body.
#[derive(Debug, Clone)]
pub struct SpongeResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Content-Type header value.
    pub content_type: String,
    /// Response body.
    pub body: Bytes,
}

impl SpongeResponse {
    /// A 200 HTML response.
    #[must_use]
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html; charset=utf-8".to_string(),
            body: Bytes::from(body.into()),
        }
    }

    /// A 200 plain-text response.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: Bytes::from(body.into()),
        }
    }

    /// A 200 JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, SpongeError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| SpongeError::Internal(format!("could not serialize response: {e}")))?;
        Ok(Self {
            status: StatusCode::OK,
            content_type: "application/json".to_string(),
            body: Bytes::from(body),
        })
    }

    /// A 200 JPEG response.
    #[must_use]
    pub fn jpeg(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "image/jpeg".to_string(),
            body: Bytes::from(body),
        }
    }

    /// A 404 plain-text response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::text(message).with_status(StatusCode::NOT_FOUND)
    }

    /// The same response with another status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for SpongeResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map a dispatch error to the response the client sees.
///
/// Image loads that fail keep the original handler's behavior: a 404
/// carrying the loader's message. Everything else is a 500.
#[must_use]
pub fn error_to_response(error: &SpongeError) -> SpongeResponse {
    match error {
        SpongeError::Image(message) => SpongeResponse::not_found(message.clone()),
        other => {
            SpongeResponse::text(other.to_string()).with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_plain_text_404() {
        let response = SpongeResponse::not_found("not found");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.content_type, "text/plain; charset=utf-8");
        assert_eq!(response.body.as_ref(), b"not found");
    }

    #[test]
    fn json_sets_the_content_type() {
        let response =
            SpongeResponse::json(&serde_json::json!({ "success": true })).expect("serializes");
        assert_eq!(response.content_type, "application/json");
    }

    #[test]
    fn image_errors_map_to_404() {
        let error = SpongeError::Image("No such file or directory".to_string());
        let response = error_to_response(&error);
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_errors_map_to_500() {
        let error = SpongeError::TemplateDirUnset;
        let response = error_to_response(&error);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_say_so_in_the_body() {
        let error = SpongeError::Internal("could not serialize response: boom".to_string());
        let response = error_to_response(&error);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.starts_with(b"internal error:"));
    }
}
