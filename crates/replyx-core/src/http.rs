//! Axum integration: envelopes are directly usable as responses
//!
//! The body's `status_code` is also the transport status. A value axum
//! cannot represent becomes 500.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::envelope::Envelope;
use crate::renderer::RenderedError;
use crate::validation::ValidationResult;

pub const APPLICATION_JSON: &str = "application/json";

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (status_from(self.status_code), Json(self)).into_response()
    }
}

impl IntoResponse for ValidationResult {
    fn into_response(self) -> Response {
        (status_from(self.status_code), Json(self)).into_response()
    }
}

impl IntoResponse for RenderedError {
    fn into_response(self) -> Response {
        let mut response = (status_from(self.status), self.body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON),
        );
        response
    }
}
