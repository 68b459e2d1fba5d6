use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::MethodError;

/// Content type written on successful method responses
pub const JSON_CONTENT_TYPE: &str = "text/json; charset=utf-8";

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Encode a method result as a JSON document followed by a newline
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MethodError> {
    let mut body = serde_json::to_vec(value).map_err(MethodError::unexpected)?;
    body.push(b'\n');
    Ok(body)
}

/// 200 response carrying an already encoded JSON body
pub fn json_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        Body::from(body),
    )
        .into_response()
}

/// Plain-text failure response, one message line
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE)),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        format!("{message}\n"),
    )
        .into_response()
}

/// Empty 200 answering a CORS preflight
pub fn preflight_response(allow_methods: HeaderValue) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            ),
            (header::ACCESS_CONTROL_ALLOW_METHODS, allow_methods),
        ],
    )
        .into_response()
}
