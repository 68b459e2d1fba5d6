//! Collections served by the bundled binary.
//!
//! `/api/status` reports the service version. `/api/echo/` echoes JSON
//! bodies back on POST and greets the trailing path segment on GET.

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::{Collection, MethodResult, RequestContext};
use crate::error::MethodError;
use crate::identity::Identity;

const MAX_ECHO_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
pub struct Status {
    pub name: &'static str,
    pub version: &'static str,
    pub request_id: String,
    pub signed_in: bool,
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub hello: String,
}

pub fn collections(allowed_origin: &str) -> Vec<Collection> {
    vec![
        Collection::new("/api/status", allowed_origin).method(Method::GET, status),
        Collection::new("/api/echo/", allowed_origin)
            .method(Method::GET, greet)
            .method(Method::POST, echo),
    ]
}

async fn status(ctx: RequestContext, _req: Request, identity: Option<Identity>) -> MethodResult<Status> {
    Ok(Status {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        request_id: ctx.request_id.to_string(),
        signed_in: identity.is_some(),
    })
}

async fn greet(ctx: RequestContext, req: Request, _identity: Option<Identity>) -> MethodResult<Greeting> {
    let name = req
        .uri()
        .path()
        .strip_prefix(ctx.collection.as_str())
        .unwrap_or_default();

    if name.is_empty() {
        return Err(MethodError::bad_request("name missing from path"));
    }
    if name.contains('/') {
        return Err(MethodError::not_found(format!("no greeting for {name}")));
    }

    Ok(Greeting {
        hello: name.to_string(),
    })
}

async fn echo(_ctx: RequestContext, req: Request, _identity: Option<Identity>) -> MethodResult<Value> {
    let body = to_bytes(req.into_body(), MAX_ECHO_BYTES)
        .await
        .map_err(|e| MethodError::bad_request(format!("unreadable body: {e}")))?;

    serde_json::from_slice(&body).map_err(|e| MethodError::bad_request(format!("invalid JSON: {e}")))
}
