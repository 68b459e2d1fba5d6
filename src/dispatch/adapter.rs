//! Request adapter: runs one request against its collection.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::context::RequestContext;
use super::response::{error_response, json_response, preflight_response};
use super::table::{BoundCollection, DispatchTable, Lookup};
use crate::error::MethodError;

const METHOD_NOT_ALLOWED: &str = "Method not allowed.";
const PAGE_NOT_FOUND: &str = "404 page not found";

/// Router fallback: resolve the collection for the path and serve it
pub(crate) async fn dispatch(State(table): State<Arc<DispatchTable>>, req: Request) -> Response {
    let collection = match table.lookup(req.uri().path()) {
        Lookup::Found(collection) => Arc::clone(collection),
        Lookup::Redirect(target) => {
            let target = match req.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response();
        }
        Lookup::NotFound => return error_response(StatusCode::NOT_FOUND, PAGE_NOT_FOUND),
    };

    serve(&collection, req).await
}

/// Serve a request with a bound collection.
///
/// Every response carries the collection's `Access-Control-Allow-Origin`.
pub async fn serve(collection: &BoundCollection, req: Request) -> Response {
    let mut response = respond(collection, req).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        collection.allowed_origin.clone(),
    );
    response
}

async fn respond(collection: &BoundCollection, req: Request) -> Response {
    if req.method() == Method::OPTIONS {
        return preflight_response(collection.allow_methods.clone());
    }

    let Some(method) = collection.methods.get(req.method()).cloned() else {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED);
    };

    let ctx = RequestContext::new(&collection.url, req.method().clone());
    let request_id = ctx.request_id;

    // identity lookup is not wired up; methods always see None
    match method.call_json(ctx, req, None).await {
        Ok(body) => json_response(body),
        Err(err) => failure_response(request_id, err),
    }
}

fn failure_response(request_id: Uuid, err: MethodError) -> Response {
    let status = err.status_code();
    match err {
        MethodError::Classified { status: code, message } if code == status.as_u16() => {
            tracing::info!(%request_id, "Api failure: {} {}", code, message);
            error_response(status, &message)
        }
        MethodError::Unexpected(err) => {
            let text = format!("{err:#}");
            tracing::error!(%request_id, "Unexpected error: {}", text);
            error_response(status, &text)
        }
        // classified with a status outside the valid range
        err => {
            tracing::error!(%request_id, "Unexpected error: invalid status in {}", err);
            error_response(status, &err.to_string())
        }
    }
}
