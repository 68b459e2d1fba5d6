use axum::http::Method;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-request execution context handed to every collection method
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    /// Url of the collection that matched the request
    pub collection: String,
    pub method: Method,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(collection: impl Into<String>, method: Method) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            collection: collection.into(),
            method,
            received_at: Utc::now(),
        }
    }
}
