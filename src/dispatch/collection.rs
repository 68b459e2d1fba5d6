use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::Method;
use futures::future::BoxFuture;
use serde::Serialize;

use super::context::RequestContext;
use super::response::encode_json;
use crate::error::MethodError;
use crate::identity::Identity;

pub type MethodResult<T> = Result<T, MethodError>;

/// Business logic bound to one verb of a collection.
///
/// Closures can be registered directly through [`Collection::method`];
/// implement this trait for handlers that carry their own state.
#[async_trait]
pub trait MethodHandler: Send + Sync + 'static {
    type Output: Serialize + Send;

    async fn call(
        &self,
        ctx: RequestContext,
        req: Request,
        identity: Option<Identity>,
    ) -> MethodResult<Self::Output>;
}

/// Adapts a plain async function into a [`MethodHandler`]
pub struct MethodFn<F>(F);

#[async_trait]
impl<F, Fut, T> MethodHandler for MethodFn<F>
where
    F: Fn(RequestContext, Request, Option<Identity>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MethodResult<T>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    type Output = T;

    async fn call(
        &self,
        ctx: RequestContext,
        req: Request,
        identity: Option<Identity>,
    ) -> MethodResult<T> {
        (self.0)(ctx, req, identity).await
    }
}

/// Type-erased handler: the output is encoded to JSON before it leaves.
pub(crate) trait BoxedMethod: Send + Sync {
    fn call_json(
        &self,
        ctx: RequestContext,
        req: Request,
        identity: Option<Identity>,
    ) -> BoxFuture<'_, MethodResult<Vec<u8>>>;
}

impl<H: MethodHandler> BoxedMethod for H {
    fn call_json(
        &self,
        ctx: RequestContext,
        req: Request,
        identity: Option<Identity>,
    ) -> BoxFuture<'_, MethodResult<Vec<u8>>> {
        Box::pin(async move {
            let output = self.call(ctx, req, identity).await?;
            encode_json(&output)
        })
    }
}

pub(crate) type SharedMethod = Arc<dyn BoxedMethod>;

/// A set of methods bound under one url.
///
/// A url ending in `/` serves its whole subtree (`/api/items/` also answers
/// `/api/items/42`); any other url serves only that exact path.
pub struct Collection {
    pub(crate) url: String,
    pub(crate) allowed_origin: String,
    pub(crate) methods: HashMap<Method, SharedMethod>,
}

impl Collection {
    pub fn new(url: impl Into<String>, allowed_origin: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            allowed_origin: allowed_origin.into(),
            methods: HashMap::new(),
        }
    }

    /// Bind an async function to `verb`. A verb registered twice keeps the
    /// last function.
    pub fn method<F, Fut, T>(self, verb: Method, f: F) -> Self
    where
        F: Fn(RequestContext, Request, Option<Identity>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MethodResult<T>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        self.handler(verb, MethodFn(f))
    }

    /// Bind a [`MethodHandler`] implementation to `verb`
    pub fn handler<H: MethodHandler>(mut self, verb: Method, handler: H) -> Self {
        if self.methods.insert(verb.clone(), Arc::new(handler)).is_some() {
            tracing::warn!(url = %self.url, method = %verb, "Replacing previously bound method");
        }
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    /// Registered verbs, sorted by name
    pub fn verbs(&self) -> Vec<Method> {
        let mut verbs: Vec<Method> = self.methods.keys().cloned().collect();
        verbs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        verbs
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("url", &self.url)
            .field("allowed_origin", &self.allowed_origin)
            .field("methods", &self.verbs())
            .finish()
    }
}
