//! Dispatch table: resolves a request path to the collection bound for it.
//!
//! Lookup follows the usual mux rules. Exact urls match only their own path,
//! subtree urls (trailing `/`) match every path below them, and the longest
//! matching url wins. Paths are cleaned before matching; a request for an
//! unclean path, or for a subtree root without its trailing slash, is
//! redirected to the canonical path instead.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;

use super::collection::{Collection, SharedMethod};
use crate::error::BindError;

/// A collection after validation, ready to serve requests
pub struct BoundCollection {
    pub(crate) url: String,
    pub(crate) allowed_origin: HeaderValue,
    pub(crate) allow_methods: HeaderValue,
    pub(crate) methods: HashMap<Method, SharedMethod>,
}

impl BoundCollection {
    fn bind(collection: Collection) -> Result<Self, BindError> {
        let Collection {
            url,
            allowed_origin,
            methods,
        } = collection;

        if !is_valid_url(&url) {
            return Err(BindError::InvalidUrl(url));
        }

        let allowed_origin = HeaderValue::from_str(&allowed_origin).map_err(|_| BindError::InvalidOrigin {
            url: url.clone(),
            origin: allowed_origin.clone(),
        })?;

        let mut verbs: Vec<&str> = methods.keys().map(Method::as_str).collect();
        verbs.sort_unstable();
        let allow_methods =
            HeaderValue::from_str(&verbs.join(",")).map_err(|_| BindError::InvalidMethods(url.clone()))?;

        Ok(Self {
            url,
            allowed_origin,
            allow_methods,
            methods,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn is_subtree(&self) -> bool {
        self.url.ends_with('/')
    }

    fn matches(&self, path: &str) -> bool {
        if self.is_subtree() {
            path.starts_with(&self.url)
        } else {
            path == self.url
        }
    }
}

fn is_valid_url(url: &str) -> bool {
    url.starts_with('/') && !url.contains(['?', '#'])
}

/// Canonical form of a request path: repeated slashes collapsed, `.` and
/// `..` segments resolved, a trailing slash kept.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if path.ends_with('/') && cleaned != "/" {
        cleaned.push('/');
    }
    cleaned
}

/// Outcome of resolving a request path
pub enum Lookup<'a> {
    Found(&'a Arc<BoundCollection>),
    /// The path is unclean, or names a subtree root without its trailing slash
    Redirect(String),
    NotFound,
}

/// Static mapping from url to collection, immutable once bound
pub struct DispatchTable {
    // longest url first so the first match is the most specific one
    collections: Vec<Arc<BoundCollection>>,
}

impl DispatchTable {
    /// Validate and bind a set of collections.
    pub fn bind<I>(collections: I) -> Result<Self, BindError>
    where
        I: IntoIterator<Item = Collection>,
    {
        let mut seen = HashSet::new();
        let mut bound = Vec::new();

        for collection in collections {
            let collection = BoundCollection::bind(collection)?;
            if !seen.insert(collection.url.clone()) {
                return Err(BindError::DuplicateUrl(collection.url));
            }
            tracing::debug!(
                url = %collection.url,
                methods = ?collection.allow_methods,
                "Bound collection"
            );
            bound.push(Arc::new(collection));
        }

        bound.sort_by(|a, b| b.url.len().cmp(&a.url.len()));
        Ok(Self { collections: bound })
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.url())
    }

    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        let cleaned = clean_path(path);

        if let Some(target) = self.slash_redirect(&cleaned) {
            return Lookup::Redirect(target);
        }
        if cleaned != path {
            return Lookup::Redirect(cleaned);
        }

        match self.collections.iter().find(|c| c.matches(path)) {
            Some(collection) => Lookup::Found(collection),
            None => Lookup::NotFound,
        }
    }

    // a subtree root asked for without its slash, unless something is bound at the path itself
    fn slash_redirect(&self, path: &str) -> Option<String> {
        if path.ends_with('/') || self.collections.iter().any(|c| c.url == path) {
            return None;
        }
        let with_slash = format!("{path}/");
        self.collections
            .iter()
            .any(|c| c.url == with_slash)
            .then_some(with_slash)
    }

    /// Build the axum router that serves every bound collection
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(super::adapter::dispatch)
            .with_state(Arc::new(self))
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.urls()).finish()
    }
}
