//! Bind collections of HTTP methods under url prefixes.
//!
//! Each [`dispatch::Collection`] maps verbs to async methods. Bound into a
//! [`dispatch::DispatchTable`], every request gets the collection's CORS
//! origin, preflights are answered from the registered verbs, classified
//! method failures keep their status and successful results are written as
//! JSON.

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod observability;
pub mod server;

pub use dispatch::{bind, Collection, DispatchTable, MethodHandler, MethodResult, RequestContext};
pub use error::{BindError, MethodError};
pub use identity::Identity;
