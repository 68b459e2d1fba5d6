// Collections of HTTP methods bound under url prefixes
pub mod adapter;
pub mod collection;
pub mod context;
pub mod response;
pub mod table;

pub use adapter::serve;
pub use collection::{Collection, MethodFn, MethodHandler, MethodResult};
pub use context::RequestContext;
pub use response::JSON_CONTENT_TYPE;
pub use table::{BoundCollection, DispatchTable, Lookup};

/// Bind collections into a router ready to hand to the server
pub fn bind<I>(collections: I) -> Result<axum::Router, crate::error::BindError>
where
    I: IntoIterator<Item = Collection>,
{
    Ok(DispatchTable::bind(collections)?.into_router())
}
