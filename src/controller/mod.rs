mod handler;

pub use handler::{BoxedHandler, HandlerFuture, handler};

use crate::di::{Container, Injectable};
use crate::error::{Result, SwitchboardError};
use crate::metadata::{ControllerKey, MetadataStore};
use crate::middleware::Middleware;
use crate::route::RouteDescriptor;
use std::collections::HashSet;
use std::sync::Arc;

/// A class of HTTP route handlers grouped under one base path.
///
/// Controllers declare their routing metadata statically and expose their
/// handlers by name; the dispatcher resolves the singleton instance from the
/// container and binds each mounted route to the named handler.
pub trait Controller: Send + Sync + 'static {
    /// Path prefix shared by every route on this controller.
    fn base_path() -> &'static str
    where
        Self: Sized,
    {
        "/"
    }

    /// The route table, in the order routes should be matched.
    fn routes() -> Vec<RouteDescriptor>
    where
        Self: Sized;

    /// Interceptors applied to every route on this controller, in order.
    fn middlewares() -> Vec<Arc<dyn Middleware>>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Look up a handler by the name carried in a route descriptor.
    ///
    /// Returning `None` for a name that appears in [`Controller::routes`] is
    /// fatal at mount time.
    fn handler(self: Arc<Self>, name: &str) -> Option<BoxedHandler>;
}

/// Frozen routing metadata for one controller.
#[derive(Clone)]
pub struct ControllerMetadata {
    pub base_path: String,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub routes: Vec<RouteDescriptor>,
}

/// Normalize a base path: trailing slashes are stripped unless the path is
/// exactly root, and the empty string becomes root. Idempotent.
pub fn normalize_base_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Register a controller: record its declared routes, freeze its metadata,
/// and bind it in the container as an injectable singleton.
///
/// Registration is idempotent. A controller whose metadata is already frozen
/// is left untouched and its existing binding is reused, so registering a
/// class twice never double-binds or duplicates route records.
///
/// # Errors
/// Fails when the route table declares the same `(method, path)` pair twice.
pub fn register_controller<C>(store: &MetadataStore, container: &Container) -> Result<()>
where
    C: Controller + Injectable,
{
    let key = ControllerKey::of::<C>();
    if store.has_controller(&key) {
        tracing::debug!(controller = key.name(), "already registered, reusing binding");
        return Ok(());
    }

    let base_path = normalize_base_path(C::base_path());
    for descriptor in C::routes() {
        store.record_route(key, descriptor);
    }

    let routes = store.routes(&key);
    let mut seen = HashSet::new();
    for descriptor in &routes {
        if !seen.insert((descriptor.method, descriptor.path.clone())) {
            return Err(SwitchboardError::DuplicateRoute {
                controller: key.name().to_string(),
                method: descriptor.method,
                path: descriptor.path.clone(),
            });
        }
        tracing::debug!(
            controller = key.name(),
            method = %descriptor.method,
            path = %descriptor.path,
            handler = %descriptor.handler_name,
            "registered route"
        );
    }

    store.record_controller(
        key,
        ControllerMetadata {
            base_path,
            middlewares: C::middlewares(),
            routes,
        },
    );

    if !container.is_bound::<C>() {
        container.bind::<C>().to_self().in_singleton_scope()?;
    }
    tracing::debug!(controller = key.name(), base_path = %C::base_path(), "registered controller");
    Ok(())
}
