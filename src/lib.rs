//! # Switchboard
//!
//! A metadata-driven HTTP routing layer with built-in dependency injection.
//!
//! Controllers declare a base path and an ordered route table; at boot the
//! [`Dispatcher`] registers every controller of an [`ApiModule`], resolves
//! each one from the [`Container`] as a shared singleton, and derives an
//! ordered dispatch table bound to the resolved instances. Every failure —
//! a thrown handler error or an unmatched request — is normalized into one
//! response envelope.
//!
//! ## Features
//!
//! - **Dependency Injection**: singleton-scoped container with transitive
//!   constructor resolution, trait bindings, and cycle detection
//! - **Controller-based Routing**: route tables declared per controller,
//!   mounted in declaration order (first match wins)
//! - **Context Transformation**: per-route transformers turn the raw request
//!   into the `{body, query, params}` context handlers receive
//! - **Uniform Envelopes**: success and error responses share one shape, and
//!   internal error details never leak to callers
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchboard::prelude::*;
//!
//! struct GreetingService;
//!
//! impl GreetingService {
//!     async fn greet(&self, name: &str) -> String {
//!         format!("hello, {name}")
//!     }
//! }
//!
//! impl Injectable for GreetingService {
//!     fn inject(_container: &Container) -> switchboard::Result<Self> {
//!         Ok(Self)
//!     }
//! }
//!
//! struct GreetingController {
//!     service: Arc<GreetingService>,
//! }
//!
//! impl Injectable for GreetingController {
//!     fn inject(container: &Container) -> switchboard::Result<Self> {
//!         Ok(Self {
//!             service: container.resolve()?,
//!         })
//!     }
//! }
//!
//! impl Controller for GreetingController {
//!     fn base_path() -> &'static str {
//!         "/greetings"
//!     }
//!
//!     fn routes() -> Vec<RouteDescriptor> {
//!         vec![get("/{name}").handler("greet")]
//!     }
//!
//!     fn handler(self: Arc<Self>, name: &str) -> Option<BoxedHandler> {
//!         match name {
//!             "greet" => Some(handler(&self, |c, ctx| async move {
//!                 let name = ctx.param("name").unwrap_or("world").to_string();
//!                 Ok::<_, HandlerError>(c.service.greet(&name).await)
//!             })),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let container = Container::new();
//!     container
//!         .bind::<GreetingService>()
//!         .to_self()
//!         .in_singleton_scope()?;
//!
//!     let store = MetadataStore::new();
//!     let module = ApiModule::new("app").controller::<GreetingController>();
//!     let router = Dispatcher::mount(axum::Router::new(), &module, &container, &store)?;
//!
//!     let server = ConfigService::from_env().server();
//!     let listener = tokio::net::TcpListener::bind(server.addr()).await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod context;
pub mod controller;
pub mod di;
pub mod dispatch;
pub mod error;
pub mod exception;
pub mod metadata;
pub mod middleware;
pub mod module;
pub mod route;

// Re-export core types
pub use common::{Envelope, ResponseStatus};
pub use config::{ConfigService, ServerConfig};
pub use context::{ContextTransformer, RawRequest, RequestContext, default_transform};
pub use controller::{
    BoxedHandler, Controller, ControllerMetadata, HandlerFuture, handler, normalize_base_path,
    register_controller,
};
pub use di::{Container, Injectable};
pub use dispatch::Dispatcher;
pub use error::{Result, SwitchboardError};
pub use exception::{HandlerError, HttpException};
pub use metadata::{ControllerKey, MetadataStore};
pub use middleware::{Middleware, RequestLogger};
pub use module::ApiModule;
pub use route::{HttpMethod, RouteBuilder, RouteDescriptor, RouteOptions};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{Envelope, ResponseStatus};
    pub use crate::config::{ConfigService, ServerConfig};
    pub use crate::context::{ContextTransformer, RawRequest, RequestContext, default_transform};
    pub use crate::controller::{
        BoxedHandler, Controller, ControllerMetadata, HandlerFuture, handler,
        register_controller,
    };
    pub use crate::di::{Container, Injectable};
    pub use crate::dispatch::Dispatcher;
    pub use crate::error::{Result, SwitchboardError};
    pub use crate::exception::{HandlerError, HttpException};
    pub use crate::metadata::{ControllerKey, MetadataStore};
    pub use crate::middleware::{Middleware, RequestLogger};
    pub use crate::module::ApiModule;
    pub use crate::route::{
        HttpMethod, RouteBuilder, RouteDescriptor, RouteOptions, delete, get, patch, post, put,
    };
    pub use async_trait::async_trait;
    pub use axum::http::StatusCode;
    pub use std::sync::Arc;
}
