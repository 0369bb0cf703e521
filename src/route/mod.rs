use crate::context::{ContextTransformer, RawRequest, RequestContext};
use crate::exception::HttpException;
use axum::http::{Method, StatusCode};
use std::fmt;
use std::sync::Arc;
use strum_macros::Display;

/// HTTP verbs a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub(crate) fn matches(self, method: &Method) -> bool {
        match self {
            Self::Get => method == Method::GET,
            Self::Post => method == Method::POST,
            Self::Put => method == Method::PUT,
            Self::Delete => method == Method::DELETE,
            Self::Patch => method == Method::PATCH,
        }
    }
}

/// Per-route configuration with named fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    /// HTTP status used for the success envelope instead of `200 OK`.
    pub success_status: Option<StatusCode>,
    /// Short description emitted in mount-time logs.
    pub summary: Option<&'static str>,
}

/// Metadata for one handler method: verb, path, handler name, and options.
///
/// Built by the verb functions ([`get`], [`post`], ...) and immutable
/// afterwards. Unique within a controller by `(method, path)`.
#[derive(Clone)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub handler_name: String,
    pub transformer: Option<Arc<ContextTransformer>>,
    pub options: RouteOptions,
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handler_name", &self.handler_name)
            .field("has_transformer", &self.transformer.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder returned by the verb functions.
///
/// Finalize with [`RouteBuilder::handler`], which names the controller method
/// the dispatcher will invoke:
///
/// ```
/// use switchboard::route::get;
///
/// let descriptor = get("/{id}").handler("get_one");
/// assert_eq!(descriptor.path, "/{id}");
/// ```
pub struct RouteBuilder {
    method: HttpMethod,
    path: String,
    transformer: Option<Arc<ContextTransformer>>,
    options: RouteOptions,
}

impl RouteBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            transformer: None,
            options: RouteOptions::default(),
        }
    }

    /// Replace the default context transformer for this route.
    pub fn transformer<F>(mut self, transform: F) -> Self
    where
        F: Fn(&RawRequest) -> Result<RequestContext, HttpException> + Send + Sync + 'static,
    {
        self.transformer = Some(Arc::new(transform));
        self
    }

    /// Respond with `status` instead of `200 OK` on success.
    pub fn success_status(mut self, status: StatusCode) -> Self {
        self.options.success_status = Some(status);
        self
    }

    pub fn summary(mut self, summary: &'static str) -> Self {
        self.options.summary = Some(summary);
        self
    }

    /// Finalize the descriptor, naming the handler it dispatches to.
    pub fn handler(self, name: impl Into<String>) -> RouteDescriptor {
        RouteDescriptor {
            method: self.method,
            path: self.path,
            handler_name: name.into(),
            transformer: self.transformer,
            options: self.options,
        }
    }
}

pub fn get(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(HttpMethod::Get, path)
}

pub fn post(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(HttpMethod::Post, path)
}

pub fn put(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(HttpMethod::Put, path)
}

pub fn delete(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(HttpMethod::Delete, path)
}

pub fn patch(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(HttpMethod::Patch, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_functions_set_method_path_and_handler() {
        let descriptor = post("/users").handler("create");
        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "/users");
        assert_eq!(descriptor.handler_name, "create");
        assert!(descriptor.transformer.is_none());
        assert!(descriptor.options.success_status.is_none());
    }

    #[test]
    fn success_status_is_carried_in_options() {
        let descriptor = post("/users")
            .success_status(StatusCode::CREATED)
            .handler("create");
        assert_eq!(descriptor.options.success_status, Some(StatusCode::CREATED));
    }

    #[test]
    fn every_verb_has_a_factory() {
        assert_eq!(get("/x").handler("h").method, HttpMethod::Get);
        assert_eq!(post("/x").handler("h").method, HttpMethod::Post);
        assert_eq!(put("/x").handler("h").method, HttpMethod::Put);
        assert_eq!(delete("/x").handler("h").method, HttpMethod::Delete);
        assert_eq!(patch("/x").handler("h").method, HttpMethod::Patch);
    }

    #[test]
    fn method_display_is_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn method_matching_against_http_methods() {
        assert!(HttpMethod::Get.matches(&Method::GET));
        assert!(!HttpMethod::Get.matches(&Method::POST));
        assert!(HttpMethod::Delete.matches(&Method::DELETE));
    }
}
