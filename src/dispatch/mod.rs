//! Boot-time route mounting and the runtime dispatch table.
//!
//! At boot the dispatcher walks the module's controllers in declaration
//! order, resolves each from the container, and turns the frozen metadata
//! into an ordered dispatch table. At runtime the table is scanned in mount
//! order, so the first matching route wins when templates overlap.

use crate::common::Envelope;
use crate::context::{RawRequest, default_transform};
use crate::controller::{BoxedHandler, Controller, ControllerMetadata};
use crate::di::{Container, Injectable};
use crate::error::{Result, SwitchboardError};
use crate::exception::{HandlerError, HttpException, filter};
use crate::metadata::{ControllerKey, MetadataStore};
use crate::middleware::Middleware;
use crate::module::ApiModule;
use crate::route::HttpMethod;
use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Arc;

/// Largest request body the dispatcher will collect.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route path: literal segments plus `{name}` captures.
struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    fn compile(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();
        Self { segments }
    }

    fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

struct MountedRoute {
    method: HttpMethod,
    pattern: PathPattern,
    middlewares: Vec<Arc<dyn Middleware>>,
    transformer: Option<Arc<crate::context::ContextTransformer>>,
    handler: BoxedHandler,
    success_status: StatusCode,
}

/// The ordered dispatch table built during mounting.
pub(crate) struct RouteTable {
    routes: Vec<MountedRoute>,
}

impl RouteTable {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    async fn dispatch(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();

        let matched = self.routes.iter().find_map(|route| {
            if !route.method.matches(&parts.method) {
                return None;
            }
            route.pattern.capture(&path).map(|params| (route, params))
        });
        let Some((route, params)) = matched else {
            return filter::not_found(&parts.method, &path);
        };

        let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return filter::render(HandlerError::Exception(HttpException::payload_too_large(
                    "request body exceeds limit",
                )));
            }
        };

        let raw = RawRequest {
            query: parts.uri.query().unwrap_or_default().to_string(),
            method: parts.method,
            path,
            params,
            headers: parts.headers,
            body,
        };

        for middleware in &route.middlewares {
            if let Err(error) = middleware.handle(&raw).await {
                return filter::render(error);
            }
        }

        let transformed = match &route.transformer {
            Some(transform) => transform(&raw),
            None => default_transform(&raw),
        };
        let context = match transformed {
            Ok(context) => context,
            Err(exception) => return filter::render(HandlerError::Exception(exception)),
        };

        match (route.handler)(context).await {
            Ok(value) => Envelope::success_with_status(value, route.success_status).into_response(),
            Err(error) => filter::render(error),
        }
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let suffix = path.trim_start_matches('/');
    match (base, suffix) {
        ("/", "") => "/".to_string(),
        ("/", suffix) => format!("/{suffix}"),
        (base, "") => base.to_string(),
        (base, suffix) => format!("{base}/{suffix}"),
    }
}

/// Resolve one controller and append its routes to the dispatch table.
pub(crate) fn mount_controller<C>(
    store: &MetadataStore,
    container: &Container,
    table: &mut RouteTable,
) -> Result<()>
where
    C: Controller + Injectable,
{
    let key = ControllerKey::of::<C>();
    let metadata: ControllerMetadata =
        store
            .controller(&key)
            .ok_or_else(|| SwitchboardError::MissingMetadata {
                controller: key.name().to_string(),
            })?;
    let instance: Arc<C> = container.resolve::<C>()?;

    for descriptor in &metadata.routes {
        let handler = Arc::clone(&instance)
            .handler(&descriptor.handler_name)
            .ok_or_else(|| SwitchboardError::UnknownHandler {
                controller: key.name().to_string(),
                handler: descriptor.handler_name.clone(),
            })?;
        let full_path = join_paths(&metadata.base_path, &descriptor.path);
        tracing::debug!(
            method = %descriptor.method,
            path = %full_path,
            controller = key.name(),
            handler = %descriptor.handler_name,
            summary = descriptor.options.summary.unwrap_or_default(),
            "mounted route"
        );
        table.routes.push(MountedRoute {
            method: descriptor.method,
            pattern: PathPattern::compile(&full_path),
            middlewares: metadata.middlewares.clone(),
            transformer: descriptor.transformer.clone(),
            handler,
            success_status: descriptor.options.success_status.unwrap_or(StatusCode::OK),
        });
    }
    Ok(())
}

/// Mounts modules onto a router and owns the request lifecycle from match to
/// envelope.
pub struct Dispatcher;

impl Dispatcher {
    /// Build the dispatch table for `module` and attach it to `router`.
    ///
    /// Controllers are first registered (metadata frozen, bindings created),
    /// then resolved and mounted, both in declaration order. Any error —
    /// duplicate routes, unbound tokens, handler names with no handler —
    /// aborts the whole mount so a partial router is never exposed.
    pub fn mount(
        router: Router,
        module: &ApiModule,
        container: &Container,
        store: &MetadataStore,
    ) -> Result<Router> {
        for entry in &module.entries {
            (entry.register)(store, container)?;
        }

        let mut table = RouteTable::new();
        for entry in &module.entries {
            (entry.mount)(store, container, &mut table)?;
        }
        tracing::debug!(
            module = module.name(),
            controllers = module.len(),
            routes = table.routes.len(),
            "dispatch table built"
        );

        let table = Arc::new(table);
        Ok(router.fallback(move |request: Request| {
            let table = Arc::clone(&table);
            async move { table.dispatch(request).await }
        }))
    }
}
