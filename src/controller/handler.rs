use crate::context::RequestContext;
use crate::exception::HandlerError;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send>>;

/// A type-erased route handler bound to its controller instance.
pub type BoxedHandler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// Adapt an async controller method into a [`BoxedHandler`].
///
/// The closure receives the shared controller instance and the transformed
/// request context; whatever it returns is serialized into the success
/// envelope's `data` field.
///
/// # Example
/// ```ignore
/// fn handler(self: Arc<Self>, name: &str) -> Option<BoxedHandler> {
///     match name {
///         "get_one" => Some(handler(&self, |c, ctx| async move {
///             c.service.get(ctx.param("id").unwrap_or_default()).await
///         })),
///         _ => None,
///     }
/// }
/// ```
pub fn handler<C, F, Fut, T>(controller: &Arc<C>, call: F) -> BoxedHandler
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, HandlerError>> + Send + 'static,
    T: Serialize,
{
    let controller = Arc::clone(controller);
    Arc::new(move |context| {
        let invocation = call(Arc::clone(&controller), context);
        Box::pin(async move {
            let value = invocation.await?;
            serde_json::to_value(value).map_err(|e| HandlerError::Unexpected(e.into()))
        })
    })
}
