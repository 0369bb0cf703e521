use crate::context::RawRequest;
use crate::exception::HandlerError;
use async_trait::async_trait;

/// A controller-level request interceptor.
///
/// Middlewares run before route-specific logic, in the order the controller
/// declares them, for every route on that controller. Returning an error
/// short-circuits the request into the error pipeline.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, request: &RawRequest) -> Result<(), HandlerError>;
}

/// A middleware that logs every inbound request at debug level.
#[derive(Clone, Default)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(&self, request: &RawRequest) -> Result<(), HandlerError> {
        tracing::debug!(method = %request.method, path = %request.path, "--> inbound request");
        Ok(())
    }
}
