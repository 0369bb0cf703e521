use crate::route::HttpMethod;
use thiserror::Error;

pub type Result<T, E = SwitchboardError> = std::result::Result<T, E>;

/// Errors raised while wiring the application together.
///
/// Every variant is fatal at boot: `Dispatcher::mount` propagates the first
/// one it encounters and no partial router is ever returned. Request-time
/// failures use [`crate::exception::HandlerError`] instead and never abort
/// the process.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    #[error("no binding registered for token `{token}`")]
    UnboundToken { token: String },

    #[error("failed to downcast resolved instance for token `{token}`")]
    DowncastFailed { token: String },

    #[error("circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    #[error("token `{token}` cannot be rebound after it has been resolved")]
    RebindAfterResolution { token: String },

    #[error("duplicate route {method} {path} on controller `{controller}`")]
    DuplicateRoute {
        controller: String,
        method: HttpMethod,
        path: String,
    },

    #[error("handler `{handler}` declared on controller `{controller}` does not exist")]
    UnknownHandler { controller: String, handler: String },

    #[error("controller `{controller}` was mounted without registered metadata")]
    MissingMetadata { controller: String },
}
