pub mod filter;
pub mod http;

pub use http::HttpException;

use thiserror::Error;

/// Any failure raised while serving a single request.
///
/// Classified exceptions carry the status and payload the caller should see;
/// everything else is an internal defect that the error pipeline logs and
/// masks behind a generic envelope.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Exception(#[from] HttpException),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
