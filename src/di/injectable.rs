use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be constructed out of the DI container.
///
/// Implementations resolve their constructor dependencies from the container,
/// which recursively constructs (and caches) whatever those dependencies
/// need themselves.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use switchboard::{Container, Injectable};
///
/// struct UserRepository;
///
/// impl Injectable for UserRepository {
///     fn inject(_container: &Container) -> switchboard::Result<Self> {
///         Ok(Self)
///     }
/// }
///
/// struct UserService {
///     repository: Arc<UserRepository>,
/// }
///
/// impl Injectable for UserService {
///     fn inject(container: &Container) -> switchboard::Result<Self> {
///         Ok(Self {
///             repository: container.resolve()?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container.
    ///
    /// # Errors
    /// Returns an error if any required dependency is not bound.
    fn inject(container: &Container) -> Result<Self>;
}
