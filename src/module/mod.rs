use crate::controller::{Controller, register_controller};
use crate::di::{Container, Injectable};
use crate::dispatch::{RouteTable, mount_controller};
use crate::error::Result;
use crate::metadata::{ControllerKey, MetadataStore};

pub(crate) struct ControllerEntry {
    pub(crate) key: ControllerKey,
    pub(crate) register: fn(&MetadataStore, &Container) -> Result<()>,
    pub(crate) mount: fn(&MetadataStore, &Container, &mut RouteTable) -> Result<()>,
}

/// An ordered group of controllers registered and mounted as one unit.
///
/// The declaration order is load-bearing: controllers are mounted in the
/// order they were added, and that order decides match precedence when route
/// templates overlap. `import` splices another module's controllers in at
/// the current position.
///
/// # Example
/// ```ignore
/// let module = ApiModule::new("api")
///     .controller::<UserController>()
///     .import(health_module());
/// ```
pub struct ApiModule {
    name: String,
    pub(crate) entries: Vec<ControllerEntry>,
}

impl ApiModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a controller to the module.
    pub fn controller<C>(mut self) -> Self
    where
        C: Controller + Injectable,
    {
        self.entries.push(ControllerEntry {
            key: ControllerKey::of::<C>(),
            register: register_controller::<C>,
            mount: mount_controller::<C>,
        });
        self
    }

    /// Splice another module's controllers in, preserving their order.
    pub fn import(mut self, other: ApiModule) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of controllers declared, across imports.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::BoxedHandler;
    use crate::route::{RouteDescriptor, get};
    use std::sync::Arc;

    struct First;
    struct Second;

    macro_rules! stub_controller {
        ($name:ident, $path:literal) => {
            impl Injectable for $name {
                fn inject(_container: &Container) -> Result<Self> {
                    Ok(Self)
                }
            }

            impl Controller for $name {
                fn base_path() -> &'static str {
                    $path
                }

                fn routes() -> Vec<RouteDescriptor> {
                    vec![get("/").handler("index")]
                }

                fn handler(self: Arc<Self>, _name: &str) -> Option<BoxedHandler> {
                    None
                }
            }
        };
    }

    stub_controller!(First, "/first");
    stub_controller!(Second, "/second");

    #[test]
    fn controllers_keep_declaration_order_across_imports() {
        let imported = ApiModule::new("second").controller::<Second>();
        let module = ApiModule::new("first")
            .controller::<First>()
            .import(imported);

        let keys: Vec<ControllerKey> = module.entries.iter().map(|e| e.key).collect();
        assert_eq!(module.len(), 2);
        assert_eq!(keys[0], ControllerKey::of::<First>());
        assert_eq!(keys[1], ControllerKey::of::<Second>());
    }
}
