use crate::controller::ControllerMetadata;
use crate::route::RouteDescriptor;
use dashmap::DashMap;
use std::any::TypeId;

/// Stable identity for a controller type.
///
/// Keys both halves of the [`MetadataStore`]: the accumulating route lists
/// and the frozen controller metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerKey {
    id: TypeId,
    name: &'static str,
}

impl ControllerKey {
    pub fn of<C: 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// The controller's type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// In-memory store for routing metadata.
///
/// Route descriptors accumulate per controller in declaration order until the
/// registrar freezes them into a [`ControllerMetadata`]. Metadata lives for
/// the process lifetime; there is no removal operation.
#[derive(Default)]
pub struct MetadataStore {
    routes: DashMap<ControllerKey, Vec<RouteDescriptor>>,
    controllers: DashMap<ControllerKey, ControllerMetadata>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route descriptor to the controller's list, creating the list
    /// on first use. Sibling controllers accumulate independently.
    pub fn record_route(&self, key: ControllerKey, descriptor: RouteDescriptor) {
        self.routes.entry(key).or_default().push(descriptor);
    }

    /// Store (or overwrite) the frozen metadata for a controller.
    pub fn record_controller(&self, key: ControllerKey, metadata: ControllerMetadata) {
        self.controllers.insert(key, metadata);
    }

    /// The route descriptors recorded so far for a controller, in insertion
    /// order. Empty if none were recorded.
    pub fn routes(&self, key: &ControllerKey) -> Vec<RouteDescriptor> {
        self.routes
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// The frozen metadata for a controller, if it has been registered.
    pub fn controller(&self, key: &ControllerKey) -> Option<ControllerMetadata> {
        self.controllers.get(key).map(|entry| entry.value().clone())
    }

    pub fn has_controller(&self, key: &ControllerKey) -> bool {
        self.controllers.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{get, post};

    struct Alpha;
    struct Beta;

    #[test]
    fn routes_accumulate_in_insertion_order() {
        let store = MetadataStore::new();
        let key = ControllerKey::of::<Alpha>();
        store.record_route(key, get("/first").handler("first"));
        store.record_route(key, post("/second").handler("second"));
        store.record_route(key, get("/third").handler("third"));

        let routes = store.routes(&key);
        let names: Vec<&str> = routes.iter().map(|r| r.handler_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn sibling_controllers_do_not_share_route_lists() {
        let store = MetadataStore::new();
        store.record_route(ControllerKey::of::<Alpha>(), get("/a").handler("a"));
        store.record_route(ControllerKey::of::<Beta>(), get("/b").handler("b"));

        assert_eq!(store.routes(&ControllerKey::of::<Alpha>()).len(), 1);
        assert_eq!(store.routes(&ControllerKey::of::<Beta>()).len(), 1);
    }

    #[test]
    fn unknown_controller_has_no_routes_and_no_metadata() {
        let store = MetadataStore::new();
        let key = ControllerKey::of::<Alpha>();
        assert!(store.routes(&key).is_empty());
        assert!(store.controller(&key).is_none());
    }
}
