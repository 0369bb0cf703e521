use crate::di::Injectable;
use crate::error::{Result, SwitchboardError};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

type AnyInstance = Arc<dyn Any + Send + Sync>;

/// Factory that builds a service, resolving its dependencies from the
/// container it is given.
type Provider = Arc<dyn Fn(&Container) -> Result<AnyInstance> + Send + Sync>;

/// Type alias for a function that casts an `Arc<dyn Any>` holding a concrete
/// implementation to an `Arc<dyn Any>` holding an `Arc<dyn Trait>`.
type CasterFn = Arc<dyn Fn(AnyInstance) -> AnyInstance + Send + Sync>;

#[derive(Clone)]
struct Binding {
    token: &'static str,
    provider: Provider,
}

thread_local! {
    // Tokens currently being constructed on this thread. Resolution recurses
    // synchronously, so a token reappearing in this stack is a cycle.
    static RESOLUTION_STACK: RefCell<Vec<(TypeId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

struct ResolutionFrame;

impl ResolutionFrame {
    fn enter(id: TypeId, token: &'static str) -> Result<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(pending, _)| *pending == id) {
                let mut names: Vec<&str> = stack.iter().map(|(_, name)| *name).collect();
                names.push(token);
                return Err(SwitchboardError::CircularDependency {
                    cycle: names.join(" -> "),
                });
            }
            stack.push((id, token));
            Ok(ResolutionFrame)
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Thread-safe dependency injection container.
///
/// Bindings map a token (the bound type's identity) to a singleton-scoped
/// provider. The first resolution of a token runs the provider and caches the
/// instance; every later resolution returns the same `Arc`. A binding cycle
/// is detected during resolution and reported with the full chain of tokens
/// instead of recursing forever.
pub struct Container {
    bindings: DashMap<TypeId, Binding>,
    instances: DashMap<TypeId, AnyInstance>,
    trait_mappings: DashMap<TypeId, (TypeId, &'static str)>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            instances: DashMap::new(),
            trait_mappings: DashMap::new(),
            casters: DashMap::new(),
        }
    }

    /// Start a binding for `T`.
    ///
    /// The builder selects a provider (`to`, `to_self`, `to_instance`) and
    /// the binding only takes effect once `in_singleton_scope` is called.
    ///
    /// # Example
    /// ```ignore
    /// container.bind::<UserService>().to_self().in_singleton_scope()?;
    /// ```
    pub fn bind<T: Send + Sync + 'static>(&self) -> BindingBuilder<'_, T> {
        BindingBuilder {
            container: self,
            _marker: PhantomData,
        }
    }

    /// Bind a trait object token to a concrete implementation.
    ///
    /// Resolving `Arc<dyn Trait>` afterwards resolves the implementation
    /// through its own binding (singleton scope included) and casts it.
    pub fn bind_trait<T, I, F>(&self, cast: F)
    where
        T: ?Sized + 'static + Send + Sync,
        I: 'static + Send + Sync,
        F: Fn(Arc<I>) -> Arc<T> + Send + Sync + 'static,
    {
        self.trait_mappings.insert(
            TypeId::of::<T>(),
            (TypeId::of::<I>(), std::any::type_name::<I>()),
        );
        let caster: CasterFn = Arc::new(move |instance: AnyInstance| {
            let concrete = instance
                .downcast::<I>()
                .expect("trait caster invoked with a foreign instance; this is a switchboard bug");
            let trait_object: Arc<T> = cast(concrete);
            // Wrap the unsized Arc<dyn Trait> in a sized Arc so it can travel
            // through the Any-typed instance cache.
            Arc::new(trait_object)
        });
        self.casters.insert(TypeId::of::<T>(), caster);
    }

    /// Resolve the singleton bound to `T`.
    ///
    /// # Errors
    /// Fails with `UnboundToken` when no binding exists and with
    /// `CircularDependency` when construction loops back onto `T`.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let entry = self.resolve_entry(TypeId::of::<T>(), std::any::type_name::<T>())?;
        entry
            .downcast::<T>()
            .map_err(|_| SwitchboardError::DowncastFailed {
                token: std::any::type_name::<T>().to_string(),
            })
    }

    /// Resolve a trait object previously declared with [`Container::bind_trait`].
    pub fn resolve_trait<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let trait_id = TypeId::of::<T>();
        let caster = self
            .casters
            .get(&trait_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SwitchboardError::UnboundToken {
                token: std::any::type_name::<T>().to_string(),
            })?;
        let (impl_id, impl_token) = self
            .trait_mappings
            .get(&trait_id)
            .map(|entry| *entry.value())
            .ok_or_else(|| SwitchboardError::UnboundToken {
                token: std::any::type_name::<T>().to_string(),
            })?;

        let implementation = self.resolve_entry(impl_id, impl_token)?;
        let wrapped = caster(implementation);
        let wrapper = wrapped
            .downcast::<Arc<T>>()
            .map_err(|_| SwitchboardError::DowncastFailed {
                token: std::any::type_name::<T>().to_string(),
            })?;
        Ok(Arc::clone(wrapper.as_ref()))
    }

    /// Whether a binding (concrete or trait) exists for `T`.
    pub fn is_bound<T: ?Sized + 'static>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.bindings.contains_key(&id) || self.trait_mappings.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn resolve_entry(&self, id: TypeId, token: &'static str) -> Result<AnyInstance> {
        if let Some(existing) = self.instances.get(&id) {
            return Ok(Arc::clone(existing.value()));
        }
        // Clone the provider out of the map so no shard lock is held while
        // the provider recurses back into the container.
        let provider = match self.bindings.get(&id) {
            Some(binding) => Arc::clone(&binding.provider),
            None => {
                return Err(SwitchboardError::UnboundToken {
                    token: token.to_string(),
                });
            }
        };

        let frame = ResolutionFrame::enter(id, token)?;
        let instance = provider(self)?;
        drop(frame);

        // First insert wins: concurrent resolutions of the same token all
        // observe the one cached instance.
        Ok(Arc::clone(self.instances.entry(id).or_insert(instance).value()))
    }

    fn insert_binding(&self, id: TypeId, token: &'static str, provider: Provider) -> Result<()> {
        if self.instances.contains_key(&id) {
            return Err(SwitchboardError::RebindAfterResolution {
                token: token.to_string(),
            });
        }
        self.bindings.insert(id, Binding { token, provider });
        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            instances: self.instances.clone(),
            trait_mappings: self.trait_mappings.clone(),
            casters: self.casters.clone(),
        }
    }
}

/// First stage of [`Container::bind`]: selects the provider.
pub struct BindingBuilder<'c, T> {
    container: &'c Container,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T: Send + Sync + 'static> BindingBuilder<'c, T> {
    /// Bind `T` to a factory closure.
    pub fn to<F>(self, provider: F) -> ScopedBinding<'c>
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        ScopedBinding {
            container: self.container,
            id: TypeId::of::<T>(),
            token: std::any::type_name::<T>(),
            provider: Arc::new(move |container| {
                Ok(Arc::new(provider(container)?) as AnyInstance)
            }),
        }
    }

    /// Bind `T` to an instance constructed ahead of time.
    pub fn to_instance(self, instance: T) -> ScopedBinding<'c> {
        let shared: AnyInstance = Arc::new(instance);
        ScopedBinding {
            container: self.container,
            id: TypeId::of::<T>(),
            token: std::any::type_name::<T>(),
            provider: Arc::new(move |_| Ok(Arc::clone(&shared))),
        }
    }
}

impl<'c, T: Injectable> BindingBuilder<'c, T> {
    /// Bind `T` to its own [`Injectable`] constructor.
    pub fn to_self(self) -> ScopedBinding<'c> {
        self.to(T::inject)
    }
}

/// Second stage of [`Container::bind`]: commits the binding with a scope.
pub struct ScopedBinding<'c> {
    container: &'c Container,
    id: TypeId,
    token: &'static str,
    provider: Provider,
}

impl ScopedBinding<'_> {
    /// Register the binding in singleton scope.
    ///
    /// Registering the same token again before its first resolution replaces
    /// the previous binding; doing so after the token has been resolved is a
    /// configuration error, since the cached instance could no longer match
    /// its binding.
    pub fn in_singleton_scope(self) -> Result<()> {
        self.container
            .insert_binding(self.id, self.token, self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestService {
        value: i32,
    }

    impl Injectable for TestService {
        fn inject(_container: &Container) -> Result<Self> {
            Ok(Self { value: 42 })
        }
    }

    struct DependentService {
        inner: Arc<TestService>,
    }

    impl Injectable for DependentService {
        fn inject(container: &Container) -> Result<Self> {
            Ok(Self {
                inner: container.resolve()?,
            })
        }
    }

    trait Greeter: Send + Sync {
        fn greeting(&self) -> String;
    }

    struct EnglishGreeter;

    impl Greeter for EnglishGreeter {
        fn greeting(&self) -> String {
            "hello".to_string()
        }
    }

    impl Injectable for EnglishGreeter {
        fn inject(_container: &Container) -> Result<Self> {
            Ok(Self)
        }
    }

    #[test]
    fn bind_and_resolve() {
        let container = Container::new();
        assert!(container.is_empty());
        container
            .bind::<TestService>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        assert_eq!(container.len(), 1);
        let service = container.resolve::<TestService>().unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn singleton_scope_returns_the_same_instance() {
        let container = Container::new();
        container
            .bind::<TestService>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        let first = container.resolve::<TestService>().unwrap();
        let second = container.resolve::<TestService>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn transitive_dependencies_are_resolved() {
        let container = Container::new();
        container
            .bind::<TestService>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        container
            .bind::<DependentService>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        let dependent = container.resolve::<DependentService>().unwrap();
        let direct = container.resolve::<TestService>().unwrap();
        assert!(Arc::ptr_eq(&dependent.inner, &direct));
    }

    #[test]
    fn unbound_token_fails() {
        let container = Container::new();
        let error = container.resolve::<TestService>().unwrap_err();
        assert!(matches!(error, SwitchboardError::UnboundToken { .. }));
    }

    #[test]
    fn binding_cycle_is_detected() {
        #[derive(Debug)]
        struct Left;
        #[derive(Debug)]
        struct Right;

        let container = Container::new();
        container
            .bind::<Left>()
            .to(|c| {
                c.resolve::<Right>()?;
                Ok(Left)
            })
            .in_singleton_scope()
            .unwrap();
        container
            .bind::<Right>()
            .to(|c| {
                c.resolve::<Left>()?;
                Ok(Right)
            })
            .in_singleton_scope()
            .unwrap();

        let error = container.resolve::<Left>().unwrap_err();
        match error {
            SwitchboardError::CircularDependency { cycle } => {
                assert!(cycle.contains("Left"));
                assert!(cycle.contains("Right"));
            }
            other => panic!("expected a circular dependency error, got {other}"),
        }
    }

    #[test]
    fn trait_binding_resolves_through_the_implementation() {
        let container = Container::new();
        container
            .bind::<EnglishGreeter>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        container.bind_trait::<dyn Greeter, EnglishGreeter, _>(|i| i as Arc<dyn Greeter>);

        let greeter = container.resolve_trait::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greeting(), "hello");
    }

    #[test]
    fn to_instance_serves_the_prebuilt_value() {
        let container = Container::new();
        container
            .bind::<TestService>()
            .to_instance(TestService { value: 7 })
            .in_singleton_scope()
            .unwrap();
        let first = container.resolve::<TestService>().unwrap();
        let second = container.resolve::<TestService>().unwrap();
        assert_eq!(first.value, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn rebinding_before_resolution_overwrites() {
        let container = Container::new();
        container
            .bind::<TestService>()
            .to_instance(TestService { value: 1 })
            .in_singleton_scope()
            .unwrap();
        container
            .bind::<TestService>()
            .to_instance(TestService { value: 2 })
            .in_singleton_scope()
            .unwrap();
        assert_eq!(container.resolve::<TestService>().unwrap().value, 2);
    }

    #[test]
    fn rebinding_after_resolution_is_rejected() {
        let container = Container::new();
        container
            .bind::<TestService>()
            .to_self()
            .in_singleton_scope()
            .unwrap();
        container.resolve::<TestService>().unwrap();

        let error = container
            .bind::<TestService>()
            .to_instance(TestService { value: 9 })
            .in_singleton_scope()
            .unwrap_err();
        assert!(matches!(
            error,
            SwitchboardError::RebindAfterResolution { .. }
        ));
    }
}
