//! Core container implementation

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

use crate::autowire::autowire;
use crate::binder::bind;
use crate::builder::ContainerBuilder;
use crate::definition::Definition;
use crate::error::{DiError, DiResult};
use crate::provider::ServiceProvider;
use crate::registry::TypeRegistry;
use crate::service::{ArcServiceExt, Service};

/// Container state: the definition store, the instance cache, and the
/// per-thread resolution stacks used for cycle detection.
pub struct ServiceContainer {
    /// Identifier -> definition mapping, immutable after build
    definitions: HashMap<String, Definition>,
    /// Identifier -> resolved instance; entries live for the container's lifetime
    instances: RwLock<HashMap<String, Arc<dyn Service>>>,
    /// Type registry consulted for construction; `None` means the global one
    registry: Option<Arc<TypeRegistry>>,
    /// Identifiers currently being resolved, per thread
    resolving: Mutex<HashMap<ThreadId, Vec<String>>>,
}

impl ServiceContainer {
    fn registry(&self) -> &TypeRegistry {
        match &self.registry {
            Some(registry) => registry,
            None => TypeRegistry::global(),
        }
    }

    /// Push `id` onto the current thread's resolution stack, failing fast
    /// when the identifier is already being resolved.
    fn begin_resolve(&self, id: &str) -> DiResult<ResolveGuard<'_>> {
        let thread = thread::current().id();
        let mut resolving = self.resolving.lock();
        let stack = resolving.entry(thread).or_default();

        if stack.iter().any(|entry| entry == id) {
            let mut path = stack.join(" -> ");
            path.push_str(" -> ");
            path.push_str(id);
            return Err(DiError::CircularDependency { path });
        }

        stack.push(id.to_string());
        Ok(ResolveGuard {
            inner: self,
            thread,
        })
    }
}

/// Pops the current identifier off the resolution stack on scope exit
struct ResolveGuard<'a> {
    inner: &'a ServiceContainer,
    thread: ThreadId,
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        let mut resolving = self.inner.resolving.lock();
        if let Some(stack) = resolving.get_mut(&self.thread) {
            stack.pop();
            if stack.is_empty() {
                resolving.remove(&self.thread);
            }
        }
    }
}

/// Thread-safe service container.
///
/// Cloning is cheap and shares the same definition store and instance
/// cache. Each identifier resolves to at most one instance per container
/// lifetime; repeated `get` calls return the same `Arc`.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ServiceContainer>,
}

impl Container {
    /// Canonical identifier the container pre-seeds itself under
    pub const IDENTIFIER: &'static str = "Container";

    /// Create a container directly from a definition map, using the
    /// global type registry
    pub fn new(definitions: HashMap<String, Definition>) -> Self {
        Self::from_parts(definitions, None)
    }

    /// Create a new container builder
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Assemble a container and seed its own cache entry.
    ///
    /// The seeded `Arc<Container>` points back into the cache that holds
    /// it, so the cycle keeps the container alive for the rest of the
    /// process. Containers are built once and used until exit, the memory
    /// is never reclaimed.
    pub(crate) fn from_parts(
        definitions: HashMap<String, Definition>,
        registry: Option<Arc<TypeRegistry>>,
    ) -> Self {
        let container = Container {
            inner: Arc::new(ServiceContainer {
                definitions,
                instances: RwLock::new(HashMap::new()),
                registry,
                resolving: Mutex::new(HashMap::new()),
            }),
        };

        // Pre-seed the cache with the container itself; resolving the
        // canonical identifier is then an ordinary cache hit.
        let self_instance: Arc<dyn Service> = Arc::new(container.clone());
        container
            .inner
            .instances
            .write()
            .insert(Self::IDENTIFIER.to_string(), self_instance);

        container
    }

    /// Resolve an identifier into an instance.
    ///
    /// Returns the cached instance when present; otherwise resolves the
    /// definition (an identifier with no definition resolves as its own
    /// type name), caches the result, and returns it. Every failure
    /// surfaces as `NotFound` carrying the original cause.
    pub fn get(&self, id: &str) -> DiResult<Arc<dyn Service>> {
        if let Some(instance) = self.inner.instances.read().get(id) {
            trace!("Cache hit for service: {}", id);
            return Ok(instance.clone());
        }

        let _guard = self
            .inner
            .begin_resolve(id)
            .map_err(|e| DiError::not_found(id, e))?;

        // Alias chase returns early; the result is cached under the target
        // identifier only, so the next chase ends at a cache hit there.
        if let Some(Definition::Alias(target)) = self.inner.definitions.get(id) {
            if target != id {
                debug!("Chasing alias: {} -> {}", id, target);
                return self.get(target);
            }
        }

        let instance = self.resolve(id).map_err(|e| DiError::not_found(id, e))?;

        self.inner
            .instances
            .write()
            .insert(id.to_string(), instance.clone());

        Ok(instance)
    }

    /// Resolve a service and downcast it to its concrete type
    pub fn get_as<T: Service>(&self, id: &str) -> DiResult<Arc<T>> {
        self.get(id)?
            .downcast_arc::<T>()
            .ok_or_else(|| DiError::TypeCastFailed {
                expected: std::any::type_name::<T>().to_string(),
                context: format!("service '{id}'"),
            })
    }

    /// Whether the identifier is present in the instance cache or the
    /// definition store. Never triggers construction.
    pub fn has(&self, id: &str) -> bool {
        self.inner.instances.read().contains_key(id) || self.inner.definitions.contains_key(id)
    }

    fn resolve(&self, id: &str) -> DiResult<Arc<dyn Service>> {
        match self.inner.definitions.get(id) {
            // Implicit self-binding: an unregistered identifier resolves as
            // its own type name
            None => self.construct(id),
            Some(Definition::Type(type_name)) => self.construct(type_name),
            // A definition naming its own identifier means "construct this
            // type"; foreign targets were chased in `get`
            Some(Definition::Alias(target)) => self.construct(target),
            Some(Definition::Factory(factory)) => {
                debug!("Invoking factory for service: {}", id);
                factory(self)
            }
            Some(Definition::Value(value)) => Ok(value.clone()),
        }
    }

    fn construct(&self, type_name: &str) -> DiResult<Arc<dyn Service>> {
        let descriptor = self
            .inner
            .registry()
            .lookup(type_name)?
            .ok_or_else(|| DiError::TypeNotRegistered(type_name.to_string()))?;

        let constructor = descriptor
            .constructor
            .as_ref()
            .ok_or_else(|| DiError::NotInstantiable(type_name.to_string()))?;

        debug!("Constructing service: {}", type_name);
        let arguments = bind(type_name, &constructor.parameters, self)?;
        let mut instance = (constructor.construct)(&arguments)?;

        autowire(&descriptor, instance.as_mut(), self)?;

        Ok(Arc::from(instance))
    }
}

impl ServiceProvider for Container {
    fn get_service(&self, id: &str) -> DiResult<Arc<dyn Service>> {
        self.get(id)
    }

    fn has_service(&self, id: &str) -> bool {
        self.has(id)
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::builder().build()
    }
}
