//! Container builder for fluent configuration

use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::definition::Definition;
use crate::error::DiResult;
use crate::registry::TypeRegistry;
use crate::service::Service;

/// Builder for constructing a service container
pub struct ContainerBuilder {
    definitions: HashMap<String, Definition>,
    registry: Option<Arc<TypeRegistry>>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            registry: None,
        }
    }

    /// Use a dedicated type registry instead of the global one
    pub fn with_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register a raw definition under an identifier
    pub fn register(&mut self, id: &str, definition: Definition) -> &mut Self {
        self.definitions.insert(id.to_string(), definition);
        self
    }

    /// Register a type under its own type name
    pub fn register_type(&mut self, type_name: &str) -> &mut Self {
        self.register(type_name, Definition::Type(type_name.to_string()))
    }

    /// Register an identifier that constructs the named type.
    ///
    /// Unlike an alias, the constructed instance is cached under `id`.
    pub fn register_type_as(&mut self, id: &str, type_name: &str) -> &mut Self {
        self.register(id, Definition::Type(type_name.to_string()))
    }

    /// Register an alias redirecting resolution to another identifier
    pub fn register_alias(&mut self, id: &str, target: &str) -> &mut Self {
        self.register(id, Definition::Alias(target.to_string()))
    }

    /// Register a factory invoked with the container on first resolution
    pub fn register_factory<T, F>(&mut self, id: &str, factory: F) -> &mut Self
    where
        T: Service,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register(id, Definition::factory(factory))
    }

    /// Register a literal value, returned as-is on resolution
    pub fn register_value<T: Service>(&mut self, id: &str, value: T) -> &mut Self {
        self.register(id, Definition::value(value))
    }

    /// Build the container
    pub fn build(self) -> Container {
        Container::from_parts(self.definitions, self.registry)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension methods for fluent builder pattern
impl ContainerBuilder {
    /// Add multiple definitions using a configuration function
    pub fn add_services<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        configure(&mut self);
        self
    }

    /// Add definitions from another module
    pub fn add_module<M: Module>(mut self, module: M) -> Self {
        module.configure(&mut self);
        self
    }
}

/// Trait for service modules
pub trait Module {
    /// Configure definitions for this module
    fn configure(&self, builder: &mut ContainerBuilder);
}
