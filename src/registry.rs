//! Type registry: maps type names to their descriptors

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::error::{DiError, DiResult};

/// Registry of type descriptors, keyed by type name.
///
/// This is the queryable stand-in for runtime reflection: the container
/// consults it whenever a definition names a type to construct.
pub struct TypeRegistry {
    descriptors: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
}

impl TypeRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    /// Register a type descriptor under its type name.
    /// Re-registering a name replaces the previous descriptor.
    pub fn register(&self, descriptor: TypeDescriptor) -> DiResult<()> {
        debug!("Registered type descriptor: {}", descriptor.type_name);
        self.descriptors
            .write()
            .map_err(|_| DiError::LockError)?
            .insert(descriptor.type_name.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Look up the descriptor for a type name
    pub fn lookup(&self, type_name: &str) -> DiResult<Option<Arc<TypeDescriptor>>> {
        Ok(self
            .descriptors
            .read()
            .map_err(|_| DiError::LockError)?
            .get(type_name)
            .cloned())
    }

    /// Whether a descriptor is registered for the type name
    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors
            .read()
            .map(|descriptors| descriptors.contains_key(type_name))
            .unwrap_or(false)
    }

    /// Create a global registry instance
    pub fn global() -> &'static Self {
        static INSTANCE: std::sync::OnceLock<TypeRegistry> = std::sync::OnceLock::new();
        INSTANCE.get_or_init(TypeRegistry::new)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to register type descriptors in a registry
#[macro_export]
macro_rules! register_types {
    ($registry:expr, $($descriptor:expr),* $(,)?) => {
        {
            $(
                $registry.register($descriptor)?;
            )*
            Ok::<(), $crate::error::DiError>(())
        }
    };
}
