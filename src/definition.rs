//! Service definitions: the recipes the container resolves from

use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::service::Service;

/// Factory function invoked with the container as its sole argument
pub type FactoryFn = Arc<dyn Fn(&Container) -> DiResult<Arc<dyn Service>> + Send + Sync>;

/// A registered recipe for producing a service.
///
/// The original design stored all four kinds in one loosely-typed slot and
/// told them apart by runtime type tests; here each kind is an explicit
/// variant and resolution switches on the tag.
#[derive(Clone)]
pub enum Definition {
    /// Construct the named type through its registered descriptor
    Type(String),
    /// Redirect resolution to another identifier
    Alias(String),
    /// Invoke the factory; its return value is the instance
    Factory(FactoryFn),
    /// Return the stored value as-is, never constructed
    Value(Arc<dyn Service>),
}

impl Definition {
    /// Factory definition from a typed closure
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Service,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        Definition::Factory(Arc::new(move |container| {
            Ok(Arc::new(factory(container)?) as Arc<dyn Service>)
        }))
    }

    /// Literal value definition
    pub fn value<T: Service>(value: T) -> Self {
        Definition::Value(Arc::new(value))
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Type(name) => f.debug_tuple("Type").field(name).finish(),
            Definition::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
            Definition::Factory(_) => f.write_str("Factory(..)"),
            Definition::Value(value) => {
                f.debug_tuple("Value").field(&value.type_name()).finish()
            }
        }
    }
}
