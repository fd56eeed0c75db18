//! Type descriptors: the explicit, queryable replacement for reflection
//!
//! Each constructible type exposes a static list of constructor-parameter
//! descriptors and, where autowiring is used, property descriptors. They are
//! built with [`TypeDescriptorBuilder`] at registration time instead of
//! being discovered by runtime introspection.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::binder::BoundArguments;
use crate::error::{DiError, DiResult};
use crate::service::{ArcServiceExt, Service};

/// Construct function: turns bound arguments into a fresh instance
pub type ConstructFn = Arc<dyn Fn(&BoundArguments) -> DiResult<Box<dyn Service>> + Send + Sync>;

/// Property inject function: assigns a resolved service into an instance
pub type InjectFn = Arc<dyn Fn(&mut dyn Service, Arc<dyn Service>) -> DiResult<()> + Send + Sync>;

/// Declared type of a constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// A class/interface type, resolved through the container
    Service(String),
    /// A builtin scalar type, never service-resolved
    Builtin,
    /// A builtin sequence type ("array"); binds empty when no default exists
    Sequence,
    /// No declared type
    Untyped,
}

/// Per-constructor-parameter metadata
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// Parameter name, used in error messages
    pub name: String,
    /// Declared type classification
    pub ty: ParameterType,
    /// Whether a default value exists
    pub has_default: bool,
    /// Whether the parameter is variadic
    pub variadic: bool,
}

impl ParameterDescriptor {
    fn new(name: &str, ty: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            has_default: false,
            variadic: false,
        }
    }

    /// A parameter with a class/interface type resolved via the container
    pub fn service(name: &str, service_id: &str) -> Self {
        Self::new(name, ParameterType::Service(service_id.to_string()))
    }

    /// A builtin scalar parameter
    pub fn builtin(name: &str) -> Self {
        Self::new(name, ParameterType::Builtin)
    }

    /// A builtin sequence parameter
    pub fn sequence(name: &str) -> Self {
        Self::new(name, ParameterType::Sequence)
    }

    /// A parameter with no declared type
    pub fn untyped(name: &str) -> Self {
        Self::new(name, ParameterType::Untyped)
    }

    /// Mark a default value as available
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Mark the parameter as variadic
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// Autowire directive attached to a property, with an optional
/// explicit service identifier override
#[derive(Debug, Clone, Default)]
pub struct Autowired {
    /// Explicit identifier override; when absent the property's
    /// declared type is used
    pub service: Option<String>,
}

/// Per-property metadata
#[derive(Clone)]
pub struct PropertyDescriptor {
    /// Property name, used in error messages
    pub name: String,
    /// Declared type identifier, if the property has one
    pub declared_type: Option<String>,
    /// Autowire directive; properties without one are skipped
    pub directive: Option<Autowired>,
    /// Assigns the resolved service into the instance
    pub inject: InjectFn,
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("directive", &self.directive)
            .finish()
    }
}

/// Constructor metadata: formal parameters plus the construct function
#[derive(Clone)]
pub struct Constructor {
    /// Formal parameters in declaration order
    pub parameters: Vec<ParameterDescriptor>,
    /// Builds the instance from bound arguments
    pub construct: ConstructFn,
}

/// Describes a constructible (or deliberately non-constructible) type
#[derive(Clone)]
pub struct TypeDescriptor {
    /// Type name the descriptor is registered under
    pub type_name: String,
    /// Constructor; `None` marks an interface or abstract type
    pub constructor: Option<Constructor>,
    /// Declared properties, scanned by the autowirer after construction
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// Start building a descriptor for a concrete type
    pub fn build<T: Service>(type_name: &str) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder::new(type_name)
    }

    /// Descriptor for a non-instantiable type (interface or abstract);
    /// resolving it directly fails with `NotInstantiable`
    pub fn interface(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            constructor: None,
            properties: Vec::new(),
        }
    }

    /// Whether the type can be constructed
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("instantiable", &self.is_instantiable())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Builder for [`TypeDescriptor`] with typed construct and inject closures
pub struct TypeDescriptorBuilder<T: Service> {
    type_name: String,
    constructor: Option<Constructor>,
    properties: Vec<PropertyDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Service> TypeDescriptorBuilder<T> {
    /// Create a builder for `T` registered under `type_name`
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            constructor: None,
            properties: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare the constructor: formal parameters plus a construct closure
    /// that receives the bound arguments in declaration order
    pub fn constructor<F>(mut self, parameters: Vec<ParameterDescriptor>, construct: F) -> Self
    where
        F: Fn(&BoundArguments) -> DiResult<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Constructor {
            parameters,
            construct: Arc::new(move |args| Ok(Box::new(construct(args)?) as Box<dyn Service>)),
        });
        self
    }

    /// Bind an autowired property whose target is its declared type
    pub fn autowired<D, F>(self, name: &str, declared_type: &str, assign: F) -> Self
    where
        D: Service,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        self.bind_property(
            name,
            Some(declared_type.to_string()),
            Autowired::default(),
            assign,
        )
    }

    /// Bind an autowired property with an explicit service identifier
    /// override. The override wins even when the property declares a
    /// different type.
    pub fn autowired_as<D, F>(
        self,
        name: &str,
        declared_type: &str,
        service_id: &str,
        assign: F,
    ) -> Self
    where
        D: Service,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        self.bind_property(
            name,
            Some(declared_type.to_string()),
            Autowired {
                service: Some(service_id.to_string()),
            },
            assign,
        )
    }

    /// Bind an autowired property with neither an override nor a declared
    /// type; resolving the owning type fails with `UnresolvableProperty`
    pub fn autowired_untyped(mut self, name: &str) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.to_string(),
            declared_type: None,
            directive: Some(Autowired::default()),
            // Target selection fails before injection is ever attempted
            inject: Arc::new(|_, _| Ok(())),
        });
        self
    }

    fn bind_property<D, F>(
        mut self,
        name: &str,
        declared_type: Option<String>,
        directive: Autowired,
        assign: F,
    ) -> Self
    where
        D: Service,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        let owner = self.type_name.clone();
        let property = name.to_string();
        self.properties.push(PropertyDescriptor {
            name: name.to_string(),
            declared_type,
            directive: Some(directive),
            inject: Arc::new(move |instance, service| {
                let target =
                    instance
                        .downcast_mut::<T>()
                        .ok_or_else(|| DiError::TypeCastFailed {
                            expected: std::any::type_name::<T>().to_string(),
                            context: format!("autowired property '{owner}::{property}'"),
                        })?;
                let service =
                    service
                        .downcast_arc::<D>()
                        .ok_or_else(|| DiError::TypeCastFailed {
                            expected: std::any::type_name::<D>().to_string(),
                            context: format!("autowired property '{owner}::{property}'"),
                        })?;
                assign(target, service);
                Ok(())
            }),
        });
        self
    }

    /// Finish the descriptor
    pub fn finish(self) -> TypeDescriptor {
        TypeDescriptor {
            type_name: self.type_name,
            constructor: self.constructor,
            properties: self.properties,
        }
    }
}
