//! Minimal inversion-of-control container
//!
//! This crate provides a lightweight dependency injection container that
//! resolves string identifiers into fully-constructed object graphs on
//! demand. Definitions come in four kinds (type name, alias, factory,
//! literal value); each identifier resolves to at most one instance per
//! container lifetime.
//!
//! Runtime reflection is replaced by explicit type descriptors: every
//! constructible type registers its constructor parameters and autowired
//! properties in a [`registry::TypeRegistry`], built through
//! [`descriptor::TypeDescriptorBuilder`] at registration time.

pub mod autowire;
pub mod binder;
pub mod builder;
pub mod container;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod provider;
pub mod registry;
pub mod service;

#[cfg(feature = "config")]
pub mod config;

pub use binder::{Argument, BoundArguments};
pub use builder::{ContainerBuilder, Module};
pub use container::Container;
pub use definition::Definition;
pub use descriptor::{
    Autowired, ParameterDescriptor, ParameterType, PropertyDescriptor, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::{DiError, DiResult};
pub use provider::ServiceProvider;
pub use registry::TypeRegistry;
pub use service::{ArcServiceExt, Service};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        ArcServiceExt, Container, ContainerBuilder, Definition, DiError, DiResult,
        ParameterDescriptor, Service, ServiceProvider, TypeDescriptor, TypeRegistry,
    };
}
