//! Parameter binding: turns formal constructor parameters into arguments

use std::sync::Arc;
use tracing::trace;

use crate::container::Container;
use crate::descriptor::{ParameterDescriptor, ParameterType};
use crate::error::{DiError, DiResult};
use crate::service::{ArcServiceExt, Service};

/// A concrete value bound to one constructor parameter
#[derive(Clone, Debug)]
pub enum Argument {
    /// A service resolved through the container
    Service(Arc<dyn Service>),
    /// The constructor applies the parameter's declared default
    Default,
    /// An empty sequence (variadic, or sequence type without a default)
    Empty,
}

/// Positional argument list produced by [`bind`]
#[derive(Debug)]
pub struct BoundArguments {
    args: Vec<Argument>,
}

impl BoundArguments {
    /// Number of bound arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether no arguments were bound
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Argument at `index`
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.args.get(index)
    }

    /// Resolved service at `index`, downcast to its concrete type
    pub fn service<T: Service>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.args.get(index) {
            Some(Argument::Service(service)) => {
                service
                    .clone()
                    .downcast_arc::<T>()
                    .ok_or_else(|| DiError::TypeCastFailed {
                        expected: std::any::type_name::<T>().to_string(),
                        context: format!("constructor argument {index}"),
                    })
            }
            _ => Err(DiError::TypeCastFailed {
                expected: std::any::type_name::<T>().to_string(),
                context: format!("constructor argument {index}"),
            }),
        }
    }

    /// Resolved service at `index` without downcasting
    pub fn raw(&self, index: usize) -> DiResult<Arc<dyn Service>> {
        match self.args.get(index) {
            Some(Argument::Service(service)) => Ok(service.clone()),
            _ => Err(DiError::TypeCastFailed {
                expected: "service".to_string(),
                context: format!("constructor argument {index}"),
            }),
        }
    }

    /// Whether the argument at `index` defers to the declared default
    pub fn is_default(&self, index: usize) -> bool {
        matches!(self.args.get(index), Some(Argument::Default))
    }

    /// Whether the argument at `index` is the empty sequence
    pub fn is_empty_sequence(&self, index: usize) -> bool {
        matches!(self.args.get(index), Some(Argument::Empty))
    }
}

/// Bind each formal parameter, in declaration order.
///
/// Variadic parameters always bind the empty sequence. Service-typed
/// parameters are resolved through the container, even when a default
/// exists. Sequence-typed parameters without a default bind the empty
/// sequence. Anything else falls back to its default or fails with
/// `UnresolvableParameter`.
pub fn bind(
    owner: &str,
    parameters: &[ParameterDescriptor],
    container: &Container,
) -> DiResult<BoundArguments> {
    let mut args = Vec::with_capacity(parameters.len());

    for parameter in parameters {
        let argument = match &parameter.ty {
            // Variadics never receive resolved values, service-typed or not
            _ if parameter.variadic => Argument::Empty,
            ParameterType::Service(service_id) => {
                trace!(
                    "Binding '{}' parameter '{}' to service '{}'",
                    owner,
                    parameter.name,
                    service_id
                );
                Argument::Service(container.get(service_id)?)
            }
            ParameterType::Sequence if !parameter.has_default => Argument::Empty,
            _ if parameter.has_default => Argument::Default,
            _ => {
                return Err(DiError::UnresolvableParameter {
                    owner: owner.to_string(),
                    name: parameter.name.clone(),
                })
            }
        };
        args.push(argument);
    }

    Ok(BoundArguments { args })
}
