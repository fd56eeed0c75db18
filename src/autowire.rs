//! Property autowiring: post-construction injection into declared properties

use tracing::trace;

use crate::container::Container;
use crate::descriptor::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::service::Service;

/// Inject resolved services into every autowired property of a freshly
/// constructed instance.
///
/// The target identifier is the directive's explicit override when present,
/// otherwise the property's declared type. Runs once per construction;
/// cached instances are never re-autowired.
pub fn autowire(
    descriptor: &TypeDescriptor,
    instance: &mut dyn Service,
    container: &Container,
) -> DiResult<()> {
    for property in &descriptor.properties {
        let Some(directive) = &property.directive else {
            continue;
        };

        let target = directive
            .service
            .as_deref()
            .or(property.declared_type.as_deref())
            .ok_or_else(|| DiError::UnresolvableProperty {
                owner: descriptor.type_name.clone(),
                name: property.name.clone(),
            })?;

        trace!(
            "Autowiring '{}' property '{}' from service '{}'",
            descriptor.type_name,
            property.name,
            target
        );

        let service = container.get(target)?;
        (property.inject)(instance, service)?;
    }

    Ok(())
}
