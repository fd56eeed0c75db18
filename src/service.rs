//! Service trait and downcast support

use downcast_rs::{impl_downcast, Downcast};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Trait that all services must implement
pub trait Service: Any + Send + Sync + Downcast {
    /// Get the type name of the service
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl_downcast!(Service);

impl fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service({})", self.type_name())
    }
}

/// Extension trait for Arc downcasting
pub trait ArcServiceExt {
    /// Try to downcast Arc<dyn Service> to Arc<T>
    fn downcast_arc<T: Service>(self) -> Option<Arc<T>>;
}

impl ArcServiceExt for Arc<dyn Service> {
    fn downcast_arc<T: Service>(self) -> Option<Arc<T>> {
        if self.is::<T>() {
            unsafe {
                let raw = Arc::into_raw(self);
                Some(Arc::from_raw(raw as *const T))
            }
        } else {
            None
        }
    }
}

/// Blanket implementation for all suitable types
impl<T: Any + Send + Sync> Service for T {}
