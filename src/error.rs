//! Error types for the DI container

use thiserror::Error;

/// Result type alias for DI operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur during DI operations
#[derive(Error, Debug)]
pub enum DiError {
    /// Identifier could not be resolved. The only error that crosses the
    /// `get` boundary; inner failures are carried in `cause`.
    #[error("no entry was found for '{id}' identifier")]
    NotFound {
        id: String,
        #[source]
        cause: Option<Box<DiError>>,
    },

    /// No descriptor for the type name in the type registry
    #[error("type '{0}' is not registered in the type registry")]
    TypeNotRegistered(String),

    /// Descriptor exists but carries no constructor (interface or abstract type)
    #[error("target '{0}' is not instantiable")]
    NotInstantiable(String),

    /// Constructor parameter has no resolvable type and no default
    #[error("unable to resolve '{owner}' constructor parameter: '{name}'")]
    UnresolvableParameter { owner: String, name: String },

    /// Autowired property has neither an override nor a declared type
    #[error("unable to resolve '{owner}' autowired property: '{name}'")]
    UnresolvableProperty { owner: String, name: String },

    /// Identifier re-entered while already being resolved
    #[error("circular dependency detected: {path}")]
    CircularDependency { path: String },

    /// Factory or constructor reported a failure
    #[error("failed to create service '{service_type}': {reason}")]
    ServiceCreationFailed {
        service_type: String,
        reason: String,
    },

    /// A bound argument or cached instance was not of the expected type
    #[error("service type mismatch: expected '{expected}' in {context}")]
    TypeCastFailed { expected: String, context: String },

    /// Lock error
    #[error("failed to acquire lock")]
    LockError,

    /// Configuration error
    #[cfg(feature = "config")]
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("DI error: {0}")]
    Other(String),
}

impl DiError {
    /// Wrap a resolution failure into `NotFound` for `id`.
    ///
    /// A `NotFound` produced by a recursive `get` call is passed through
    /// unchanged so the innermost failure keeps its identifier.
    pub fn not_found(id: impl Into<String>, cause: DiError) -> DiError {
        match cause {
            inner @ DiError::NotFound { .. } => inner,
            cause => DiError::NotFound {
                id: id.into(),
                cause: Some(Box::new(cause)),
            },
        }
    }

    /// Underlying cause of a `NotFound`, if any
    pub fn cause(&self) -> Option<&DiError> {
        match self {
            DiError::NotFound { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }
}
