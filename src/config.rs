//! Configuration-based definitions
//!
//! Lets type, alias, and literal-value definitions be declared in TOML or
//! JSON and applied to a [`ContainerBuilder`]. Factories cannot be declared
//! in configuration; register those programmatically.

use serde::{Deserialize, Serialize};

use crate::builder::ContainerBuilder;
use crate::definition::Definition;
use crate::error::{DiError, DiResult};

/// One definition, tagged by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionConfig {
    /// Construct the named type
    Type(String),
    /// Redirect to another identifier
    Alias(String),
    /// A literal value returned as-is
    Value(serde_json::Value),
}

/// Definition entry: identifier plus its definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Identifier the definition is registered under
    pub id: String,
    /// The definition itself
    #[serde(flatten)]
    pub definition: DefinitionConfig,
}

/// Container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Definition entries
    pub services: Vec<ServiceConfig>,
}

impl ContainerConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse JSON: {}", e)))
    }

    /// Apply configuration to a container builder
    pub fn apply_to_builder(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
        for service in &self.services {
            match &service.definition {
                DefinitionConfig::Type(type_name) => {
                    builder.register(&service.id, Definition::Type(type_name.clone()));
                }
                DefinitionConfig::Alias(target) => {
                    builder.register(&service.id, Definition::Alias(target.clone()));
                }
                DefinitionConfig::Value(value) => {
                    register_value(builder, &service.id, value);
                }
            }
        }
        Ok(())
    }
}

/// Store a literal config value under the most useful native type
fn register_value(builder: &mut ContainerBuilder, id: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::String(s) => {
            builder.register_value(id, s.clone());
        }
        serde_json::Value::Bool(b) => {
            builder.register_value(id, *b);
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                builder.register_value(id, i);
            } else {
                builder.register_value(id, n.as_f64().unwrap_or_default());
            }
        }
        other => {
            builder.register_value(id, other.clone());
        }
    }
}
