// config.rs

// Adapter configuration. Parameters come from a YAML document organised in
// namespaces (nested mappings addressed by a dotted path) and are read exactly
// once, when an adapter is constructed.

// Dependencies
use crate::AdapterError;
use log::info;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// Parameter key for the bounds tolerance
pub const BOUNDS_PARAM_NAME: &str = "start_state_max_bounds_error";
/// Parameter key for the prefix duration ceiling
pub const DT_PARAM_NAME: &str = "start_state_max_dt";

/// Namespaced key-value parameters backed by a YAML document
#[derive(Debug, Clone, Default)]
pub struct ParameterSource {
    root: Value,
}

impl ParameterSource {
    /// Source with no parameters; every lookup yields defaults
    pub fn empty() -> Self {
        ParameterSource { root: Value::Null }
    }

    /// Parses a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AdapterError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        match root {
            Value::Mapping(_) | Value::Null => Ok(ParameterSource { root }),
            _ => Err(AdapterError::ConfigError("parameter document must be a mapping".to_string())),
        }
    }

    /// Reads a YAML document from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AdapterError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// The mapping stored under `namespace` ("a.b" means key b inside key a).
    /// The empty namespace is the document root. Missing sections yield `None`.
    pub fn section(&self, namespace: &str) -> Option<&Value> {
        namespace
            .split('.')
            .filter(|part| !part.is_empty())
            .try_fold(&self.root, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    /// Reads a float parameter, falling back to `default` when it is absent
    pub fn get_f64(&self, namespace: &str, key: &str, default: f64) -> Result<f64, AdapterError> {
        let qualified = qualify(namespace, key);
        match self.section(namespace).and_then(|s| s.get(key)) {
            None => {
                info!("Param '{}' was not set. Using default value: {}", qualified, default);
                Ok(default)
            }
            Some(value) => {
                let value = value.as_f64().ok_or_else(|| {
                    AdapterError::ConfigError(format!("param '{}' must be a number", qualified))
                })?;
                info!("Param '{}' was set to {}", qualified, value);
                Ok(value)
            }
        }
    }
}

fn qualify(namespace: &str, key: &str) -> String {
    if namespace.is_empty() { key.to_string() } else { format!("{}.{}", namespace, key) }
}

/// Tolerances of the start state bounds adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixStartStateBoundsConfig {
    /// Largest distance outside a joint limit that is corrected silently,
    /// in the joint's native unit
    #[serde(rename = "start_state_max_bounds_error", default = "default_bounds_tolerance")]
    pub bounds_tolerance: f64,
    /// Ceiling in seconds on the duration of the prepended trajectory segment
    #[serde(rename = "start_state_max_dt", default = "default_max_prefix_duration")]
    pub max_prefix_duration: f64,
}

fn default_bounds_tolerance() -> f64 {
    0.05
}

fn default_max_prefix_duration() -> f64 {
    0.5
}

impl Default for FixStartStateBoundsConfig {
    fn default() -> Self {
        FixStartStateBoundsConfig {
            bounds_tolerance: default_bounds_tolerance(),
            max_prefix_duration: default_max_prefix_duration(),
        }
    }
}

impl FixStartStateBoundsConfig {
    /// Reads both tolerances from `namespace`, defaulting missing ones
    pub fn from_params(params: &ParameterSource, namespace: &str) -> Result<Self, AdapterError> {
        let config = FixStartStateBoundsConfig {
            bounds_tolerance: params.get_f64(namespace, BOUNDS_PARAM_NAME, default_bounds_tolerance())?,
            max_prefix_duration: params.get_f64(namespace, DT_PARAM_NAME, default_max_prefix_duration())?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Both values must be finite and non-negative
    pub fn validate(&self) -> Result<(), AdapterError> {
        for (name, value) in [(BOUNDS_PARAM_NAME, self.bounds_tolerance), (DT_PARAM_NAME, self.max_prefix_duration)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AdapterError::ConfigError(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
