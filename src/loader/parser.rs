//! YAML parser for service definitions
//!
//! Parses and validates service YAML files.
//! Supports both built-in services (by name) and custom YAML files (by path).

use crate::error::{Error, Result};
use crate::loader::types::{OperationDefinition, ServiceDefinition};
use crate::projection::ProjectionRule;
use crate::services;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service definition from a name or file path
///
/// This function first checks if the input is a built-in service name
/// (e.g., "cloudwatch"), then falls back to loading from a file path.
///
/// # Examples
///
/// ```ignore
/// // Load built-in service by name
/// let service = load_service("ec2")?;
///
/// // Load custom service from file
/// let service = load_service("./my-service.yaml")?;
/// ```
pub fn load_service(path: impl AsRef<Path>) -> Result<ServiceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = services::get_builtin(&path_str) {
            return load_service_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            let builtin_list = services::list_builtin().join(", ");
            Error::config(format!(
                "Service '{}' not found. Built-in services: {}. Or provide a path to a YAML file.",
                path.display(),
                builtin_list
            ))
        } else {
            Error::config(format!(
                "Failed to read service file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_service_from_str(&content)
}

/// Load a service definition from a YAML string
pub fn load_service_from_str(yaml: &str) -> Result<ServiceDefinition> {
    let def: ServiceDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse service YAML: {e}")))?;

    validate_service(&def)?;
    Ok(def)
}

/// Validate a service definition
fn validate_service(def: &ServiceDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Service name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Service base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url).map_err(|e| {
        Error::config(format!(
            "Service '{}' has invalid base_url '{}': {e}",
            def.name, def.base_url
        ))
    })?;

    if def.operations.is_empty() {
        return Err(Error::config("Service must have at least one operation"));
    }

    let mut seen = HashSet::new();
    for op in &def.operations {
        for key in std::iter::once(&op.name).chain(op.command.as_ref()) {
            if !seen.insert(key.to_lowercase()) {
                return Err(Error::config(format!(
                    "Duplicate operation or command name: {key}"
                )));
            }
        }
        validate_operation(op)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if let Some(default) = &op.default_select {
        ProjectionRule::parse(default).map_err(|e| {
            Error::config(format!(
                "Operation '{}' has invalid default_select: {e}",
                op.name
            ))
        })?;
    }

    let mut names = HashSet::new();
    for param in &op.parameters {
        if param.name.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' has a parameter without a name",
                op.name
            )));
        }
        if !names.insert(param.name.as_str()) {
            return Err(Error::config(format!(
                "Operation '{}' declares parameter '{}' twice",
                op.name, param.name
            )));
        }
    }

    let declared = |field: &str, value: &Option<String>| -> Result<()> {
        match value {
            Some(name) if !op.parameters.is_empty() && !names.contains(name.as_str()) => {
                Err(Error::config(format!(
                    "Operation '{}' {field} '{name}' is not a declared parameter",
                    op.name
                )))
            }
            _ => Ok(()),
        }
    };
    declared("pass_thru_param", &op.pass_thru_param)?;
    declared("confirm_param", &op.confirm_param)?;

    if let Some(pagination) = &op.pagination {
        if pagination.input_token.is_empty() || pagination.output_token.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' pagination tokens cannot be empty",
                op.name
            )));
        }
    }

    Ok(())
}
