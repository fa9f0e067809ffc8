//! Built-in service definitions embedded in the binary
//!
//! This module embeds the bundled service YAML files directly into the binary,
//! allowing users to use `--service ec2` instead of specifying a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in service YAML definitions
pub static BUILTIN_SERVICES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // Monitoring
        m.insert("cloudwatch", include_str!("../services/cloudwatch.yaml"));
        m.insert("cw", include_str!("../services/cloudwatch.yaml"));

        // Compute and recovery
        m.insert("ec2", include_str!("../services/ec2.yaml"));
        m.insert("drs", include_str!("../services/drs.yaml"));

        // Provisioning
        m.insert(
            "cloudformation",
            include_str!("../services/cloudformation.yaml"),
        );
        m.insert("cfn", include_str!("../services/cloudformation.yaml"));

        // Security
        m.insert(
            "secretsmanager",
            include_str!("../services/secretsmanager.yaml"),
        );
        m.insert("sec", include_str!("../services/secretsmanager.yaml"));

        m
    });

/// Get a built-in service by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SERVICES.get(name.to_lowercase().as_str()).copied()
}

/// Check if a name is a built-in service
pub fn is_builtin(name: &str) -> bool {
    get_builtin(name).is_some()
}

/// List all built-in service names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["cloudformation", "cloudwatch", "drs", "ec2", "secretsmanager"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_service_from_str;

    #[test]
    fn test_builtin_services_exist() {
        for name in list_builtin() {
            assert!(get_builtin(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_aliases_work() {
        assert_eq!(get_builtin("cw"), get_builtin("cloudwatch"));
        assert_eq!(get_builtin("cfn"), get_builtin("cloudformation"));
        assert_eq!(get_builtin("sec"), get_builtin("secretsmanager"));
        assert!(is_builtin("EC2"));
    }

    #[test]
    fn test_unknown_service() {
        assert!(get_builtin("unknown").is_none());
    }

    #[test]
    fn test_builtin_definitions_parse() {
        for name in list_builtin() {
            let yaml = get_builtin(name).unwrap();
            let def = load_service_from_str(yaml)
                .unwrap_or_else(|e| panic!("{name} failed to load: {e}"));
            assert_eq!(def.name, name);
        }
    }
}
