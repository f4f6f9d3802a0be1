use std::collections::BTreeMap;

use crate::models::DependencySpec;

/// Characters that would break a requirements line or leak into a shell
const FORBIDDEN_CHARS: &[char] = &[';', '`', '$', '|', '&', '\\', '#'];

/// Operators a version string may already start with (PEP 440)
const VERSION_OPERATORS: &[&str] = &["===", "==", ">=", "<=", "!=", "~=", ">", "<"];

impl DependencySpec {
    /// Render as a single `requirements.txt` line.
    ///
    /// A bare version is pinned with `==`; a version that already carries an
    /// operator is appended as-is.
    pub fn to_requirement_line(&self) -> String {
        let name = self.name.trim();
        let version = self.version.trim();
        if carries_operator(version) {
            format!("{}{}", name, version)
        } else {
            format!("{}=={}", name, version)
        }
    }
}

fn carries_operator(version: &str) -> bool {
    version.contains("==") || VERSION_OPERATORS.iter().any(|op| version.starts_with(op))
}

/// Check every dependency and collect one message per violation.
///
/// Returns an empty list when all entries are valid.
pub fn validate_dependencies(dependencies: &[DependencySpec]) -> Vec<String> {
    let mut errors = Vec::new();

    for (idx, dep) in dependencies.iter().enumerate() {
        let position = idx + 1;
        let name = dep.name.trim();
        let version = dep.version.trim();

        if name.is_empty() {
            errors.push(format!("Dependency {}: name cannot be empty", position));
        } else {
            if let Some(c) = find_forbidden(&dep.name) {
                errors.push(format!(
                    "Dependency {} ('{}'): name contains invalid character {:?}",
                    position, name, c
                ));
            }
            if name.chars().any(char::is_whitespace) {
                errors.push(format!(
                    "Dependency {} ('{}'): name cannot contain whitespace",
                    position, name
                ));
            }
        }

        if version.is_empty() {
            errors.push(format!(
                "Dependency {} ('{}'): version cannot be empty",
                position,
                display_name(name)
            ));
        } else if let Some(c) = find_forbidden(&dep.version) {
            errors.push(format!(
                "Dependency {} ('{}'): version contains invalid character {:?}",
                position,
                display_name(name),
                c
            ));
        }
    }

    errors
}

/// Check that every variable renders as exactly one `KEY=VALUE` line.
pub fn validate_environment_variables(variables: &BTreeMap<String, String>) -> Vec<String> {
    let mut errors = Vec::new();

    for (key, value) in variables {
        if key.trim().is_empty() {
            errors.push("Environment variable name cannot be empty".to_string());
        } else if key.chars().any(|c| c == '=' || c.is_whitespace() || c.is_control()) {
            errors.push(format!(
                "Environment variable {:?}: name cannot contain '=', whitespace or control characters",
                key
            ));
        }
        if value.chars().any(char::is_control) {
            errors.push(format!(
                "Environment variable {:?}: value cannot contain control characters",
                key
            ));
        }
    }

    errors
}

/// Run every request-level check; empty when the request can be built.
pub fn validate_request(request: &crate::models::PackageRequest) -> Vec<String> {
    let mut errors = validate_dependencies(&request.dependencies);
    errors.extend(validate_environment_variables(&request.environment_variables));
    errors
}

fn find_forbidden(value: &str) -> Option<char> {
    value
        .chars()
        .find(|c| c.is_control() || FORBIDDEN_CHARS.contains(c))
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "[empty]"
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_detection() {
        assert!(carries_operator("==1.0"));
        assert!(carries_operator("~=2.2"));
        assert!(carries_operator("<3"));
        assert!(carries_operator(">=1.0,==1.2"));
        assert!(!carries_operator("1.0.0"));
        assert!(!carries_operator("latest"));
    }

    #[test]
    fn test_forbidden_characters() {
        assert_eq!(find_forbidden("1.0; rm -rf /"), Some(';'));
        assert_eq!(find_forbidden("1.0\n"), Some('\n'));
        assert_eq!(find_forbidden("$(whoami)"), Some('$'));
        assert_eq!(find_forbidden(">=1.0,<2.0"), None);
    }
}
