//! Rule requiring the provider operations API.

use openapi_lint_core::utils::resource_providers;
use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `OperationsApiImplementation`.
pub const CODE: &str = "R3023";

/// Rule name for `OperationsApiImplementation`.
pub const NAME: &str = "OperationsApiImplementation";

/// Requires a `/providers/{Namespace}/operations` path for the first provider found.
///
/// Only one provider is checked; [`crate::UniqueResourcePaths`] reports
/// specifications spanning several.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationsApiImplementation;

impl OperationsApiImplementation {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for OperationsApiImplementation {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Resource providers must expose the operations API"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Field(&[FieldId::DOCUMENT_PATHS])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn pass_mode(&self) -> PassMode {
        PassMode::Composed
    }

    fn message_template(&self) -> &'static str {
        "Operations API must be implemented for '{0}'."
    }

    fn check(&self, node: Node<'_>, _ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::Paths(paths) = node else {
            return Err(RuleError::unexpected(NodeKind::Paths, node));
        };
        let provider = resource_providers(paths.keys().map(String::as_str))
            .first()
            .copied()
            .unwrap_or_default();
        let operations_path = format!("/providers/{provider}/operations");

        let implemented = paths
            .keys()
            .map(|path| path.trim())
            .filter(|path| path.to_lowercase().ends_with("/operations"))
            .any(|path| path.ends_with(&operations_path));

        Ok(if implemented {
            Vec::new()
        } else {
            vec![Finding::new([operations_path])]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_missing_operations_api() {
        let messages = check(
            OperationsApiImplementation::new(),
            r#"{ "paths": {
                "/subscriptions/{s}/providers/Microsoft.Test/widgets": {}
            } }"#,
        );
        assert_eq!(locations(&messages), ["$.paths"]);
        insta::assert_snapshot!(
            messages[0].message,
            @"Operations API must be implemented for '/providers/Microsoft.Test/operations'."
        );
    }

    #[test]
    fn test_accepts_operations_api() {
        let messages = check(
            OperationsApiImplementation::new(),
            r#"{ "paths": {
                "/subscriptions/{s}/providers/Microsoft.Test/widgets": {},
                "/providers/Microsoft.Test/operations": {}
            } }"#,
        );
        assert!(messages.is_empty());
    }
}
