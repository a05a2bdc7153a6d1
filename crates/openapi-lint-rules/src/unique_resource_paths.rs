//! Rule requiring one resource provider and distinct resource paths.
//!
//! # Rationale
//!
//! A specification describes a single resource provider. Two path entries
//! that differ only in parameter names or letter case address the same
//! resource and cannot both be routed.

use indexmap::IndexMap;
use openapi_lint_core::utils::{normalize_resource_path, resource_providers};
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `UniqueResourcePaths`.
pub const CODE: &str = "R2059";

/// Rule name for `UniqueResourcePaths`.
pub const NAME: &str = "UniqueResourcePaths";

/// Flags path tables spanning several providers, and duplicate resource paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueResourcePaths;

impl UniqueResourcePaths {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UniqueResourcePaths {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Paths must belong to one resource provider and address distinct resources"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Field(&[FieldId::DOCUMENT_PATHS])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn category(&self) -> Category {
        Category::RpcViolation
    }

    fn message_template(&self) -> &'static str {
        "Resource paths must be unique and belong to a single resource provider: {0}."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::Paths(paths) = node else {
            return Err(RuleError::unexpected(NodeKind::Paths, node));
        };
        let mut findings = Vec::new();

        let providers = resource_providers(paths.keys().map(String::as_str));
        if providers.len() > 1 {
            findings.push(Finding::new([format!(
                "found providers '{}'",
                providers.join(", ")
            )]));
        }

        let mut groups: IndexMap<String, Vec<&str>> = IndexMap::new();
        for path in paths.keys() {
            groups
                .entry(normalize_resource_path(path))
                .or_default()
                .push(path);
        }
        for group in groups.values().filter(|g| g.len() > 1) {
            let quoted: Vec<String> = group.iter().map(|p| format!("'{p}'")).collect();
            for duplicate in &group[1..] {
                findings.push(Finding::at(
                    ctx.path().append_property(*duplicate),
                    [format!("{} address the same resource", quoted.join(" and "))],
                ));
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_duplicate_resource_paths() {
        let messages = check(
            UniqueResourcePaths::new(),
            r#"{ "paths": {
                "/subscriptions/{subscriptionId}/providers/Microsoft.Test/widgets/{widgetName}": {},
                "/subscriptions/{sub}/providers/Microsoft.Test/Widgets/{name}/": {}
            } }"#,
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(
            locations(&messages),
            ["$.paths['/subscriptions/{sub}/providers/Microsoft.Test/Widgets/{name}/']"]
        );
        insta::assert_snapshot!(
            messages[0].message,
            @"Resource paths must be unique and belong to a single resource provider: '/subscriptions/{subscriptionId}/providers/Microsoft.Test/widgets/{widgetName}' and '/subscriptions/{sub}/providers/Microsoft.Test/Widgets/{name}/' address the same resource."
        );
    }

    #[test]
    fn test_single_path_is_clean() {
        let messages = check(
            UniqueResourcePaths::new(),
            r#"{ "paths": {
                "/subscriptions/{subscriptionId}/providers/Microsoft.Test/widgets/{widgetName}": {}
            } }"#,
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_flags_multiple_providers_once() {
        let messages = check(
            UniqueResourcePaths::new(),
            r#"{ "paths": {
                "/subscriptions/{s}/providers/Microsoft.Test/widgets": {},
                "/subscriptions/{s}/providers/Microsoft.Other/gears": {},
                "/subscriptions/{s}/providers/microsoft.test/things": {}
            } }"#,
        );
        assert_eq!(locations(&messages), ["$.paths"]);
        assert!(messages[0]
            .message
            .contains("'Microsoft.Test, Microsoft.Other'"));
    }
}
