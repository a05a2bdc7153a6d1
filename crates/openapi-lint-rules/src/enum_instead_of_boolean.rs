//! Rule discouraging boolean properties and parameters.
//!
//! # Rationale
//!
//! A boolean cannot grow a third state. String enums with a defined set of
//! values can evolve without a breaking change.

use openapi_lint_core::model::DataType;
use openapi_lint_core::{
    Category, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
    Severity,
};

/// Rule code for `EnumInsteadOfBoolean`.
pub const CODE: &str = "R3018";

/// Rule name for `EnumInsteadOfBoolean`.
pub const NAME: &str = "EnumInsteadOfBoolean";

/// Flags boolean schemas and boolean parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumInsteadOfBoolean;

impl EnumInsteadOfBoolean {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for EnumInsteadOfBoolean {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Prefer string enums over booleans"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Kind(&[NodeKind::Schema, NodeKind::Parameter])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn pass_mode(&self) -> PassMode {
        PassMode::Composed
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> Category {
        Category::RpcViolation
    }

    fn message_template(&self) -> &'static str {
        "Booleans are not descriptive and make them hard to use. Consider using string enums with an allowed set of values instead of '{0}'."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let boolean = Some(DataType::Boolean);
        let finding = match node {
            // A boolean property is reported where it is declared, under its own key.
            Node::Schema(schema) if schema.data_type == boolean => {
                Some(Finding::new([ctx.key().unwrap_or_default()]))
            }
            Node::Schema(_) => None,
            Node::Parameter(param)
                if param.data_type == boolean
                    || param.schema.as_ref().is_some_and(|s| s.data_type == boolean) =>
            {
                Some(Finding::at(
                    ctx.path().append_property("name"),
                    [param.name.as_deref().unwrap_or_default()],
                ))
            }
            Node::Parameter(_) => None,
            _ => return Err(RuleError::unexpected(NodeKind::Schema, node)),
        };
        Ok(finding.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_boolean_properties_and_parameters() {
        let messages = check(
            EnumInsteadOfBoolean::new(),
            r#"{
                "paths": {
                    "/widgets": {
                        "get": {
                            "parameters": [
                                { "name": "includeDeleted", "in": "query", "type": "boolean" },
                                { "name": "top", "in": "query", "type": "integer" }
                            ]
                        }
                    }
                },
                "definitions": {
                    "Widget": {
                        "properties": {
                            "enabled": { "type": "boolean" },
                            "color": { "type": "string" }
                        }
                    }
                }
            }"#,
        );
        assert_eq!(
            locations(&messages),
            [
                "$.paths['/widgets'].get.parameters[0].name",
                "$.definitions.Widget.properties.enabled",
            ]
        );
        assert!(messages[1].message.contains("'enabled'"));
    }

    #[test]
    fn test_flags_boolean_inside_dictionary_values() {
        let messages = check(
            EnumInsteadOfBoolean::new(),
            r#"{
                "definitions": {
                    "Labels": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "object",
                            "properties": { "enabled": { "type": "boolean" } }
                        }
                    }
                }
            }"#,
        );
        assert_eq!(
            locations(&messages),
            ["$.definitions.Labels.additionalProperties.properties.enabled"]
        );
    }
}
