//! Rule checking PATCH request body models.
//!
//! # Rationale
//!
//! A PATCH body carries only the properties a client wants to change. A
//! required property forces every update to resend it, and a default value
//! silently resets whatever the client left out.

use openapi_lint_core::utils::{default_valued_properties, required_properties};
use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `PatchBodyParametersSchema`.
pub const CODE: &str = "R2016";

/// Rule name for `PatchBodyParametersSchema`.
pub const NAME: &str = "PatchBodyParametersSchema";

/// Forbids required and default-valued properties in PATCH body models.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchBodyParametersSchema;

impl PatchBodyParametersSchema {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PatchBodyParametersSchema {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "PATCH body models must not have required or default-valued properties"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Field(&[FieldId::DOCUMENT_DEFINITIONS])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn message_template(&self) -> &'static str {
        "Properties of a PATCH request body must not be {0}. PATCH operation: '{1}' Model Definition: '{2}' Property: '{3}'"
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::SchemaMap(definitions) = node else {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        };
        let doc = ctx.root();
        let mut findings = Vec::new();

        for (_, op) in doc.operations_by_verb("patch") {
            let operation_id = op.operation_id.as_deref().unwrap_or_default();
            let body_models = op
                .parameters
                .iter()
                .map(|p| doc.resolve_parameter(p))
                .filter(|p| p.is_body())
                .filter_map(|p| p.schema.as_ref()?.reference_name())
                .filter(|model| definitions.contains_key(*model));

            for model in body_models {
                for property in required_properties(model, definitions) {
                    findings.push(Finding::at(
                        ctx.path().append_property(model).append_property("required"),
                        ["required", operation_id, model, property],
                    ));
                }
                for (declaring, property) in default_valued_properties(model, definitions) {
                    findings.push(Finding::at(
                        ctx.path()
                            .append_property(declaring)
                            .append_property("properties")
                            .append_property(property),
                        ["default-valued", operation_id, model, property],
                    ));
                }
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    const SERVICE: &str = r##"{
        "paths": {
            "/widgets/{name}": {
                "patch": {
                    "operationId": "Widgets_Update",
                    "parameters": [{ "$ref": "#/parameters/WidgetUpdate" }]
                },
                "put": {
                    "operationId": "Widgets_Create",
                    "parameters": [{ "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Widget" } }]
                }
            }
        },
        "parameters": {
            "WidgetUpdate": { "name": "body", "in": "body", "schema": { "$ref": "#/definitions/WidgetPatch" } }
        },
        "definitions": {
            "Widget": { "required": ["location"], "properties": { "location": { "type": "string" } } },
            "PatchBase": { "properties": { "size": { "type": "integer", "default": 3 } } },
            "WidgetPatch": {
                "allOf": [{ "$ref": "#/definitions/PatchBase" }],
                "required": ["color"],
                "properties": { "color": { "type": "string" } }
            }
        }
    }"##;

    #[test]
    fn test_flags_required_and_default_valued_properties() {
        let messages = check(PatchBodyParametersSchema::new(), SERVICE);
        assert_eq!(
            locations(&messages),
            [
                "$.definitions.WidgetPatch.required",
                "$.definitions.PatchBase.properties.size",
            ]
        );
        insta::assert_snapshot!(
            messages[0].message,
            @"Properties of a PATCH request body must not be required. PATCH operation: 'Widgets_Update' Model Definition: 'WidgetPatch' Property: 'color'"
        );
    }

    #[test]
    fn test_ignores_non_patch_bodies() {
        let messages = check(
            PatchBodyParametersSchema::new(),
            r##"{
                "paths": { "/w": { "put": { "parameters": [{ "name": "b", "in": "body", "schema": { "$ref": "#/definitions/W" } }] } } },
                "definitions": { "W": { "required": ["x"] } }
            }"##,
        );
        assert!(messages.is_empty());
    }
}
