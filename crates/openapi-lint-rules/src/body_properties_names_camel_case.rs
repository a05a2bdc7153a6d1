//! Rule requiring camelCase property names in request bodies.
//!
//! # Rationale
//!
//! JSON payloads across Azure services use camelCase names. OData control
//! properties (`@odata.*`) are exempt.

use openapi_lint_core::utils::{camel_case_suggestion, is_camel_case, is_odata_property};
use openapi_lint_core::{
    FieldId, Finding, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `BodyPropertiesNamesCamelCase`.
pub const CODE: &str = "R3014";

/// Rule name for `BodyPropertiesNamesCamelCase`.
pub const NAME: &str = "BodyPropertiesNamesCamelCase";

/// Flags inline body schema properties whose names are not camelCase.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyPropertiesNamesCamelCase;

impl BodyPropertiesNamesCamelCase {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BodyPropertiesNamesCamelCase {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Body parameter property names must be camelCase"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Collection {
            fields: &[FieldId::DOCUMENT_PATHS],
            kind: NodeKind::PathItem,
        }
    }

    fn pass_mode(&self) -> PassMode {
        PassMode::Composed
    }

    fn message_template(&self) -> &'static str {
        "Property named '{0}' of the request body must be camelCase. Consider '{1}'."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::PathItem(item) = node else {
            return Err(RuleError::unexpected(NodeKind::PathItem, node));
        };
        let doc = ctx.root();
        let mut findings = Vec::new();

        for (verb, op) in &item.operations {
            for (index, param) in op.parameters.iter().enumerate() {
                let param = doc.resolve_parameter(param);
                let Some(schema) = param.schema.as_deref().filter(|_| param.is_body()) else {
                    continue;
                };
                for property in schema.properties.keys() {
                    if is_camel_case(property) || is_odata_property(property) {
                        continue;
                    }
                    findings.push(Finding::at(
                        ctx.path()
                            .append_property(verb.as_str())
                            .append_property("parameters")
                            .append_index(index)
                            .append_property("schema")
                            .append_property("properties")
                            .append_property(property.as_str()),
                        [property.clone(), camel_case_suggestion(property)],
                    ));
                }
            }
        }

        Ok(findings)
    }
}
