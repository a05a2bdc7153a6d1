//! Rule requiring a GET operation for every tracked resource.

use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
};
use std::collections::HashSet;

/// Rule code for `TrackedResourceGetOperation`.
pub const CODE: &str = "R3025";

/// Rule name for `TrackedResourceGetOperation`.
pub const NAME: &str = "TrackedResourceGetOperation";

/// Flags tracked resource models no GET operation returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedResourceGetOperation;

impl TrackedResourceGetOperation {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TrackedResourceGetOperation {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Tracked resources must have a GET operation"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Field(&[FieldId::DOCUMENT_DEFINITIONS])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn pass_mode(&self) -> PassMode {
        PassMode::Composed
    }

    fn message_template(&self) -> &'static str {
        "Tracked resource '{0}' must have a get operation."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        if !matches!(node, Node::SchemaMap(_)) {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        }
        let returned: HashSet<&str> = ctx
            .root()
            .operations_by_verb("get")
            .filter_map(|(_, op)| op.response_model("200"))
            .collect();

        Ok(ctx
            .facts()
            .tracked_resource_models()
            .iter()
            .filter(|model| !returned.contains(model.as_str()))
            .map(|model| Finding::at(ctx.path().append_property(model.as_str()), [model.as_str()]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_tracked_resource_without_get() {
        let messages = check(
            TrackedResourceGetOperation::new(),
            r##"{
                "paths": {
                    "/subscriptions/{s}/providers/Microsoft.Test/widgets/{name}": {
                        "put": { "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } }
                    },
                    "/subscriptions/{s}/providers/Microsoft.Test/gears/{name}": {
                        "put": { "responses": { "200": { "schema": { "$ref": "#/definitions/Gear" } } } },
                        "get": { "responses": { "200": { "schema": { "$ref": "#/definitions/Gear" } } } }
                    }
                },
                "definitions": {
                    "Widget": { "required": ["location"], "properties": { "location": { "type": "string" } } },
                    "Gear": { "required": ["location"], "properties": { "location": { "type": "string" } } }
                }
            }"##,
        );
        assert_eq!(locations(&messages), ["$.definitions.Widget"]);
        assert_eq!(
            messages[0].message,
            "Tracked resource 'Widget' must have a get operation."
        );
    }
}
