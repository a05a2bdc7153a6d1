//! Rule requiring a PATCH operation for every tracked resource.
//!
//! # Rationale
//!
//! Tracked resources carry tags, and tags are updated with PATCH. A tracked
//! resource no PATCH operation returns cannot have its tags changed in place.

use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
};
use std::collections::HashSet;

/// Rule code for `TrackedResourcePatchOperation`.
pub const CODE: &str = "R3026";

/// Rule name for `TrackedResourcePatchOperation`.
pub const NAME: &str = "TrackedResourcePatchOperation";

/// Flags tracked resource models returned by no PATCH operation (200 or 201).
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedResourcePatchOperation;

impl TrackedResourcePatchOperation {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TrackedResourcePatchOperation {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Tracked resources must have a PATCH operation"
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
        "Tracked resource '{0}' must have patch operation that at least supports the update of tags."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        if !matches!(node, Node::SchemaMap(_)) {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        }
        let returned: HashSet<&str> = ctx
            .root()
            .operations_by_verb("patch")
            .flat_map(|(_, op)| ["200", "201"].into_iter().filter_map(move |s| op.response_model(s)))
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
    fn test_accepts_patch_returning_201() {
        let messages = check(
            TrackedResourcePatchOperation::new(),
            r##"{
                "paths": {
                    "/subscriptions/{s}/providers/Microsoft.Test/widgets/{name}": {
                        "put": { "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } },
                        "patch": { "responses": { "201": { "schema": { "$ref": "#/definitions/Widget" } } } }
                    },
                    "/subscriptions/{s}/providers/Microsoft.Test/gears/{name}": {
                        "put": { "responses": { "200": { "schema": { "$ref": "#/definitions/Gear" } } } }
                    }
                },
                "definitions": {
                    "Widget": { "required": ["location"], "properties": { "location": { "type": "string" } } },
                    "Gear": { "required": ["location"], "properties": { "location": { "type": "string" } } }
                }
            }"##,
        );
        assert_eq!(locations(&messages), ["$.definitions.Gear"]);
    }
}
