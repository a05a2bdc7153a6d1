//! Rule checking the envelope returned by pageable list operations.
//!
//! # Rationale
//!
//! Pageable list responses are unwrapped by generated clients, which expect
//! the items in an array property named `value` (next to `nextLink`).

use openapi_lint_core::model::DataType;
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError,
    RuleTarget,
};
use regex::Regex;
use std::sync::LazyLock;

/// Rule code for `CollectionObjectPropertiesNaming`.
pub const CODE: &str = "R3008";

/// Rule name for `CollectionObjectPropertiesNaming`.
pub const NAME: &str = "CollectionObjectPropertiesNaming";

#[allow(clippy::expect_used)]
static LIST_OPERATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i).+_List([^_]*)$").expect("list operation pattern is valid")
});

/// Flags pageable list responses without a `value` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionObjectPropertiesNaming;

impl CollectionObjectPropertiesNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CollectionObjectPropertiesNaming {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Pageable list responses must hold their items in a 'value' array"
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

    fn category(&self) -> Category {
        Category::RpcViolation
    }

    fn message_template(&self) -> &'static str {
        "Collection object '{0}' returned by list operation '{1}' with 'x-ms-pageable' extension has no property named 'value' of type array."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::Paths(paths) = node else {
            return Err(RuleError::unexpected(NodeKind::Paths, node));
        };
        let definitions = &ctx.root().definitions;
        let mut findings = Vec::new();

        for (path, item) in paths {
            for (verb, op) in &item.operations {
                if !(verb.eq_ignore_ascii_case("get") || verb.eq_ignore_ascii_case("post")) {
                    continue;
                }
                let Some(operation_id) = op.operation_id.as_deref() else {
                    continue;
                };
                if !LIST_OPERATION_RE.is_match(operation_id) || !op.is_pageable() {
                    continue;
                }
                let Some((model, schema)) = op
                    .response_model("200")
                    .and_then(|m| definitions.get_key_value(m))
                else {
                    continue;
                };

                let has_value_array = schema
                    .properties
                    .get("value")
                    .is_some_and(|value| value.data_type == Some(DataType::Array));
                if schema.properties.len() <= 2 && !has_value_array {
                    findings.push(Finding::at(
                        ctx.path()
                            .append_property(path.as_str())
                            .append_property(verb.as_str())
                            .append_property("responses")
                            .append_property("200")
                            .append_property("schema"),
                        [model.as_str(), operation_id],
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
            "/widgets": {
                "get": {
                    "operationId": "Widgets_ListBySubscription",
                    "x-ms-pageable": { "nextLinkName": "nextLink" },
                    "responses": { "200": { "schema": { "$ref": "#/definitions/WidgetList" } } }
                }
            },
            "/gears": {
                "get": {
                    "operationId": "Gears_List",
                    "x-ms-pageable": { "nextLinkName": "nextLink" },
                    "responses": { "200": { "schema": { "$ref": "#/definitions/GearList" } } }
                }
            },
            "/things": {
                "get": {
                    "operationId": "Things_List",
                    "responses": { "200": { "schema": { "$ref": "#/definitions/WidgetList" } } }
                }
            }
        },
        "definitions": {
            "WidgetList": {
                "properties": { "items": { "type": "array" }, "nextLink": { "type": "string" } }
            },
            "GearList": {
                "properties": { "value": { "type": "array" }, "nextLink": { "type": "string" } }
            }
        }
    }"##;

    #[test]
    fn test_flags_missing_value_array() {
        let messages = check(CollectionObjectPropertiesNaming::new(), SERVICE);
        assert_eq!(
            locations(&messages),
            ["$.paths['/widgets'].get.responses['200'].schema"]
        );
        insta::assert_snapshot!(
            messages[0].message,
            @"Collection object 'WidgetList' returned by list operation 'Widgets_ListBySubscription' with 'x-ms-pageable' extension has no property named 'value' of type array."
        );
    }
}
