//! Rule validating the shape of `Sku` models.
//!
//! # Rationale
//!
//! Resource-manager tooling understands a fixed Sku shape: a string `name`,
//! optionally `tier`, `size`, `family` and `capacity`. Anything else breaks
//! generic Sku handling.

use indexmap::IndexMap;
use openapi_lint_core::model::{DataType, Schema};
use openapi_lint_core::utils::is_reference_of_type;
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError,
    RuleTarget, Severity,
};
use regex::Regex;
use std::sync::LazyLock;

/// Rule code for `InvalidSkuModel`.
pub const CODE: &str = "R2057";

/// Rule name for `InvalidSkuModel`.
pub const NAME: &str = "InvalidSkuModel";

#[allow(clippy::expect_used)]
static SKU_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(NAME|TIER|SIZE|FAMILY|CAPACITY)$").expect("sku property pattern is valid")
});

/// Checks models named `sku` (any case) against the standard Sku shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidSkuModel;

impl InvalidSkuModel {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_valid_sku(sku: &Schema, definitions: &IndexMap<String, Schema>) -> bool {
        let whitelisted = sku.properties.keys().all(|p| SKU_PROPERTY_RE.is_match(p));
        let has_string_name = sku.properties.get("name").is_some_and(|name| {
            name.data_type == Some(DataType::String)
                || name
                    .reference
                    .as_deref()
                    .is_some_and(|r| is_reference_of_type(r, definitions, DataType::String))
        });
        whitelisted && has_string_name
    }
}

impl Rule for InvalidSkuModel {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Sku models must have a string name and only the standard optional properties"
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

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> Category {
        Category::RpcViolation
    }

    fn message_template(&self) -> &'static str {
        "Sku model '{0}' is not valid. A Sku model must have a 'name' property of type string and may only add 'tier', 'size', 'family' and 'capacity'."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::SchemaMap(definitions) = node else {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        };

        Ok(definitions
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("sku"))
            .filter(|(_, sku)| !Self::is_valid_sku(sku, definitions))
            .map(|(name, _)| Finding::at(ctx.path().append_property(name.as_str()), [name.as_str()]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    fn check_sku(sku: &str) -> Vec<openapi_lint_core::ValidationMessage> {
        check(
            InvalidSkuModel::new(),
            &format!(
                r#"{{ "definitions": {{ "Sku": {sku}, "SkuName": {{ "type": "string" }} }} }}"#
            ),
        )
    }

    #[test]
    fn test_flags_extra_property() {
        let messages = check_sku(
            r#"{ "properties": {
                "name": { "type": "string" },
                "tier": { "type": "string" },
                "extra": { "type": "integer" }
            } }"#,
        );
        assert_eq!(messages.len(), 1);
        assert_eq!(locations(&messages), ["$.definitions.Sku"]);
        assert!(messages[0].message.contains("'Sku'"));
    }

    #[test]
    fn test_requires_string_name() {
        assert_eq!(check_sku(r#"{ "properties": { "tier": { "type": "string" } } }"#).len(), 1);
        assert_eq!(
            check_sku(r#"{ "properties": { "name": { "type": "integer" } } }"#).len(),
            1
        );
    }

    #[test]
    fn test_accepts_standard_shapes() {
        assert!(check_sku(
            r#"{ "properties": {
                "name": { "type": "string" },
                "Capacity": { "type": "integer" },
                "family": { "type": "string" }
            } }"#
        )
        .is_empty());
        assert!(check_sku(r##"{ "properties": { "name": { "$ref": "#/definitions/SkuName" } } }"##).is_empty());
    }
}
