//! Rule discouraging GUID-formatted strings in models.
//!
//! # Rationale
//!
//! Identifiers exposed as `format: uuid` tie clients to one representation.
//! Services that genuinely need GUIDs should get that signed off explicitly.

use openapi_lint_core::model::{DataType, Schema};
use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, ObjectPath, PassMode, Rule, RuleContext, RuleError,
    RuleTarget, Severity,
};

/// Rule code for `GuidUsage`.
pub const CODE: &str = "R3017";

/// Rule name for `GuidUsage`.
pub const NAME: &str = "GuidUsage";

/// Flags the first `string`/`uuid` property found in each definition.
///
/// Inline object properties are searched recursively. Referenced models are
/// checked as definitions of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidUsage;

impl GuidUsage {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_guid(schema: &Schema) -> bool {
    schema.data_type == Some(DataType::String)
        && schema
            .format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("uuid"))
}

/// Path and name of the first GUID at or below `schema`.
fn find_guid<'s>(schema: &'s Schema, name: &'s str, path: ObjectPath) -> Option<(ObjectPath, &'s str)> {
    if is_guid(schema) {
        return Some((path, name));
    }
    if !schema.is_composite() {
        return None;
    }
    schema.properties.iter().find_map(|(prop, prop_schema)| {
        find_guid(
            prop_schema,
            prop,
            path.append_property("properties").append_property(prop.as_str()),
        )
    })
}

impl Rule for GuidUsage {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Use of string/uuid properties is discouraged"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Field(&[FieldId::DOCUMENT_DEFINITIONS])
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM | Flavor::DATA_PLANE
    }

    fn pass_mode(&self) -> PassMode {
        PassMode::Composed
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn message_template(&self) -> &'static str {
        "Guid used in model definition '{1}' for property '{0}'. Usage of Guid is not recommended. If GUIDs are absolutely required in your service, please get sign off from the Azure API review board."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::SchemaMap(definitions) = node else {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        };

        Ok(definitions
            .iter()
            .filter_map(|(model, schema)| {
                let (path, property) =
                    find_guid(schema, model, ctx.path().append_property(model.as_str()))?;
                Some(Finding::at(path, [property, model.as_str()]))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_nested_guid_once_per_definition() {
        let messages = check(
            GuidUsage::new(),
            r#"{
                "definitions": {
                    "Widget": {
                        "properties": {
                            "name": { "type": "string" },
                            "owner": {
                                "type": "object",
                                "properties": {
                                    "tenantId": { "type": "string", "format": "UUID" },
                                    "objectId": { "type": "string", "format": "uuid" }
                                }
                            }
                        }
                    },
                    "Gear": { "properties": { "id": { "type": "string", "format": "uri" } } },
                    "CorrelationId": { "type": "string", "format": "uuid" }
                }
            }"#,
        );
        assert_eq!(
            locations(&messages),
            [
                "$.definitions.Widget.properties.owner.properties.tenantId",
                "$.definitions.CorrelationId",
            ]
        );
        assert!(messages[0].message.contains("'Widget' for property 'tenantId'"));
    }
}
