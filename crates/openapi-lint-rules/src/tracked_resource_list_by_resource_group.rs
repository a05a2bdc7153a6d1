//! Rule requiring a list-by-resource-group operation for top-level tracked resources.

use openapi_lint_core::model::{DataType, ServiceDefinition};
use openapi_lint_core::utils::resource_paths::is_resource_group_scoped;
use openapi_lint_core::utils::ResourcePath;
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError,
    RuleTarget, Severity,
};
use tracing::debug;

/// Rule code for `TrackedResourceListByResourceGroup`.
pub const CODE: &str = "R3027";

/// Rule name for `TrackedResourceListByResourceGroup`.
pub const NAME: &str = "TrackedResourceListByResourceGroup";

/// Flags parent tracked resources, other than tenant resources, that cannot be
/// listed within a resource group.
///
/// A list-by-resource-group operation is a GET on a resource-group scoped
/// collection path whose 200 model holds the resource in a `value` array.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedResourceListByResourceGroup;

impl TrackedResourceListByResourceGroup {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn has_list_by_resource_group(doc: &ServiceDefinition, model: &str) -> bool {
    doc.operations_by_verb("get")
        .filter(|(path, _)| {
            is_resource_group_scoped(path)
                && ResourcePath::parse(path).is_some_and(|p| p.is_collection())
        })
        .filter_map(|(_, op)| doc.definitions.get(op.response_model("200")?))
        .filter_map(|list| list.properties.get("value"))
        .any(|value| {
            value.data_type == Some(DataType::Array)
                && value
                    .items
                    .as_ref()
                    .and_then(|items| items.reference_name())
                    == Some(model)
        })
}

impl Rule for TrackedResourceListByResourceGroup {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Top-level tracked resources must be listable by resource group"
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
        "The tracked resource '{0}' must have a list by resource group operation."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        if !matches!(node, Node::SchemaMap(_)) {
            return Err(RuleError::unexpected(NodeKind::SchemaMap, node));
        }
        let facts = ctx.facts();
        let tenant = facts.tenant_resource_models();

        let mut findings = Vec::new();
        for model in facts.parent_tracked_resource_models() {
            if tenant.contains(model) {
                debug!("Skipping tenant resource {}", model);
                continue;
            }
            if !has_list_by_resource_group(ctx.root(), model) {
                findings.push(Finding::at(
                    ctx.path().append_property(model.as_str()),
                    [model.as_str()],
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

    const TRACKED: &str = r#"{ "required": ["location"], "properties": { "location": { "type": "string" } } }"#;

    fn service(list_path: &str) -> String {
        format!(
            r##"{{
                "paths": {{
                    "/subscriptions/{{s}}/resourceGroups/{{rg}}/providers/Microsoft.Test/widgets/{{name}}": {{
                        "put": {{ "responses": {{ "200": {{ "schema": {{ "$ref": "#/definitions/Widget" }} }} }} }}
                    }},
                    "/providers/Microsoft.Test/tenants/{{name}}": {{
                        "put": {{ "responses": {{ "200": {{ "schema": {{ "$ref": "#/definitions/TenantThing" }} }} }} }}
                    }},
                    "{list_path}": {{
                        "get": {{ "responses": {{ "200": {{ "schema": {{ "$ref": "#/definitions/WidgetList" }} }} }} }}
                    }}
                }},
                "definitions": {{
                    "Widget": {TRACKED},
                    "TenantThing": {TRACKED},
                    "WidgetList": {{
                        "properties": {{ "value": {{ "type": "array", "items": {{ "$ref": "#/definitions/Widget" }} }} }}
                    }}
                }}
            }}"##
        )
    }

    #[test]
    fn test_accepts_resource_group_list() {
        let messages = check(
            TrackedResourceListByResourceGroup::new(),
            &service("/subscriptions/{s}/resourceGroups/{rg}/providers/Microsoft.Test/widgets"),
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_flags_subscription_only_list() {
        let messages = check(
            TrackedResourceListByResourceGroup::new(),
            &service("/subscriptions/{s}/providers/Microsoft.Test/widgets"),
        );
        assert_eq!(locations(&messages), ["$.definitions.Widget"]);
    }
}
