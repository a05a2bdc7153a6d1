//! Rule requiring PUT, GET and PATCH on one path to return the same model.

use indexmap::IndexSet;
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError,
    RuleTarget,
};

/// Rule code for `PutGetPatchResponseSchema`.
pub const CODE: &str = "R3007";

/// Rule name for `PutGetPatchResponseSchema`.
pub const NAME: &str = "PutGetPatchResponseSchema";

const RESOURCE_VERBS: [&str; 3] = ["put", "get", "patch"];

/// Flags paths whose PUT/GET/PATCH 200 responses reference different models.
///
/// List operations (`*_List*` operation ids) are not compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct PutGetPatchResponseSchema;

impl PutGetPatchResponseSchema {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PutGetPatchResponseSchema {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "PUT, GET and PATCH on a resource path must return the same model"
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
        "'{0}' has different responses for PUT/GET/PATCH operations. The PUT/GET/PATCH operations must have the same schema response."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::Paths(paths) = node else {
            return Err(RuleError::unexpected(NodeKind::Paths, node));
        };
        let definitions = &ctx.root().definitions;

        Ok(paths
            .iter()
            .filter(|(_, item)| {
                let models: IndexSet<&str> = item
                    .operations
                    .iter()
                    .filter(|(verb, _)| RESOURCE_VERBS.iter().any(|v| verb.eq_ignore_ascii_case(v)))
                    .filter(|(_, op)| {
                        !op.operation_id
                            .as_deref()
                            .is_some_and(|id| id.to_lowercase().contains("_list"))
                    })
                    .filter_map(|(_, op)| op.response_model("200"))
                    .filter(|model| definitions.contains_key(*model))
                    .collect();
                models.len() > 1
            })
            .map(|(path, _)| Finding::at(ctx.path().append_property(path.as_str()), [path.as_str()]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, locations};

    #[test]
    fn test_flags_mismatched_responses() {
        let messages = check(
            PutGetPatchResponseSchema::new(),
            r##"{
                "paths": {
                    "/widgets/{name}": {
                        "get": { "operationId": "Widgets_Get", "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } },
                        "put": { "operationId": "Widgets_Create", "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } },
                        "patch": { "operationId": "Widgets_Update", "responses": { "200": { "schema": { "$ref": "#/definitions/WidgetPatch" } } } }
                    },
                    "/widgets": {
                        "get": { "operationId": "Widgets_List", "responses": { "200": { "schema": { "$ref": "#/definitions/WidgetList" } } } },
                        "put": { "operationId": "Widgets_CreateMany", "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } }
                    }
                },
                "definitions": { "Widget": {}, "WidgetPatch": {}, "WidgetList": {} }
            }"##,
        );
        assert_eq!(locations(&messages), ["$.paths['/widgets/{name}']"]);
    }
}
