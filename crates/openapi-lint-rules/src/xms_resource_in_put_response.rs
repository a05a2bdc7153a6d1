//! Rule requiring PUT responses to be marked as resources.
//!
//! # Rationale
//!
//! The model a PUT returns is the resource itself, so somewhere in its
//! hierarchy a model must carry `x-ms-azure-resource: true`.

use openapi_lint_core::utils::{model_hierarchy, xms_azure_resource_models};
use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError,
    RuleTarget,
};
use std::collections::HashSet;

/// Rule code for `XmsResourceInPutResponse`.
pub const CODE: &str = "R2062";

/// Rule name for `XmsResourceInPutResponse`.
pub const NAME: &str = "XmsResourceInPutResponse";

/// Flags PUT 200 response models with no `x-ms-azure-resource` in their hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmsResourceInPutResponse;

impl XmsResourceInPutResponse {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for XmsResourceInPutResponse {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "PUT response models must derive from a model marked x-ms-azure-resource"
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
        "The 200 response model for an ARM PUT operation must have x-ms-azure-resource set to true in its hierarchy. Operation: '{0}' Model: '{1}'."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::Paths(paths) = node else {
            return Err(RuleError::unexpected(NodeKind::Paths, node));
        };
        let definitions = &ctx.root().definitions;
        let marked: HashSet<&str> = xms_azure_resource_models(definitions).into_iter().collect();
        let mut findings = Vec::new();

        for (path, item) in paths {
            for (verb, op) in &item.operations {
                if !verb.eq_ignore_ascii_case("put") {
                    continue;
                }
                let Some(model) = op
                    .response_model("200")
                    .filter(|m| definitions.contains_key(*m))
                else {
                    continue;
                };
                if model_hierarchy(model, definitions)
                    .iter()
                    .any(|m| marked.contains(m))
                {
                    continue;
                }
                findings.push(Finding::at(
                    ctx.path().append_property(path.as_str()).append_property(verb.as_str()),
                    [op.operation_id.as_deref().unwrap_or_default(), model],
                ));
            }
        }

        Ok(findings)
    }
}
