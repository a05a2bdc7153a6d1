//! Rule forbidding request bodies on DELETE operations.
//!
//! # Rationale
//!
//! Many proxies and HTTP clients drop the body of a DELETE request, so
//! whatever it carries never reaches the service.

use openapi_lint_core::{
    FieldId, Finding, Flavor, Node, NodeKind, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `DeleteMustNotHaveRequestBody`.
pub const CODE: &str = "R3013";

/// Rule name for `DeleteMustNotHaveRequestBody`.
pub const NAME: &str = "DeleteMustNotHaveRequestBody";

/// Flags body parameters of DELETE operations, including referenced ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteMustNotHaveRequestBody;

impl DeleteMustNotHaveRequestBody {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DeleteMustNotHaveRequestBody {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "DELETE operations must not declare a body parameter"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Collection {
            fields: &[FieldId::DOCUMENT_PATHS],
            kind: NodeKind::PathItem,
        }
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM | Flavor::DATA_PLANE
    }

    fn message_template(&self) -> &'static str {
        "'Delete' operation '{0}' must not have a request body."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::PathItem(item) = node else {
            return Err(RuleError::unexpected(NodeKind::PathItem, node));
        };
        let doc = ctx.root();
        let mut findings = Vec::new();

        for (verb, op) in item
            .operations
            .iter()
            .filter(|(verb, _)| verb.eq_ignore_ascii_case("delete"))
        {
            for (index, param) in op.parameters.iter().enumerate() {
                if doc.resolve_parameter(param).is_body() {
                    findings.push(Finding::at(
                        ctx.path()
                            .append_property(verb.as_str())
                            .append_property("parameters")
                            .append_index(index),
                        [op.operation_id.as_deref().unwrap_or_default()],
                    ));
                }
            }
        }

        Ok(findings)
    }
}
