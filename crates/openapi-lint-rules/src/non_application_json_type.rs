//! Rule flagging media types other than `application/json`.
//!
//! # Rationale
//!
//! Resource-manager services exchange JSON. Any other entry in a `consumes`
//! or `produces` list, at document or operation level, is worth a second look.

use openapi_lint_core::{
    Category, FieldId, Finding, Flavor, Node, NodeKind, Rule, RuleContext, RuleError, RuleTarget,
    Severity,
};

/// Rule code for `NonApplicationJsonType`.
pub const CODE: &str = "R2004";

/// Rule name for `NonApplicationJsonType`.
pub const NAME: &str = "NonApplicationJsonType";

const MEDIA_TYPE_FIELDS: &[FieldId] = &[
    FieldId::DOCUMENT_CONSUMES,
    FieldId::DOCUMENT_PRODUCES,
    FieldId::OPERATION_CONSUMES,
    FieldId::OPERATION_PRODUCES,
];

/// Flags `consumes`/`produces` entries that are not `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonApplicationJsonType;

impl NonApplicationJsonType {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NonApplicationJsonType {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Media types other than application/json need justification"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Collection {
            fields: MEDIA_TYPE_FIELDS,
            kind: NodeKind::String,
        }
    }

    fn flavor(&self) -> Flavor {
        Flavor::ARM
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> Category {
        Category::RpcViolation
    }

    fn message_template(&self) -> &'static str {
        "Only 'application/json' is supported by ARM; '{0}' must be justified by the service."
    }

    fn check(&self, node: Node<'_>, _ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let Node::String(media_type) = node else {
            return Err(RuleError::unexpected(NodeKind::String, node));
        };
        if media_type.to_lowercase().starts_with("application/json") {
            Ok(Vec::new())
        } else {
            Ok(vec![Finding::new([media_type])])
        }
    }
}
