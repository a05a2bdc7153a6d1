//! Rule flagging descriptions that merely repeat a name.

use openapi_lint_core::{
    Category, Finding, Flavor, Node, NodeKind, PassMode, Rule, RuleContext, RuleError, RuleTarget,
};

/// Rule code for `DescriptionMustNotBeNodeName`.
pub const CODE: &str = "R3011";

/// Rule name for `DescriptionMustNotBeNodeName`.
pub const NAME: &str = "DescriptionMustNotBeNodeName";

/// Flags descriptions equal to the node's key, its name, or the word "description".
///
/// Applies to operations, parameters, schemas and responses, and to the
/// document `info` (named by its `title`) and tags. Both sides of the
/// comparison ignore surrounding whitespace, periods and case.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionMustNotBeNodeName;

impl DescriptionMustNotBeNodeName {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn trim_description(text: &str) -> String {
    text.trim().replace('.', "").to_lowercase()
}

impl Rule for DescriptionMustNotBeNodeName {
    fn id(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Descriptions must say more than the name of what they describe"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Kind(&[
            NodeKind::Operation,
            NodeKind::Parameter,
            NodeKind::Schema,
            NodeKind::Response,
            NodeKind::Info,
            NodeKind::Tag,
        ])
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
        "The description '{0}' is not descriptive enough. Accurate and descriptive descriptions are essential for maintaining reference documentation."
    }

    fn check(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let (description, name) = match node {
            Node::Operation(op) => (op.description.as_deref(), None),
            Node::Parameter(param) => (param.description.as_deref(), param.name.as_deref()),
            Node::Schema(schema) => (schema.description.as_deref(), None),
            Node::Response(response) => (response.description.as_deref(), None),
            Node::Info(info) => (info.description.as_deref(), info.title.as_deref()),
            Node::Tag(tag) => (tag.description.as_deref(), tag.name.as_deref()),
            _ => return Err(RuleError::unexpected(NodeKind::Schema, node)),
        };
        let Some(description) = description else {
            return Ok(Vec::new());
        };

        let trimmed = trim_description(description);
        let repeats_name = [name, ctx.key(), Some("description")]
            .into_iter()
            .flatten()
            .any(|n| trim_description(n) == trimmed);

        Ok(if repeats_name {
            vec![Finding::at(
                ctx.path().append_property("description"),
                [description],
            )]
        } else {
            Vec::new()
        })
    }
}
