//! The contract every validation rule implements.

use crate::context::RuleContext;
use crate::metadata::{Flavor, PassMode};
use crate::model::{FieldId, Node, NodeKind};
use crate::path::ObjectPath;
use crate::types::{Category, Severity};
use thiserror::Error;

/// Where in the document a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    /// Every visited node of one of these kinds.
    Kind(&'static [NodeKind]),
    /// The value of one of these record fields, before the field is traversed.
    Field(&'static [FieldId]),
    /// Nodes of `kind` inside the collection held by one of these fields.
    ///
    /// The rule is threaded down from the field and stops at the next record
    /// boundary, so it sees e.g. each path item of `paths` but nothing deeper.
    Collection {
        /// Fields that hold the collection.
        fields: &'static [FieldId],
        /// Kind of the collection members the rule runs on.
        kind: NodeKind,
    },
}

/// One problem reported by a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finding {
    /// Values substituted into the rule's message template.
    pub args: Vec<String>,
    /// Location to report instead of the matched node's own path.
    pub location: Option<ObjectPath>,
}

impl Finding {
    /// Creates a finding at the matched node's path.
    #[must_use]
    pub fn new<S: Into<String>>(args: impl IntoIterator<Item = S>) -> Self {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    /// Creates a finding at an explicit path.
    #[must_use]
    pub fn at<S: Into<String>>(location: ObjectPath, args: impl IntoIterator<Item = S>) -> Self {
        Self::new(args).with_location(location)
    }

    /// Overrides the reported location.
    #[must_use]
    pub fn with_location(mut self, location: ObjectPath) -> Self {
        self.location = Some(location);
        self
    }
}

/// Failure of a single rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum RuleError {
    /// The rule was handed a node it was not written for.
    #[error("expected a {expected} node, got {found}")]
    #[diagnostic(code(openapi_lint::rule::unexpected_node))]
    UnexpectedNode {
        /// Kind the rule handles.
        expected: NodeKind,
        /// Kind it received.
        found: NodeKind,
    },

    /// The rule could not evaluate the node.
    #[error("{0}")]
    #[diagnostic(code(openapi_lint::rule::failed))]
    Failed(String),
}

impl RuleError {
    /// Builds an [`RuleError::UnexpectedNode`] for `node`.
    #[must_use]
    pub fn unexpected(expected: NodeKind, node: Node<'_>) -> Self {
        Self::UnexpectedNode {
            expected,
            found: node.kind(),
        }
    }
}

/// A validation rule.
///
/// Implement either [`Rule::is_valid`] for a fixed-message pass/fail check, or
/// [`Rule::check`] to produce any number of findings with their own message
/// arguments and locations.
///
/// # Example
///
/// ```
/// use openapi_lint_core::{Node, NodeKind, Rule, RuleTarget};
///
/// pub struct NoEmptySummary;
///
/// impl Rule for NoEmptySummary {
///     fn id(&self) -> &'static str { "X0001" }
///     fn name(&self) -> &'static str { "NoEmptySummary" }
///     fn target(&self) -> RuleTarget { RuleTarget::Kind(&[NodeKind::Operation]) }
///     fn message_template(&self) -> &'static str { "Operation summary must not be empty." }
///
///     fn is_valid(&self, node: Node<'_>) -> bool {
///         match node {
///             Node::Operation(op) => op.summary.as_deref() != Some(""),
///             _ => true,
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule id (e.g., "R2059").
    fn id(&self) -> &'static str;

    /// Returns the PascalCase rule name (e.g., "UniqueResourcePaths").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Where the rule is evaluated.
    fn target(&self) -> RuleTarget;

    /// Document flavors the rule applies to. The default flavor applies to all.
    fn flavor(&self) -> Flavor {
        Flavor::DEFAULT
    }

    /// Pass in which the rule runs.
    fn pass_mode(&self) -> PassMode {
        PassMode::Individual
    }

    /// Returns the default severity for messages from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Violation category.
    fn category(&self) -> Category {
        Category::ArmViolation
    }

    /// Message text with `{0}`, `{1}`, ... placeholders for finding arguments.
    fn message_template(&self) -> &'static str;

    /// Stateless pass/fail check used by the default [`Rule::check`].
    fn is_valid(&self, _node: Node<'_>) -> bool {
        true
    }

    /// Checks a matched node.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the node cannot be evaluated. The walker
    /// reports the error as an internal diagnostic and carries on.
    fn check(&self, node: Node<'_>, _ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
        if self.is_valid(node) {
            Ok(Vec::new())
        } else {
            Ok(vec![Finding::default()])
        }
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Substitutes `{0}`, `{1}`, ... in `template` with `args`.
///
/// Placeholders without a matching argument are left as written.
#[must_use]
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
        match index.and_then(|(i, close)| args.get(i).map(|arg| (arg, close))) {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operation;

    struct SummaryRequired;

    impl Rule for SummaryRequired {
        fn id(&self) -> &'static str {
            "T0001"
        }
        fn name(&self) -> &'static str {
            "SummaryRequired"
        }
        fn target(&self) -> RuleTarget {
            RuleTarget::Kind(&[NodeKind::Operation])
        }
        fn message_template(&self) -> &'static str {
            "Operation must have a summary."
        }
        fn is_valid(&self, node: Node<'_>) -> bool {
            matches!(node, Node::Operation(op) if op.summary.is_some())
        }
    }

    #[test]
    fn rule_defaults() {
        let rule = SummaryRequired;
        assert_eq!(rule.flavor(), Flavor::DEFAULT);
        assert_eq!(rule.pass_mode(), PassMode::Individual);
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.description(), "");
    }

    #[test]
    fn boolean_form_yields_one_finding() {
        let doc = crate::model::ServiceDefinition::default();
        let ctx = RuleContext::root_context(
            &doc,
            std::path::Path::new("a.json"),
            std::rc::Rc::default(),
            crate::metadata::RunMetadata::default(),
        );
        let op = Operation::default();
        let findings = SummaryRequired.check(Node::Operation(&op), &ctx).unwrap();
        assert_eq!(findings, vec![Finding::default()]);
    }

    #[test]
    fn formats_positional_placeholders() {
        let args = vec!["Sku".to_string(), "Widgets_Get".to_string()];
        assert_eq!(
            format_message("Model '{0}' used by '{1}', again '{0}'", &args),
            "Model 'Sku' used by 'Widgets_Get', again 'Sku'"
        );
    }

    #[test]
    fn leaves_unmatched_placeholders() {
        let args = vec!["a".to_string()];
        assert_eq!(format_message("{0} {1} {x} {", &args), "a {1} {x} {");
    }

    #[test]
    fn finding_location_override() {
        let path = ObjectPath::empty().append_property("definitions");
        let finding = Finding::at(path.clone(), ["Widget"]);
        assert_eq!(finding.location, Some(path));
        assert_eq!(finding.args, ["Widget"]);
    }
}
