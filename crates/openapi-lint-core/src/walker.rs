//! Lazy, depth-first walk of a document that runs the resolved rules.

use crate::catalog::{CollectionRule, ResolvedCatalog};
use crate::config::Config;
use crate::context::{Position, RuleContext};
use crate::model::{Node, Shape};
use crate::rule::{format_message, Finding, Rule};
use crate::types::{Category, Location, Severity, ValidationMessage};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{trace, warn};

enum Task<'a> {
    Visit {
        node: Node<'a>,
        ctx: Rc<RuleContext<'a>>,
        inherited: Rc<[CollectionRule<'a>]>,
        traverse: bool,
    },
    Invoke {
        rule: &'a dyn Rule,
        node: Node<'a>,
        ctx: Rc<RuleContext<'a>>,
    },
}

/// Diagnostics of one run, produced on demand.
///
/// Nothing is evaluated until the iterator is advanced, and dropping it
/// stops the walk. Within a record each field's rules run before the
/// field's subtree; children are always visited before the rules of the
/// node that holds them.
pub struct Messages<'a> {
    catalog: ResolvedCatalog<'a>,
    config: &'a Config,
    stack: Vec<Task<'a>>,
    pending: VecDeque<ValidationMessage>,
}

impl<'a> Messages<'a> {
    /// Starts a walk at the document held by `root`.
    #[must_use]
    pub fn new(catalog: ResolvedCatalog<'a>, config: &'a Config, root: Rc<RuleContext<'a>>) -> Self {
        let stack = vec![Task::Visit {
            node: root.value(),
            ctx: root,
            inherited: no_collection_rules(),
            traverse: true,
        }];
        Self {
            catalog,
            config,
            stack,
            pending: VecDeque::new(),
        }
    }

    fn step(&mut self, task: Task<'a>) {
        match task {
            Task::Visit {
                node,
                ctx,
                inherited,
                traverse,
            } => self.visit(node, &ctx, &inherited, traverse),
            Task::Invoke { rule, node, ctx } => self.invoke(rule, node, &ctx),
        }
    }

    fn visit(
        &mut self,
        node: Node<'a>,
        ctx: &Rc<RuleContext<'a>>,
        inherited: &Rc<[CollectionRule<'a>]>,
        traverse: bool,
    ) {
        let kind = node.kind();
        trace!("Visiting {} at {}", kind, ctx.path());

        // Pushed first so they run after every child.
        let node_rules: Vec<&'a dyn Rule> = inherited
            .iter()
            .filter(|collection| collection.kind == kind)
            .map(|collection| collection.rule)
            .chain(self.catalog.kind_rules(kind).iter().copied())
            .collect();
        self.push_invocations(&node_rules, node, ctx);

        if !traverse {
            return;
        }

        match node.shape() {
            Shape::Leaf => {}
            Shape::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate().rev() {
                    self.stack.push(Task::Visit {
                        node: item,
                        ctx: ctx.child(Position::Index(index), item),
                        inherited: Rc::clone(inherited),
                        traverse: true,
                    });
                }
            }
            Shape::Map {
                entries,
                traversable,
            } => {
                for (key, value) in entries.into_iter().rev() {
                    self.stack.push(Task::Visit {
                        node: value,
                        ctx: ctx.child(Position::Key(key), value),
                        inherited: Rc::clone(inherited),
                        traverse: traversable,
                    });
                }
            }
            Shape::Record(fields) => {
                for field in fields.into_iter().rev() {
                    let position = if field.inline {
                        Position::Inline
                    } else {
                        Position::Key(field.id.name)
                    };
                    let child = ctx.child(position, field.node);
                    self.stack.push(Task::Visit {
                        node: field.node,
                        ctx: Rc::clone(&child),
                        inherited: self
                            .catalog
                            .collection_rules(field.id)
                            .unwrap_or_else(no_collection_rules),
                        traverse: field.traversable,
                    });
                    let field_rules = self.catalog.field_rules(field.id).to_vec();
                    self.push_invocations(&field_rules, field.node, &child);
                }
            }
        }
    }

    /// Pushes invocations so that they pop in slice order.
    fn push_invocations(&mut self, rules: &[&'a dyn Rule], node: Node<'a>, ctx: &Rc<RuleContext<'a>>) {
        for rule in rules.iter().rev() {
            self.stack.push(Task::Invoke {
                rule: *rule,
                node,
                ctx: Rc::clone(ctx),
            });
        }
    }

    fn invoke(&mut self, rule: &'a dyn Rule, node: Node<'a>, ctx: &RuleContext<'a>) {
        trace!("Running {} on {}", rule.id(), ctx.path());

        match catch_unwind(AssertUnwindSafe(|| rule.check(node, ctx))) {
            Ok(Ok(findings)) => {
                let severity = self
                    .config
                    .rule_severity(rule.id(), rule.name())
                    .unwrap_or_else(|| rule.default_severity());
                for finding in findings {
                    self.pending
                        .push_back(message(rule, finding, ctx, severity));
                }
            }
            Ok(Err(err)) => {
                warn!("Rule {} failed at {}: {}", rule.id(), ctx.path(), err);
                self.pending
                    .push_back(internal_error(rule, ctx, &err.to_string()));
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                warn!("Rule {} panicked at {}: {}", rule.id(), ctx.path(), reason);
                self.pending.push_back(internal_error(rule, ctx, &reason));
            }
        }
    }
}

impl Iterator for Messages<'_> {
    type Item = ValidationMessage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(message) = self.pending.pop_front() {
                return Some(message);
            }
            let task = self.stack.pop()?;
            self.step(task);
        }
    }
}

fn no_collection_rules<'a>() -> Rc<[CollectionRule<'a>]> {
    Rc::from(Vec::new())
}

fn message(
    rule: &dyn Rule,
    finding: Finding,
    ctx: &RuleContext<'_>,
    severity: Severity,
) -> ValidationMessage {
    let path = finding.location.unwrap_or_else(|| ctx.path().clone());
    ValidationMessage::new(
        rule.id(),
        rule.name(),
        severity,
        rule.category(),
        Location::new(ctx.file(), path),
        format_message(rule.message_template(), &finding.args),
    )
}

fn internal_error(rule: &dyn Rule, ctx: &RuleContext<'_>, reason: &str) -> ValidationMessage {
    ValidationMessage::new(
        rule.id(),
        rule.name(),
        Severity::Error,
        Category::Internal,
        Location::new(ctx.file(), ctx.path().clone()),
        format!("Rule {} could not be evaluated: {reason}", rule.name()),
    )
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic".to_string()
    }
}
