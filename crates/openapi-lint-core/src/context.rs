//! Traversal context handed to every rule invocation.

use crate::classify::ResourceFacts;
use crate::metadata::RunMetadata;
use crate::model::{Node, ServiceDefinition};
use crate::path::ObjectPath;
use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;

/// State shared by every context of one run.
#[derive(Debug)]
struct RunShared<'a> {
    root: &'a ServiceDefinition,
    file: &'a Path,
    facts: Rc<ResourceFacts>,
    metadata: RunMetadata,
}

/// How a context is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<'a> {
    /// The document root.
    Root,
    /// A record field or map entry.
    Key(&'a str),
    /// A sequence element.
    Index(usize),
    /// A catch-all field that shares its parent's location.
    Inline,
}

/// A node in the chain of ancestors of the value being visited.
///
/// Contexts are built one per traversal step and linked to their parent, so
/// a rule can look upwards (`parent()`) as well as at run-wide data (`root()`,
/// `facts()`). The reported path is derived from the chain on first use.
#[derive(Debug)]
pub struct RuleContext<'a> {
    shared: Rc<RunShared<'a>>,
    parent: Option<Rc<RuleContext<'a>>>,
    position: Position<'a>,
    value: Node<'a>,
    path: OnceCell<ObjectPath>,
}

impl<'a> RuleContext<'a> {
    /// Creates the root context of a run.
    #[must_use]
    pub fn root_context(
        root: &'a ServiceDefinition,
        file: &'a Path,
        facts: Rc<ResourceFacts>,
        metadata: RunMetadata,
    ) -> Rc<Self> {
        Rc::new(Self {
            shared: Rc::new(RunShared {
                root,
                file,
                facts,
                metadata,
            }),
            parent: None,
            position: Position::Root,
            value: Node::Document(root),
            path: OnceCell::new(),
        })
    }

    /// Creates a child context for `value` attached at `position`.
    #[must_use]
    pub fn child(self: &Rc<Self>, position: Position<'a>, value: Node<'a>) -> Rc<Self> {
        Rc::new(Self {
            shared: Rc::clone(&self.shared),
            parent: Some(Rc::clone(self)),
            position,
            value,
            path: OnceCell::new(),
        })
    }

    /// The whole document being validated.
    #[must_use]
    pub fn root(&self) -> &'a ServiceDefinition {
        self.shared.root
    }

    /// File the document was loaded from.
    #[must_use]
    pub fn file(&self) -> &'a Path {
        self.shared.file
    }

    /// Resource classification of the document.
    #[must_use]
    pub fn facts(&self) -> &ResourceFacts {
        &self.shared.facts
    }

    /// Flavor and pass of the current run.
    #[must_use]
    pub fn metadata(&self) -> RunMetadata {
        self.shared.metadata
    }

    /// The value this context was created for.
    #[must_use]
    pub fn value(&self) -> Node<'a> {
        self.value
    }

    /// Parent context, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<&RuleContext<'a>> {
        self.parent.as_deref()
    }

    /// How this context hangs off its parent.
    #[must_use]
    pub fn position(&self) -> Position<'a> {
        self.position
    }

    /// Property name or map key of this node, if it has one.
    #[must_use]
    pub fn key(&self) -> Option<&'a str> {
        match self.position {
            Position::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Sequence index of this node, if it has one.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.position {
            Position::Index(index) => Some(index),
            _ => None,
        }
    }

    /// Location of this node from the document root.
    #[must_use]
    pub fn path(&self) -> &ObjectPath {
        self.path.get_or_init(|| match (&self.parent, self.position) {
            (None, _) | (Some(_), Position::Root) => ObjectPath::empty(),
            (Some(parent), Position::Key(key)) => parent.path().append_property(key),
            (Some(parent), Position::Index(index)) => parent.path().append_index(index),
            (Some(parent), Position::Inline) => parent.path().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathStep;

    fn document() -> ServiceDefinition {
        crate::model::parse_json(r#"{ "paths": { "/things": { "get": {} } } }"#).unwrap()
    }

    #[test]
    fn path_follows_parent_chain() {
        let doc = document();
        let root = RuleContext::root_context(
            &doc,
            Path::new("a.json"),
            Rc::default(),
            RunMetadata::default(),
        );
        let paths = root.child(Position::Key("paths"), Node::Paths(&doc.paths));
        let item = paths.child(Position::Index(2), Node::PathItem(&doc.paths[0]));
        let verb = item.child(Position::Key("get"), Node::Operation(&doc.paths[0].operations[0]));

        assert_eq!(
            verb.path().steps(),
            &[
                PathStep::Property("paths".into()),
                PathStep::Index(2),
                PathStep::Property("get".into()),
            ]
        );
        assert_eq!(verb.key(), Some("get"));
        assert_eq!(item.index(), Some(2));
    }

    #[test]
    fn inline_children_share_parent_path() {
        let doc = document();
        let root = RuleContext::root_context(
            &doc,
            Path::new("a.json"),
            Rc::default(),
            RunMetadata::default(),
        );
        let ops = root
            .child(Position::Key("paths"), Node::Paths(&doc.paths))
            .child(Position::Key("/things"), Node::PathItem(&doc.paths[0]));
        let inline = ops.child(Position::Inline, Node::Operations(&doc.paths[0].operations));

        assert_eq!(inline.path(), ops.path());
        assert_eq!(inline.key(), None);
        assert!(root.path().is_empty());
    }

    #[test]
    fn run_data_is_shared_by_reference() {
        let doc = document();
        let facts = Rc::new(ResourceFacts::default());
        let root = RuleContext::root_context(
            &doc,
            Path::new("a.json"),
            Rc::clone(&facts),
            RunMetadata::default(),
        );
        let child = root.child(Position::Key("paths"), Node::Paths(&doc.paths));

        assert!(std::ptr::eq(child.facts(), facts.as_ref()));
        assert_eq!(child.file(), Path::new("a.json"));
        assert!(child.parent().is_some());
    }
}
