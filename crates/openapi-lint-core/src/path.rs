//! Object paths locating a node inside a document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Index into a sequence.
    Index(usize),
    /// Property name or map key.
    Property(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Property(name) => write!(f, "{name}"),
        }
    }
}

/// Immutable sequence of steps from the document root to a node.
///
/// Appending never mutates the receiver; it returns a new path. Documents
/// are shallow enough that copying the prefix is cheaper than sharing it.
///
/// Serializes as a plain array, e.g. `["paths", "/things", "get"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectPath {
    steps: Vec<PathStep>,
}

impl ObjectPath {
    /// The path of the document root.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new path with a property step appended.
    #[must_use]
    pub fn append_property(&self, name: impl Into<String>) -> Self {
        self.append(PathStep::Property(name.into()))
    }

    /// Returns a new path with an index step appended.
    #[must_use]
    pub fn append_index(&self, index: usize) -> Self {
        self.append(PathStep::Index(index))
    }

    fn append(&self, step: PathStep) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self { steps }
    }

    /// Steps in root-to-node order.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Last step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Renders the path as a JSON pointer (RFC 6901), e.g. `/paths/~1things/get`.
    #[must_use]
    pub fn to_json_pointer(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push('/');
            match step {
                PathStep::Index(i) => out.push_str(&i.to_string()),
                PathStep::Property(name) => {
                    out.push_str(&name.replace('~', "~0").replace('/', "~1"));
                }
            }
        }
        out
    }
}

/// Displays as a JSONPath-like expression: `$.paths['/things'].get`.
impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for step in &self.steps {
            match step {
                PathStep::Index(i) => write!(f, "[{i}]")?,
                PathStep::Property(name) if is_plain_identifier(name) => write!(f, ".{name}")?,
                PathStep::Property(name) => write!(f, "['{}']", name.replace('\'', "\\'"))?,
            }
        }
        Ok(())
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$')
}
