//! Run metadata: which document flavor is being validated and in which pass.

use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

bitflags! {
    /// Document flavors a rule targets, or a run validates.
    ///
    /// The empty set is the *default* flavor. A rule tagged with the default
    /// flavor runs for every document; any other rule runs only when its set
    /// overlaps the run's set.
    ///
    /// ```
    /// use openapi_lint_core::Flavor;
    ///
    /// let rule = Flavor::ARM | Flavor::DATA_PLANE;
    /// assert!(rule.intersects(Flavor::DATA_PLANE));
    /// assert!(Flavor::DEFAULT.is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Flavor: u8 {
        /// Resource-manager (control plane) conventions.
        const ARM = 1;
        /// Data-plane conventions.
        const DATA_PLANE = 1 << 1;
    }
}

impl Flavor {
    /// The empty set: rules tagged with it apply to every document.
    pub const DEFAULT: Self = Self::empty();

    /// Returns true if a rule tagged with `self` applies to a run with `run` flavor.
    #[must_use]
    pub fn applies_to(self, run: Self) -> bool {
        self.is_empty() || self.intersects(run)
    }

    /// Member names, e.g. `["arm", "data-plane"]`. `["default"]` for the empty set.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        if self.is_empty() {
            return vec!["default"];
        }
        let mut names = Vec::new();
        if self.contains(Self::ARM) {
            names.push("arm");
        }
        if self.contains(Self::DATA_PLANE) {
            names.push("data-plane");
        }
        names
    }

    fn parse_one(name: &str) -> Result<Self, MetadataError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "arm" => Ok(Self::ARM),
            "data-plane" | "dataplane" | "data_plane" => Ok(Self::DATA_PLANE),
            "default" | "" => Ok(Self::DEFAULT),
            _ => Err(MetadataError::UnknownFlavor(name.trim().to_string())),
        }
    }
}

impl Default for Flavor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

/// Parses a flavor name or a comma-separated list (`arm,data-plane`).
impl FromStr for Flavor {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .try_fold(Self::DEFAULT, |acc, name| Ok(acc | Self::parse_one(name)?))
    }
}

impl Serialize for Flavor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Accepts either `"arm"` / `"arm,data-plane"` or `["arm", "data-plane"]`.
impl<'de> Deserialize<'de> for Flavor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::One(s) => s.parse().map_err(D::Error::custom),
            Repr::Many(names) => names.iter().try_fold(Self::DEFAULT, |acc, name| {
                Self::parse_one(name)
                    .map(|f| acc | f)
                    .map_err(D::Error::custom)
            }),
        }
    }
}

/// Whether a rule runs on single source files or on the merged document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassMode {
    /// One source file in isolation.
    #[default]
    Individual,
    /// The fully merged multi-file document.
    Composed,
}

impl PassMode {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Composed => "composed",
        }
    }
}

impl fmt::Display for PassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassMode {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "composed" => Ok(Self::Composed),
            _ => Err(MetadataError::UnknownPassMode(s.trim().to_string())),
        }
    }
}

/// Per-run selection used to filter the rule catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunMetadata {
    /// Flavor of the document being validated.
    pub flavor: Flavor,
    /// Pass being executed.
    pub pass_mode: PassMode,
}

impl RunMetadata {
    /// Creates run metadata.
    #[must_use]
    pub fn new(flavor: Flavor, pass_mode: PassMode) -> Self {
        Self { flavor, pass_mode }
    }
}

impl fmt::Display for RunMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flavor={} pass={}", self.flavor, self.pass_mode)
    }
}

/// Errors from parsing run metadata names.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum MetadataError {
    /// Unrecognized flavor name.
    #[error("unknown document flavor `{0}` (expected arm, data-plane or default)")]
    #[diagnostic(code(openapi_lint::metadata::flavor))]
    UnknownFlavor(String),

    /// Unrecognized pass name.
    #[error("unknown pass mode `{0}` (expected individual or composed)")]
    #[diagnostic(code(openapi_lint::metadata::pass))]
    UnknownPassMode(String),
}
