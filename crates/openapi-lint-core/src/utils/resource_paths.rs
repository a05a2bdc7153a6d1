//! Resource-manager path conventions.
//!
//! Resource paths look like
//! `/subscriptions/{subscriptionId}/resourceGroups/{rg}/providers/Microsoft.Test/widgets/{widgetName}`:
//! a scope prefix, a provider namespace, then alternating type and name segments.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PROVIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/providers/([^{/]+)/").expect("provider pattern is valid")
});

#[allow(clippy::expect_used)]
static PARAMETER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("parameter pattern is valid"));

/// Distinct provider namespaces referenced by `paths`, in first-seen order.
///
/// Namespaces are compared case-insensitively; the first spelling is kept.
pub fn resource_providers<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut providers: Vec<&'a str> = Vec::new();
    for path in paths {
        for capture in PROVIDER_RE.captures_iter(path) {
            let Some(namespace) = capture.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if !providers.iter().any(|p| p.eq_ignore_ascii_case(namespace)) {
                providers.push(namespace);
            }
        }
    }
    providers
}

/// Canonical form used to detect paths that address the same resource.
///
/// Parameter names are erased, case is folded, and a trailing slash dropped.
#[must_use]
pub fn normalize_resource_path(path: &str) -> String {
    let erased = PARAMETER_RE.replace_all(path.trim(), "{}");
    erased.trim_end_matches('/').to_lowercase()
}

/// Returns true if the path is scoped below a subscription or resource group.
#[must_use]
pub fn is_subscription_scoped(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains("/subscriptions/") || lower.contains("/resourcegroups/")
}

/// Returns true if the path is scoped to a resource group.
#[must_use]
pub fn is_resource_group_scoped(path: &str) -> bool {
    path.to_ascii_lowercase().contains("/resourcegroups/")
}

/// Returns true for a `{parameter}` segment.
#[must_use]
pub fn is_parameter_segment(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// The part of a path after its last `/providers/{Namespace}/` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath<'a> {
    /// Provider namespace, e.g. `Microsoft.Test`.
    pub namespace: &'a str,
    /// `(type, name)` pairs. The name is absent for a collection path.
    pub segments: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> ResourcePath<'a> {
    /// Parses a path; returns `None` when it has no provider namespace.
    #[must_use]
    pub fn parse(path: &'a str) -> Option<Self> {
        let parts: Vec<&'a str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let providers = parts.iter().rposition(|s| s.eq_ignore_ascii_case("providers"))?;
        let namespace = *parts.get(providers + 1)?;
        if is_parameter_segment(namespace) {
            return None;
        }
        let segments = parts[providers + 2..]
            .chunks(2)
            .map(|pair| (pair[0], pair.get(1).copied()))
            .collect();
        Some(Self {
            namespace,
            segments,
        })
    }

    /// Last resource type, e.g. `widgets`.
    #[must_use]
    pub fn resource_type(&self) -> Option<&'a str> {
        self.segments.last().map(|(ty, _)| *ty)
    }

    /// Returns true if the path addresses a collection rather than one instance.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.segments.last().is_some_and(|(_, name)| name.is_none())
    }

    /// Returns true if `self` is an instance nested exactly one level under `parent`.
    #[must_use]
    pub fn is_child_of(&self, parent: &ResourcePath<'_>) -> bool {
        self.namespace.eq_ignore_ascii_case(parent.namespace)
            && !self.is_collection()
            && !parent.is_collection()
            && self.segments.len() == parent.segments.len() + 1
            && self
                .segments
                .iter()
                .zip(&parent.segments)
                .all(|((a, _), (b, _))| a.eq_ignore_ascii_case(b))
    }
}
