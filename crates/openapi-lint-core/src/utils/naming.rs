//! Property naming conventions.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static CAMEL_CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[A-Z][a-z0-9]+)*[A-Z]?$").expect("camelCase pattern is valid")
});

/// Returns true for camelCase names such as `provisioningState` or `vmSizeA`.
#[must_use]
pub fn is_camel_case(name: &str) -> bool {
    CAMEL_CASE_RE.is_match(name)
}

/// Returns true for OData annotations (`@odata.nextLink`), which keep their own casing.
#[must_use]
pub fn is_odata_property(name: &str) -> bool {
    name.get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("@odata."))
}

/// Rewrites `name` in camelCase.
///
/// Words are split on separators and case changes; acronyms become one word
/// (`HTTPServer` becomes `httpServer`).
#[must_use]
pub fn camel_case_suggestion(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (index, word) in split_words(name).iter().enumerate() {
        let lower = word.to_lowercase();
        if index == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        // A non-empty word implies the previous char was alphanumeric.
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case() {
        for name in ["name", "provisioningState", "vmSizeA", "v2Settings", "ipv4Address"] {
            assert!(is_camel_case(name), "{name}");
        }
    }

    #[test]
    fn rejects_other_styles() {
        for name in ["Name", "provisioning_state", "urlID", "HTTPServer", "kebab-case", ""] {
            assert!(!is_camel_case(name), "{name}");
        }
    }

    #[test]
    fn suggests_camel_case() {
        assert_eq!(camel_case_suggestion("ProvisioningState"), "provisioningState");
        assert_eq!(camel_case_suggestion("HTTPServer"), "httpServer");
        assert_eq!(camel_case_suggestion("urlID"), "urlId");
        assert_eq!(camel_case_suggestion("my_prop-name"), "myPropName");
    }

    #[test]
    fn detects_odata_annotations() {
        assert!(is_odata_property("@odata.nextLink"));
        assert!(is_odata_property("@OData.type"));
        assert!(!is_odata_property("odata"));
    }
}
