//! Helpers shared by the rule unit tests.

use openapi_lint_core::model::parse_json;
use openapi_lint_core::{Flavor, Rule, RunMetadata, ValidationMessage, Validator};
use std::path::Path;

/// Runs `rule` alone over `json`, in the rule's own pass with every flavor enabled.
pub(crate) fn check<R: Rule + 'static>(rule: R, json: &str) -> Vec<ValidationMessage> {
    let doc = parse_json(json).expect("test document parses");
    let meta = RunMetadata::new(Flavor::ARM | Flavor::DATA_PLANE, rule.pass_mode());
    let validator = Validator::builder().rule(rule).build();
    validator
        .validate(&doc, Path::new("test.json"), &meta)
        .collect()
}

/// Reported locations, rendered.
pub(crate) fn locations(messages: &[ValidationMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m.location.path.to_string())
        .collect()
}
