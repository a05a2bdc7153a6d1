//! The built-in rule set run end to end over fixture documents.

use openapi_lint_core::{Flavor, PassMode, RunMetadata, Severity, ValidationReport, Validator};
use openapi_lint_rules::{all_rules, data_plane_rules, Preset};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(name: &str, flavor: Flavor, pass: PassMode) -> ValidationReport {
    let validator = Validator::builder().rules(all_rules()).build();
    validator
        .validate_file(&fixture(name), &RunMetadata::new(flavor, pass))
        .expect("fixture validates")
}

fn locations(report: &ValidationReport, rule_id: &str) -> Vec<String> {
    report
        .by_rule(rule_id)
        .iter()
        .map(|m| m.location.path.to_string())
        .collect()
}

#[test]
fn sku_with_unknown_property_is_reported_once() {
    let report = run("sku.json", Flavor::ARM, PassMode::Composed);

    assert_eq!(locations(&report, "R2057"), ["$.definitions.Sku"]);
    let message = report.by_rule("R2057")[0];
    assert_eq!(message.severity, Severity::Warning);
    assert!(message.message.starts_with("Sku model 'Sku' is not valid."));
}

#[test]
fn arm_rules_are_skipped_for_data_plane_documents() {
    let report = run("sku.json", Flavor::DATA_PLANE, PassMode::Composed);
    assert!(report.by_rule("R2057").is_empty());
    assert!(report.by_rule("R3023").is_empty());
}

#[test]
fn composed_rules_are_skipped_in_the_individual_pass() {
    let report = run("sku.json", Flavor::ARM, PassMode::Individual);
    assert!(report.by_rule("R2057").is_empty());
}

#[test]
fn duplicate_resource_paths_are_reported_once() {
    let report = run("duplicate_paths.json", Flavor::ARM, PassMode::Individual);

    assert_eq!(
        locations(&report, "R2059"),
        ["$.paths['/subscriptions/{subscriptionId}/providers/Microsoft.Test/Widgets/{name}']"]
    );
    assert_eq!(report.by_rule("R2059")[0].severity, Severity::Error);
}

#[test]
fn tracked_resource_without_patch_is_reported() {
    let report = run("widgets.json", Flavor::ARM, PassMode::Composed);

    assert_eq!(locations(&report, "R3026"), ["$.definitions.Widget"]);
    assert!(report.by_rule("R3025").is_empty());
    assert!(report.by_rule("R3027").is_empty());
    assert!(report.by_rule("R3023").is_empty());
}

#[test]
fn boolean_property_is_reported() {
    let report = run("widgets.json", Flavor::ARM, PassMode::Composed);
    assert_eq!(
        locations(&report, "R3018"),
        ["$.definitions.WidgetProperties.properties.enabled"]
    );
}

#[test]
fn well_formed_document_has_no_individual_errors() {
    let report = run("widgets.json", Flavor::ARM, PassMode::Individual);
    assert!(
        !report.has_errors(),
        "unexpected errors:\n{}",
        report.format_test_report(Severity::Error)
    );
}

#[test]
fn validation_is_repeatable() {
    let first = run("widgets.json", Flavor::ARM, PassMode::Composed);
    let second = run("widgets.json", Flavor::ARM, PassMode::Composed);
    assert_eq!(first.messages, second.messages);
}

#[test]
fn data_plane_preset_matches_flavor_filtering() {
    let validator = Validator::builder().rules(data_plane_rules()).build();
    let report = validator
        .validate_file(
            &fixture("widgets.json"),
            &RunMetadata::new(Flavor::DATA_PLANE, PassMode::Composed),
        )
        .expect("fixture validates");

    let full = run("widgets.json", Flavor::DATA_PLANE, PassMode::Composed);
    assert_eq!(report.messages, full.messages);
    assert_eq!(Preset::DataPlane.rules().len(), data_plane_rules().len());
}
