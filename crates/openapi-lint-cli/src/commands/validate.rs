//! Validate command implementation.

use anyhow::{Context, Result};
use miette::Diagnostic;
use openapi_lint_core::{
    load_document, Config, Flavor, PassSelection, RuleBox, RunMetadata, ValidationMessage,
    ValidationReport, Validator,
};
use openapi_lint_rules::{all_rules, Preset};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config_resolver::{ConfigResolver, ConfigSource};
use crate::OutputFormat;

/// Command-line overrides for a validation run.
#[derive(Debug, Default)]
pub struct Options {
    /// Flavor override.
    pub flavor: Option<Flavor>,
    /// Pass override.
    pub pass: Option<PassSelection>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule ids or names.
    pub rules: Option<String>,
    /// Preset override.
    pub preset: Option<Preset>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// A validator built from one configuration plus the command-line overrides.
struct Configured {
    validator: Validator,
    flavor: Flavor,
    pass: PassSelection,
}

/// Runs the validate command.
pub fn run(paths: &[PathBuf], options: &Options, resolver: &mut ConfigResolver) -> Result<()> {
    let (report, failed) = validate_targets(paths, options, resolver)?;
    super::output::print(&report, options.format)?;

    if failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Validates every target with the configuration resolved for it.
///
/// Returns the combined report and whether any target reached its own
/// configured failure threshold.
fn validate_targets(
    paths: &[PathBuf],
    options: &Options,
    resolver: &mut ConfigResolver,
) -> Result<(ValidationReport, bool)> {
    let mut validators: HashMap<ConfigSource, Configured> = HashMap::new();
    let mut report = ValidationReport::new();
    let mut failed = false;

    for root in paths {
        let (source, config) = resolver.config_for(root)?;
        let configured = match validators.entry(source) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let configured = build_validator((*config).clone(), options)?;
                tracing::info!(
                    "Validating with {} rules ({}, {:?})",
                    configured.validator.rule_count(),
                    configured.flavor,
                    configured.pass
                );
                entry.insert(configured)
            }
        };

        let target = configured.validate_target(root)?;
        failed |= target.has_violations_at(configured.validator.config().fail_threshold());
        report.extend(target);
    }

    Ok((report, failed))
}

/// Applies command-line overrides to `config` and builds the validator.
fn build_validator(mut config: Config, options: &Options) -> Result<Configured> {
    if let Some(flavor) = options.flavor {
        config.validator.flavor = flavor;
    }
    if let Some(pass) = options.pass {
        config.validator.pass = pass;
    }
    let flavor = config.validator.flavor;
    let pass = config.validator.pass;

    let rules = if let Some(filter) = &options.rules {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        select_rules(&names)
    } else {
        let preset = match options.preset {
            Some(preset) => preset,
            None => config
                .preset
                .as_deref()
                .map_or(Ok(Preset::All), |name| name.parse::<Preset>())
                .context("Invalid preset in config")?,
        };
        preset.rules()
    };

    let mut builder = Validator::builder().config(config).rules(rules);
    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }
    Ok(Configured {
        validator: builder.build(),
        flavor,
        pass,
    })
}

/// Picks built-in rules by id or name, in the order given.
fn select_rules(names: &[&str]) -> Vec<RuleBox> {
    let mut selected = Vec::new();
    for name in names.iter().filter(|n| !n.is_empty()) {
        let found = all_rules().into_iter().find(|rule| {
            rule.id().eq_ignore_ascii_case(name) || rule.name().eq_ignore_ascii_case(name)
        });
        match found {
            Some(rule) => selected.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }
    selected
}

impl Configured {
    /// Validates every document under `root`.
    ///
    /// A document that cannot be loaded is reported as a fatal message and
    /// the remaining documents are still validated.
    fn validate_target(&self, root: &Path) -> Result<ValidationReport> {
        let files = self
            .validator
            .discover_files(root)
            .with_context(|| format!("Failed to discover documents under {}", root.display()))?;
        if files.is_empty() {
            tracing::warn!("No documents found under {}", root.display());
        }

        let mut report = ValidationReport::new();
        for file in files {
            report.files_checked += 1;
            report.messages.extend(self.validate_file(&file));
        }
        Ok(report)
    }

    fn validate_file(&self, file: &Path) -> Vec<ValidationMessage> {
        let doc = match load_document(file) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("Skipping {}: {}", file.display(), err);
                let text = match err.code() {
                    Some(code) => format!("[{code}] {err}"),
                    None => err.to_string(),
                };
                return vec![ValidationMessage::fatal(file, text)];
            }
        };

        let facts = self.validator.classify(&doc);
        self.pass
            .modes()
            .iter()
            .flat_map(|&mode| {
                let metadata = RunMetadata::new(self.flavor, mode);
                self.validator
                    .validate_with_facts(&doc, file, &metadata, Rc::clone(&facts))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_lint_core::Severity;
    use std::fs;
    use tempfile::TempDir;

    const SERVICE: &str = r#"{
        "swagger": "2.0",
        "paths": {
            "/subscriptions/{s}/providers/Microsoft.Test/widgets/{widgetName}": {
                "delete": {
                    "parameters": [{ "name": "body", "in": "body", "schema": { "type": "object" } }],
                    "responses": { "200": { "description": "OK" } }
                }
            }
        },
        "definitions": {
            "Sku": { "properties": { "name": { "type": "string" }, "extra": { "type": "string" } } }
        }
    }"#;

    fn options(pass: PassSelection) -> Options {
        Options {
            flavor: Some(Flavor::ARM),
            pass: Some(pass),
            ..Options::default()
        }
    }

    fn run_in(dir: &Path, pass: PassSelection) -> ValidationReport {
        build_validator(Config::default(), &options(pass))
            .unwrap()
            .validate_target(dir)
            .unwrap()
    }

    #[test]
    fn selects_rules_by_id_or_name() {
        let rules = select_rules(&["R2059", "guidusage", "NoSuchRule"]);
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["R2059", "R3017"]);
    }

    #[test]
    fn both_passes_run_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("service.json"), SERVICE).unwrap();

        let individual = run_in(tmp.path(), PassSelection::Individual);
        assert_eq!(individual.by_rule("R3013").len(), 1);
        assert!(individual.by_rule("R2057").is_empty());

        let both = run_in(tmp.path(), PassSelection::Both);
        assert_eq!(both.by_rule("R3013").len(), 1);
        assert_eq!(both.by_rule("R2057").len(), 1);
        let first_composed = both
            .messages
            .iter()
            .position(|m| m.rule_id == "R2057")
            .unwrap();
        let last_individual = both
            .messages
            .iter()
            .rposition(|m| m.rule_id == "R3013")
            .unwrap();
        assert!(last_individual < first_composed);
    }

    #[test]
    fn unreadable_document_is_fatal_and_run_continues() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();
        fs::write(tmp.path().join("service.json"), SERVICE).unwrap();

        let report = run_in(tmp.path(), PassSelection::Individual);
        assert_eq!(report.files_checked, 2);
        let fatal = report.by_severity(Severity::Fatal);
        assert_eq!(fatal.len(), 1);
        assert!(fatal[0].location.file.ends_with("broken.json"));
        assert_eq!(report.by_rule("R3013").len(), 1);
    }

    #[test]
    fn each_target_is_validated_with_its_own_config() {
        let tmp = TempDir::new().unwrap();
        let strict = tmp.path().join("strict");
        let relaxed = tmp.path().join("relaxed");
        for dir in [&strict, &relaxed] {
            fs::create_dir(dir).unwrap();
            fs::write(dir.join("service.json"), SERVICE).unwrap();
        }
        fs::write(
            strict.join("openapi-lint.toml"),
            "[validator]\nflavor = \"arm\"\npass = \"both\"",
        )
        .unwrap();
        fs::write(
            relaxed.join("openapi-lint.toml"),
            "[validator]\nflavor = \"arm\"\n\n[rules.R3013]\nenabled = false",
        )
        .unwrap();

        let mut resolver = ConfigResolver::with_global_dir(None, None);
        let (report, failed) = validate_targets(
            &[strict.clone(), relaxed.clone()],
            &Options::default(),
            &mut resolver,
        )
        .unwrap();

        assert!(failed);
        assert_eq!(report.files_checked, 2);
        let in_dir = |rule: &str, dir: &Path| {
            report
                .by_rule(rule)
                .iter()
                .filter(|m| m.location.file.starts_with(dir))
                .count()
        };
        assert_eq!(in_dir("R3013", &strict), 1);
        assert_eq!(in_dir("R2057", &strict), 1);
        assert_eq!(in_dir("R3013", &relaxed), 0);
        assert_eq!(in_dir("R2057", &relaxed), 0);
    }

    #[test]
    fn failure_follows_each_targets_threshold() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("service.json"), SERVICE).unwrap();
        fs::write(
            tmp.path().join("openapi-lint.toml"),
            "fail_on = \"fatal\"\n\n[validator]\nflavor = \"arm\"",
        )
        .unwrap();

        let mut resolver = ConfigResolver::with_global_dir(None, None);
        let (report, failed) =
            validate_targets(&[tmp.path().to_path_buf()], &Options::default(), &mut resolver)
                .unwrap();
        assert!(report.has_errors());
        assert!(!failed);
    }

    #[test]
    fn configured_preset_is_used() {
        let config = Config::parse("preset = \"data-plane\"").unwrap();
        let configured = build_validator(config, &Options::default()).unwrap();
        assert_eq!(
            configured.validator.rule_count(),
            openapi_lint_rules::data_plane_rules().len()
        );
    }

    #[test]
    fn invalid_configured_preset_is_an_error() {
        let config = Config::parse("preset = \"strict\"").unwrap();
        assert!(build_validator(config, &Options::default()).is_err());
    }
}
