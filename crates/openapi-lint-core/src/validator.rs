//! Validator facade tying the catalog, classifier and walker together.

use crate::catalog::ResolvedCatalog;
use crate::classify::{ArmConventions, ClassificationPolicy, ResourceFacts};
use crate::config::Config;
use crate::context::RuleContext;
use crate::metadata::RunMetadata;
use crate::model::{load_document, LoadError, ServiceDefinition};
use crate::rule::{Rule, RuleBox};
use crate::types::ValidationReport;
use crate::walker::Messages;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while validating files.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ValidatorError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    #[diagnostic(code(openapi_lint::validator::io))]
    Io(#[from] std::io::Error),

    /// The document could not be loaded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    #[diagnostic(code(openapi_lint::validator::glob))]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    #[diagnostic(code(openapi_lint::validator::config))]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring a [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    policy: Option<Box<dyn ClassificationPolicy>>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl ValidatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the catalog.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the catalog.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules to the catalog.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the default resource classification policy.
    #[must_use]
    pub fn policy(mut self, policy: Box<dyn ClassificationPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Adds an include glob pattern used for directory discovery.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Adds an exclude glob pattern used for directory discovery.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Builds the validator.
    #[must_use]
    pub fn build(self) -> Validator {
        let config = self.config.unwrap_or_default();

        // Builder includes replace the configured ones, builder excludes add to them.
        let include_patterns = if self.include_patterns.is_empty() {
            config.validator.include.clone()
        } else {
            self.include_patterns
        };
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.validator.exclude.iter().cloned());

        Validator {
            rules: self.rules,
            policy: self
                .policy
                .unwrap_or_else(|| Box::new(ArmConventions)),
            include_patterns,
            exclude_patterns,
            config,
        }
    }
}

/// Runs a rule catalog over documents.
///
/// Use [`Validator::builder()`] to construct an instance.
pub struct Validator {
    rules: Vec<RuleBox>,
    config: Config,
    policy: Box<dyn ClassificationPolicy>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl Validator {
    /// Creates a new builder for configuring a validator.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Registered rules in catalog order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies the resource models of `doc`.
    #[must_use]
    pub fn classify(&self, doc: &ServiceDefinition) -> Rc<ResourceFacts> {
        Rc::new(self.policy.classify(doc))
    }

    /// Validates `doc`, classifying it first.
    ///
    /// Classification and catalog resolution happen here, eagerly. Rules
    /// are only evaluated as the returned iterator is advanced. Calling
    /// this again starts a fresh walk.
    #[must_use]
    pub fn validate<'a>(
        &'a self,
        doc: &'a ServiceDefinition,
        file: &'a Path,
        metadata: &RunMetadata,
    ) -> Messages<'a> {
        self.validate_with_facts(doc, file, metadata, self.classify(doc))
    }

    /// Validates `doc` with a classification computed earlier.
    #[must_use]
    pub fn validate_with_facts<'a>(
        &'a self,
        doc: &'a ServiceDefinition,
        file: &'a Path,
        metadata: &RunMetadata,
        facts: Rc<ResourceFacts>,
    ) -> Messages<'a> {
        info!("Validating {} ({})", file.display(), metadata);
        let catalog = ResolvedCatalog::resolve(&self.rules, metadata, &self.config);
        let root = RuleContext::root_context(doc, file, facts, *metadata);
        Messages::new(catalog, &self.config, root)
    }

    /// Loads and validates one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn validate_file(
        &self,
        path: &Path,
        metadata: &RunMetadata,
    ) -> Result<ValidationReport, ValidatorError> {
        let doc = load_document(path)?;
        let mut report = ValidationReport::new();
        report.messages.extend(self.validate(&doc, path, metadata));
        report.files_checked = 1;

        info!(
            "Validation complete: {} messages in {}",
            report.messages.len(),
            path.display()
        );
        Ok(report)
    }

    /// Expands `root` into the documents to validate.
    ///
    /// A file is returned as is. A directory is searched with the include
    /// patterns, minus anything matching an exclude pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or a directory entry cannot be read.
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>, ValidatorError> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();
        for include in &self.include_patterns {
            let pattern = format!("{}/{}", root.display(), include);
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| ValidatorError::Io(e.into_error()))?;

                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                files.push(path);
            }
        }
        files.sort();
        files.dedup();

        info!("Found {} documents under {}", files.len(), root.display());
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/examples/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}
