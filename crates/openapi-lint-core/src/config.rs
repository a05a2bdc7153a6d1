//! Configuration types for openapi-lint.

use crate::metadata::{Flavor, PassMode};
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for openapi-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "arm", "data-plane", "all").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing run (default: "error").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Validator configuration.
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Per-rule configurations, keyed by rule id or rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Configuration for a rule. An entry under the id wins over one under the name.
    #[must_use]
    pub fn rule_config(&self, rule_id: &str, rule_name: &str) -> Option<&RuleConfig> {
        self.rules
            .get(rule_id)
            .or_else(|| self.rules.get(rule_name))
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str, rule_name: &str) -> bool {
        self.rule_config(rule_id, rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str, rule_name: &str) -> Option<Severity> {
        self.rule_config(rule_id, rule_name).and_then(|c| c.severity)
    }

    /// Severity at which a run counts as failed.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// Which passes a run executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassSelection {
    /// Only the per-file pass.
    #[default]
    Individual,
    /// Only the merged-document pass.
    Composed,
    /// The per-file pass followed by the merged-document pass.
    Both,
}

impl PassSelection {
    /// Pass modes to run, in order.
    #[must_use]
    pub fn modes(self) -> &'static [PassMode] {
        match self {
            Self::Individual => &[PassMode::Individual],
            Self::Composed => &[PassMode::Composed],
            Self::Both => &[PassMode::Individual, PassMode::Composed],
        }
    }
}

/// Validator-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Document flavor(s) to validate against.
    #[serde(default)]
    pub flavor: Flavor,

    /// Passes to run.
    #[serde(default)]
    pub pass: PassSelection,

    /// Glob patterns selecting documents when a directory is given.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns to exclude from validation.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            flavor: Flavor::DEFAULT,
            pass: PassSelection::default(),
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![
        "**/*.json".to_string(),
        "**/*.yaml".to_string(),
        "**/*.yml".to_string(),
    ]
}

fn default_exclude() -> Vec<String> {
    vec!["**/examples/**".to_string(), "**/node_modules/**".to_string()]
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(openapi_lint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(openapi_lint::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.validator.flavor, Flavor::DEFAULT);
        assert_eq!(config.validator.pass, PassSelection::Individual);
        assert!(config.validator.exclude.iter().any(|p| p.contains("examples")));
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_threshold(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[validator]
flavor = ["arm", "data-plane"]
pass = "both"
exclude = ["**/preview/**"]

[rules.R3018]
enabled = false

[rules.UniqueResourcePaths]
severity = "warning"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.validator.flavor, Flavor::ARM | Flavor::DATA_PLANE);
        assert_eq!(
            config.validator.pass.modes(),
            [PassMode::Individual, PassMode::Composed]
        );
        assert_eq!(config.validator.exclude, ["**/preview/**"]);
        assert_eq!(config.validator.include.len(), 3);
        assert_eq!(config.fail_threshold(), Severity::Warning);

        assert!(!config.is_rule_enabled("R3018", "EnumInsteadOfBoolean"));
        assert!(config.is_rule_enabled("R2059", "UniqueResourcePaths"));
        assert_eq!(
            config.rule_severity("R2059", "UniqueResourcePaths"),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn rule_id_entry_wins_over_name() {
        let config = Config::parse(
            r#"
[rules.R2059]
severity = "info"

[rules.UniqueResourcePaths]
severity = "error"
"#,
        )
        .unwrap();
        assert_eq!(
            config.rule_severity("R2059", "UniqueResourcePaths"),
            Some(Severity::Info)
        );
    }

    #[test]
    fn invalid_flavor_is_parse_error() {
        let err = Config::parse("[validator]\nflavor = \"mainframe\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { message } if message.contains("mainframe")));
    }
}
