//! Diagnostic messages and collected results.

use crate::path::ObjectPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never fails a run.
    Info,
    /// Should be addressed.
    Warning,
    /// Must be fixed.
    Error,
    /// The run itself failed for a file (e.g. it could not be loaded).
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Which family of conventions a rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Resource-manager API conventions.
    #[serde(rename = "ARMViolation")]
    ArmViolation,
    /// Resource-provider contract conventions.
    #[serde(rename = "RPCViolation")]
    RpcViolation,
    /// Conventions that affect generated SDKs.
    #[serde(rename = "SDKViolation")]
    SdkViolation,
    /// General API guideline conventions.
    #[serde(rename = "OneAPIViolation")]
    OneApiViolation,
    /// A rule failed while running.
    Internal,
}

impl Category {
    /// Name as it appears in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArmViolation => "ARMViolation",
            Self::RpcViolation => "RPCViolation",
            Self::SdkViolation => "SDKViolation",
            Self::OneApiViolation => "OneAPIViolation",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a diagnostic points: a file plus an object path inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source file.
    pub file: PathBuf,
    /// Path from the document root.
    pub path: ObjectPath,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, path: ObjectPath) -> Self {
        Self {
            file: file.into(),
            path,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.path)
    }
}

/// A diagnostic produced by one rule invocation.
///
/// Messages are created by the walker from rule findings and never modified
/// afterwards, except for configured severity overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Rule id (e.g., "R2059").
    pub rule_id: String,
    /// Rule name (e.g., "UniqueResourcePaths").
    pub rule_name: String,
    /// Severity of this message.
    pub severity: Severity,
    /// Violation category.
    pub category: Category,
    /// File and object path.
    pub location: Location,
    /// Formatted text.
    pub message: String,
}

impl ValidationMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        severity: Severity,
        category: Category,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            severity,
            category,
            location,
            message: message.into(),
        }
    }

    /// Creates a fatal message for a file that could not be validated at all.
    #[must_use]
    pub fn fatal(file: &Path, message: impl Into<String>) -> Self {
        Self::new(
            "FATAL",
            "ValidationFailed",
            Severity::Fatal,
            Category::Internal,
            Location::new(file, ObjectPath::empty()),
            message,
        )
    }

    /// Formats the message for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.rule_id, self.rule_name, self.location);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        let _ = writeln!(output, "  = category: {}", self.category);
        output
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.rule_id, self.message
        )
    }
}

/// Message counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Fatal messages.
    pub fatal: usize,
    /// Error messages.
    pub errors: usize,
    /// Warning messages.
    pub warnings: usize,
    /// Info messages.
    pub infos: usize,
}

/// Collected messages of one or more validated files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All messages, in production order.
    pub messages: Vec<ValidationMessage>,
    /// Number of files validated.
    pub files_checked: usize,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any message is an error or fatal.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any message meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity >= severity)
    }

    /// Returns messages with exactly this severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&ValidationMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .collect()
    }

    /// Returns messages produced by the rule with this id.
    #[must_use]
    pub fn by_rule(&self, rule_id: &str) -> Vec<&ValidationMessage> {
        self.messages
            .iter()
            .filter(|m| m.rule_id == rule_id)
            .collect()
    }

    /// Counts messages by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for message in &self.messages {
            match message.severity {
                Severity::Fatal => counts.fatal += 1,
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
            }
        }
        counts
    }

    /// Formats messages at or above `fail_on` as a failure report.
    ///
    /// Intended for `panic!()` messages when validation runs inside `cargo test`.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&ValidationMessage> = self
            .messages
            .iter()
            .filter(|m| m.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(report, "\n=== openapi-lint: {} message(s) ===\n", failing.len());
        for message in &failing {
            let _ = writeln!(report, "{}", message.format());
        }

        let counts = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} fatal, {} error(s), {} warning(s), {} info(s) in {} file(s)",
            counts.fatal, counts.errors, counts.warnings, counts.infos, self.files_checked
        );
        report
    }

    /// Adds the messages of another report.
    pub fn extend(&mut self, other: Self) {
        self.messages.extend(other.messages);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message(severity: Severity) -> ValidationMessage {
        ValidationMessage::new(
            "R3018",
            "EnumInsteadOfBoolean",
            severity,
            Category::RpcViolation,
            Location::new(
                "service.json",
                ObjectPath::empty()
                    .append_property("definitions")
                    .append_property("Widget"),
            ),
            "Booleans are not descriptive",
        )
    }

    #[test]
    fn severity_orders_fatal_highest() {
        assert!(Severity::Fatal > Severity::Error);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn display_includes_location_and_rule() {
        let m = make_message(Severity::Warning);
        insta::assert_snapshot!(
            m.to_string(),
            @"service.json:$.definitions.Widget: warning [R3018] Booleans are not descriptive"
        );
    }

    #[test]
    fn category_serializes_with_report_names() {
        let json = serde_json::to_string(&Category::ArmViolation).unwrap();
        assert_eq!(json, r#""ARMViolation""#);
    }

    #[test]
    fn fatal_counts_as_error() {
        let mut report = ValidationReport::new();
        report
            .messages
            .push(ValidationMessage::fatal(Path::new("bad.json"), "unreadable"));
        assert!(report.has_errors());
        assert_eq!(report.count_by_severity().fatal, 1);
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut report = ValidationReport::new();
        report.messages.push(make_message(Severity::Warning));
        assert!(!report.has_violations_at(Severity::Error));
        assert!(report.has_violations_at(Severity::Warning));
    }

    #[test]
    fn test_report_filters_by_severity() {
        let mut report = ValidationReport::new();
        report.files_checked = 2;
        report.messages.push(make_message(Severity::Warning));
        report.messages.push(make_message(Severity::Error));

        let text = report.format_test_report(Severity::Error);
        assert!(text.contains("1 message(s)"));
        assert!(text.contains("1 error(s), 1 warning(s)"));
        assert!(text.contains("= category: RPCViolation"));
    }

    #[test]
    fn extend_accumulates_files() {
        let mut a = ValidationReport::new();
        a.files_checked = 1;
        let mut b = ValidationReport::new();
        b.files_checked = 2;
        b.messages.push(make_message(Severity::Info));
        a.extend(b);
        assert_eq!(a.files_checked, 3);
        assert_eq!(a.by_rule("R3018").len(), 1);
    }
}
