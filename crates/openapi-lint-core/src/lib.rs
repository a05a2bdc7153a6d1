//! # openapi-lint-core
//!
//! Core engine for rule-driven structural validation of OpenAPI (Swagger 2.0)
//! documents.
//!
//! This crate provides the foundational traits and types for building
//! OpenAPI linters. It includes:
//!
//! - [`Rule`] trait for rules matched by node kind, record field or collection
//! - [`Validator`] for running a rule catalog over a document
//! - [`Messages`], the lazy walk that yields [`ValidationMessage`]s
//! - [`ResourceFacts`] and [`ClassificationPolicy`] for resource model classification
//!
//! ## Example
//!
//! ```ignore
//! use openapi_lint_core::{load_document, Flavor, PassMode, RunMetadata, Validator};
//!
//! let validator = Validator::builder()
//!     .rule(MyRule::new())
//!     .build();
//!
//! let doc = load_document(path)?;
//! let meta = RunMetadata::new(Flavor::ARM, PassMode::Individual);
//! for message in validator.validate(&doc, path, &meta) {
//!     println!("{message}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod classify;
mod config;
mod context;
mod metadata;
mod path;
mod rule;
mod types;
mod validator;
mod walker;

pub mod model;

/// Utility modules for rule implementations.
pub mod utils;

pub use catalog::{filter_rules, CollectionRule, ResolvedCatalog};
pub use classify::{ArmConventions, ClassificationPolicy, ResourceFacts};
pub use config::{Config, ConfigError, PassSelection, RuleConfig, ValidatorConfig};
pub use context::{Position, RuleContext};
pub use metadata::{Flavor, MetadataError, PassMode, RunMetadata};
pub use model::{
    load_document, Field, FieldId, LoadError, Node, NodeKind, ServiceDefinition, Shape,
};
pub use path::{ObjectPath, PathStep};
pub use rule::{format_message, Finding, Rule, RuleBox, RuleError, RuleTarget};
pub use types::{Category, Location, Severity, SeverityCounts, ValidationMessage, ValidationReport};
pub use validator::{Validator, ValidatorBuilder, ValidatorError};
pub use walker::Messages;
