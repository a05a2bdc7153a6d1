use super::ServiceDefinition;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a document from disk.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(openapi_lint::load::io))]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for the document model.
    #[error("failed to parse {path} as JSON: {source}")]
    #[diagnostic(code(openapi_lint::load::json))]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The file is not valid YAML for the document model.
    #[error("failed to parse {path} as YAML: {source}")]
    #[diagnostic(code(openapi_lint::load::yaml))]
    Yaml {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
}

impl LoadError {
    /// File the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::Yaml { path, .. } => path,
        }
    }
}

/// Parses a JSON document.
///
/// # Errors
///
/// Returns the deserializer error when the text is not a valid document.
pub fn parse_json(text: &str) -> Result<ServiceDefinition, serde_json::Error> {
    serde_json::from_str(text)
}

/// Parses a YAML document.
///
/// # Errors
///
/// Returns the deserializer error when the text is not a valid document.
pub fn parse_yaml(text: &str) -> Result<ServiceDefinition, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Reads and parses a document.
///
/// `.json` files are read as JSON and `.yaml`/`.yml` files as YAML. Any other
/// extension is tried as JSON first, then as YAML.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<ServiceDefinition, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Some editors save with a byte-order mark, which serde_json rejects.
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let json_error = |source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    };
    let yaml_error = |source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    };

    match extension.as_deref() {
        Some("json") => parse_json(text).map_err(json_error),
        Some("yaml" | "yml") => parse_yaml(text).map_err(yaml_error),
        _ => parse_json(text).or_else(|_| parse_yaml(text).map_err(yaml_error)),
    }
}
