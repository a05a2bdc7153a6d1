//! Swagger 2.0 document model.
//!
//! Only what the rules and the walker look at is modeled as typed fields.
//! Everything else a record carries (vendor `x-*` keys and anything
//! unrecognized) lands in its `extensions` catch-all, keeping document order.

mod load;
mod node;

pub use load::{load_document, parse_json, parse_yaml, LoadError};
pub use node::{Field, FieldId, Node, NodeKind, Shape};

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Untyped key/value data (`any`-valued map).
pub type Extensions = IndexMap<String, Value>;

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const PARAMETERS_PREFIX: &str = "#/parameters/";

/// Strips the `#/definitions/` prefix from a model reference.
#[must_use]
pub fn strip_definition_ref(reference: &str) -> Option<&str> {
    reference
        .rsplit_once(DEFINITIONS_PREFIX)
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
}

/// Strips the `#/parameters/` prefix from a parameter reference.
#[must_use]
pub fn strip_parameter_ref(reference: &str) -> Option<&str> {
    reference
        .rsplit_once(PARAMETERS_PREFIX)
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
}

/// Root of a service definition document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    /// Swagger version string (`"2.0"`).
    pub swagger: Option<String>,
    /// Document metadata.
    pub info: Option<Info>,
    /// Host serving the API.
    pub host: Option<String>,
    /// Base path prefix.
    pub base_path: Option<String>,
    /// Transfer protocols.
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Global request MIME types.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Global response MIME types.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Path table: path template to verb map.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Model definitions by name.
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    /// Shared parameters by name.
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    /// Shared responses by name.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Security schemes. Kept untyped.
    #[serde(default)]
    pub security_definitions: Extensions,
    /// Tag declarations.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Vendor extensions and unrecognized keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ServiceDefinition {
    /// Iterates `(path, verb, operation)` for every operation in the path table.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(verb, op)| (path.as_str(), verb.as_str(), op))
        })
    }

    /// Iterates `(path, operation)` for every operation using `verb` (case-insensitive).
    pub fn operations_by_verb<'a>(
        &'a self,
        verb: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Operation)> + 'a {
        self.operations()
            .filter(move |(_, v, _)| v.eq_ignore_ascii_case(verb))
            .map(|(path, _, op)| (path, op))
    }

    /// Finds the path and verb declaring `operation_id`.
    #[must_use]
    pub fn find_operation(&self, operation_id: &str) -> Option<(&str, &str)> {
        self.operations()
            .find(|(_, _, op)| op.operation_id.as_deref() == Some(operation_id))
            .map(|(path, verb, _)| (path, verb))
    }

    /// Resolves a `#/parameters/...` reference against the shared parameters.
    #[must_use]
    pub fn resolve_parameter<'a>(&'a self, parameter: &'a Parameter) -> &'a Parameter {
        parameter
            .reference
            .as_deref()
            .and_then(strip_parameter_ref)
            .and_then(|name| self.parameters.get(name))
            .unwrap_or(parameter)
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    /// API title.
    pub title: Option<String>,
    /// API version.
    pub version: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Tag declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// All operations declared under one path template.
///
/// Verbs live in [`PathItem::operations`]; in the document they sit next to
/// `parameters` and `x-*` keys, so deserialization splits them apart.
#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Operations keyed by HTTP verb as written.
    pub operations: IndexMap<String, Operation>,
    /// Parameters shared by every operation of this path.
    pub parameters: Vec<Parameter>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut item = Self::default();
        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)
                    .map_err(|e| D::Error::custom(format!("path parameters: {e}")))?;
            } else if key.starts_with("x-") || key == "$ref" {
                item.extensions.insert(key, value);
            } else {
                let operation = serde_json::from_value(value)
                    .map_err(|e| D::Error::custom(format!("operation `{key}`: {e}")))?;
                item.operations.insert(key, operation);
            }
        }
        Ok(item)
    }
}

/// A single HTTP operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier, e.g. `Widgets_Get`.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Request MIME types.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Response MIME types.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Deprecation marker.
    #[serde(default)]
    pub deprecated: bool,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Operation {
    /// Model name referenced by the schema of response `status`.
    #[must_use]
    pub fn response_model(&self, status: &str) -> Option<&str> {
        self.responses
            .get(status)
            .and_then(|r| r.schema.as_ref())
            .and_then(Schema::reference_name)
    }

    /// Returns true when the operation carries a non-null `x-ms-pageable` extension.
    #[must_use]
    pub fn is_pageable(&self) -> bool {
        self.extensions
            .get("x-ms-pageable")
            .is_some_and(|v| !v.is_null())
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Path segment.
    Path,
    /// Form field.
    FormData,
    /// Request body.
    Body,
}

impl ParameterLocation {
    /// Name as written in documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Path => "path",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }
}

/// Primitive or structural data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `file`
    File,
    /// `null`
    Null,
}

impl DataType {
    /// Name as written in documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::File => "file",
            Self::Null => "null",
        }
    }
}

/// Operation or shared parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// `$ref` to a shared parameter.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Parameter name.
    pub name: Option<String>,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: Option<ParameterLocation>,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Primitive type (non-body parameters).
    #[serde(rename = "type")]
    pub data_type: Option<DataType>,
    /// Type format, e.g. `uuid`.
    pub format: Option<String>,
    /// Body schema.
    pub schema: Option<Box<Schema>>,
    /// Array item type.
    pub items: Option<Box<Schema>>,
    /// Allowed values.
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    /// Default value.
    pub default: Option<Value>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Parameter {
    /// Returns true for `in: body`.
    #[must_use]
    pub fn is_body(&self) -> bool {
        self.location == Some(ParameterLocation::Body)
    }
}

/// Operation or shared response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    /// `$ref` to a shared response.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Response body schema.
    pub schema: Option<Schema>,
    /// Response headers. Kept untyped.
    #[serde(default)]
    pub headers: Extensions,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// JSON schema subset used by Swagger 2.0.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref` to a model definition.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Data type.
    #[serde(rename = "type")]
    pub data_type: Option<DataType>,
    /// Type format, e.g. `uuid`.
    pub format: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Object properties.
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    /// Required property names.
    #[serde(default)]
    pub required: Vec<String>,
    /// Array item schema.
    pub items: Option<Box<Schema>>,
    /// Composition parents.
    #[serde(default)]
    pub all_of: Vec<Schema>,
    /// Dictionary value schema, or `true`/`false`.
    pub additional_properties: Option<AdditionalProperties>,
    /// Default value.
    pub default: Option<Value>,
    /// Allowed values.
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    /// Read-only marker.
    #[serde(default)]
    pub read_only: bool,
    /// Discriminator property name.
    pub discriminator: Option<String>,
    /// Vendor extensions.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// The `additionalProperties` of an object schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// Any (`true`) or no (`false`) extra properties.
    Allowed(bool),
    /// Extra properties must match this schema.
    Schema(Box<Schema>),
}

impl AdditionalProperties {
    /// The value schema, if one is declared.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Allowed(_) => None,
            Self::Schema(schema) => Some(schema),
        }
    }
}

impl Schema {
    /// Model name this schema references, without the `#/definitions/` prefix.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        self.reference.as_deref().and_then(strip_definition_ref)
    }

    /// Returns true if the schema describes an object with structure.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.data_type == Some(DataType::Object)
            || !self.properties.is_empty()
            || !self.all_of.is_empty()
    }

    /// Reads a boolean vendor extension, treating absence as `false`.
    #[must_use]
    pub fn extension_flag(&self, name: &str) -> bool {
        self.extensions
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
