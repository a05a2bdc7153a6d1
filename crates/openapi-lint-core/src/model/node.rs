//! Uniform, borrowed view over document nodes.
//!
//! The walker never matches on model types directly. It asks a [`Node`] for
//! its [`NodeKind`] (to pick rules) and its [`Shape`] (to find children).

use super::{
    AdditionalProperties, Extensions, Info, Operation, Parameter, PathItem, Response, Schema,
    ServiceDefinition, Tag,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Type tag of a node. Type-targeted rules are registered against these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum NodeKind {
    Document,
    Info,
    Tags,
    Tag,
    Paths,
    PathItem,
    Operations,
    Operation,
    Parameters,
    ParameterMap,
    Parameter,
    Responses,
    Response,
    SchemaMap,
    Schemas,
    Schema,
    Strings,
    String,
    Boolean,
    Any,
    AnyList,
    AnyMap,
}

impl NodeKind {
    /// Stable name used in rule listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Info => "info",
            Self::Tags => "tags",
            Self::Tag => "tag",
            Self::Paths => "paths",
            Self::PathItem => "path-item",
            Self::Operations => "operations",
            Self::Operation => "operation",
            Self::Parameters => "parameters",
            Self::ParameterMap => "parameter-map",
            Self::Parameter => "parameter",
            Self::Responses => "responses",
            Self::Response => "response",
            Self::SchemaMap => "schema-map",
            Self::Schemas => "schemas",
            Self::Schema => "schema",
            Self::Strings => "strings",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::AnyList => "any-list",
            Self::AnyMap => "any-map",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared field: the record kind that owns it plus its document name.
///
/// Field-targeted rules and collection rules are registered against these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    /// Kind of the record declaring the field.
    pub owner: NodeKind,
    /// Field name as written in documents.
    pub name: &'static str,
}

#[allow(missing_docs)]
impl FieldId {
    pub const DOCUMENT_CONSUMES: Self = Self::new(NodeKind::Document, "consumes");
    pub const DOCUMENT_PRODUCES: Self = Self::new(NodeKind::Document, "produces");
    pub const DOCUMENT_PATHS: Self = Self::new(NodeKind::Document, "paths");
    pub const DOCUMENT_DEFINITIONS: Self = Self::new(NodeKind::Document, "definitions");
    pub const DOCUMENT_PARAMETERS: Self = Self::new(NodeKind::Document, "parameters");
    pub const DOCUMENT_RESPONSES: Self = Self::new(NodeKind::Document, "responses");
    pub const DOCUMENT_SECURITY_DEFINITIONS: Self =
        Self::new(NodeKind::Document, "securityDefinitions");
    pub const OPERATION_CONSUMES: Self = Self::new(NodeKind::Operation, "consumes");
    pub const OPERATION_PRODUCES: Self = Self::new(NodeKind::Operation, "produces");
    pub const OPERATION_PARAMETERS: Self = Self::new(NodeKind::Operation, "parameters");
    pub const OPERATION_RESPONSES: Self = Self::new(NodeKind::Operation, "responses");
    pub const SCHEMA_PROPERTIES: Self = Self::new(NodeKind::Schema, "properties");

    /// Creates a field identifier.
    #[must_use]
    pub const fn new(owner: NodeKind, name: &'static str) -> Self {
        Self { owner, name }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Borrowed reference to any node of a loaded document.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub enum Node<'a> {
    Document(&'a ServiceDefinition),
    Info(&'a Info),
    Tags(&'a [Tag]),
    Tag(&'a Tag),
    Paths(&'a IndexMap<String, PathItem>),
    PathItem(&'a PathItem),
    Operations(&'a IndexMap<String, Operation>),
    Operation(&'a Operation),
    Parameters(&'a [Parameter]),
    ParameterMap(&'a IndexMap<String, Parameter>),
    Parameter(&'a Parameter),
    Responses(&'a IndexMap<String, Response>),
    Response(&'a Response),
    SchemaMap(&'a IndexMap<String, Schema>),
    Schemas(&'a [Schema]),
    Schema(&'a Schema),
    Strings(&'a [String]),
    String(&'a str),
    Boolean(bool),
    Any(&'a Value),
    AnyList(&'a [Value]),
    AnyMap(&'a Extensions),
}

/// One field of a record node.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// Field identity.
    pub id: FieldId,
    /// Field value.
    pub node: Node<'a>,
    /// When false the walker visits the value but not its children.
    pub traversable: bool,
    /// Catch-all field whose entries belong to the owning record; it adds no path step.
    pub inline: bool,
}

/// How a node's children are laid out.
#[derive(Debug, Clone)]
pub enum Shape<'a> {
    /// No children.
    Leaf,
    /// Ordered children addressed by index.
    Sequence(Vec<Node<'a>>),
    /// Children addressed by key. Entries of a non-traversable map are
    /// visited as leaves.
    Map {
        /// Entries in document order.
        entries: Vec<(&'a str, Node<'a>)>,
        /// Whether entry values are descended into.
        traversable: bool,
    },
    /// Declared fields in declaration order.
    Record(Vec<Field<'a>>),
}

impl<'a> Node<'a> {
    /// Type tag of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document(_) => NodeKind::Document,
            Self::Info(_) => NodeKind::Info,
            Self::Tags(_) => NodeKind::Tags,
            Self::Tag(_) => NodeKind::Tag,
            Self::Paths(_) => NodeKind::Paths,
            Self::PathItem(_) => NodeKind::PathItem,
            Self::Operations(_) => NodeKind::Operations,
            Self::Operation(_) => NodeKind::Operation,
            Self::Parameters(_) => NodeKind::Parameters,
            Self::ParameterMap(_) => NodeKind::ParameterMap,
            Self::Parameter(_) => NodeKind::Parameter,
            Self::Responses(_) => NodeKind::Responses,
            Self::Response(_) => NodeKind::Response,
            Self::SchemaMap(_) => NodeKind::SchemaMap,
            Self::Schemas(_) => NodeKind::Schemas,
            Self::Schema(_) => NodeKind::Schema,
            Self::Strings(_) => NodeKind::Strings,
            Self::String(_) => NodeKind::String,
            Self::Boolean(_) => NodeKind::Boolean,
            Self::Any(_) => NodeKind::Any,
            Self::AnyList(_) => NodeKind::AnyList,
            Self::AnyMap(_) => NodeKind::AnyMap,
        }
    }

    /// String value of a `String` node or a string-valued `Any` node.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::String(s) => Some(s),
            Self::Any(v) => v.as_str(),
            _ => None,
        }
    }

    /// Children of this node.
    #[must_use]
    pub fn shape(&self) -> Shape<'a> {
        match *self {
            Self::Document(doc) => Shape::Record(document_fields(doc)),
            Self::Info(info) => Shape::Record(
                Fields::new(NodeKind::Info)
                    .text("title", info.title.as_deref())
                    .text("version", info.version.as_deref())
                    .text("description", info.description.as_deref())
                    .extensions(&info.extensions)
                    .finish(),
            ),
            Self::Tag(tag) => Shape::Record(
                Fields::new(NodeKind::Tag)
                    .text("name", tag.name.as_deref())
                    .text("description", tag.description.as_deref())
                    .extensions(&tag.extensions)
                    .finish(),
            ),
            Self::PathItem(item) => Shape::Record(
                Fields::new(NodeKind::PathItem)
                    .inline("operations", Node::Operations(&item.operations))
                    .node("parameters", Node::Parameters(&item.parameters))
                    .extensions(&item.extensions)
                    .finish(),
            ),
            Self::Operation(op) => Shape::Record(operation_fields(op)),
            Self::Parameter(param) => Shape::Record(parameter_fields(param)),
            Self::Response(response) => Shape::Record(
                Fields::new(NodeKind::Response)
                    .text("$ref", response.reference.as_deref())
                    .text("description", response.description.as_deref())
                    .optional("schema", response.schema.as_ref().map(Node::Schema))
                    .node("headers", Node::AnyMap(&response.headers))
                    .extensions(&response.extensions)
                    .finish(),
            ),
            Self::Schema(schema) => Shape::Record(schema_fields(schema)),

            Self::Tags(tags) => Shape::Sequence(tags.iter().map(Node::Tag).collect()),
            Self::Parameters(params) => {
                Shape::Sequence(params.iter().map(Node::Parameter).collect())
            }
            Self::Schemas(schemas) => Shape::Sequence(schemas.iter().map(Node::Schema).collect()),
            Self::Strings(values) => {
                Shape::Sequence(values.iter().map(|s| Node::String(s)).collect())
            }
            Self::AnyList(values) => Shape::Sequence(values.iter().map(Node::Any).collect()),

            Self::Paths(map) => traversable_map(map, Node::PathItem),
            Self::Operations(map) => traversable_map(map, Node::Operation),
            Self::ParameterMap(map) => traversable_map(map, Node::Parameter),
            Self::Responses(map) => traversable_map(map, Node::Response),
            Self::SchemaMap(map) => traversable_map(map, Node::Schema),
            Self::AnyMap(map) => Shape::Map {
                entries: map.iter().map(|(k, v)| (k.as_str(), Node::Any(v))).collect(),
                traversable: false,
            },

            Self::Any(Value::Array(items)) => Shape::Sequence(items.iter().map(Node::Any).collect()),
            Self::Any(Value::Object(map)) => Shape::Map {
                entries: map.iter().map(|(k, v)| (k.as_str(), Node::Any(v))).collect(),
                traversable: false,
            },
            Self::Any(_) | Self::String(_) | Self::Boolean(_) => Shape::Leaf,
        }
    }
}

fn traversable_map<'a, T>(map: &'a IndexMap<String, T>, wrap: fn(&'a T) -> Node<'a>) -> Shape<'a> {
    Shape::Map {
        entries: map.iter().map(|(k, v)| (k.as_str(), wrap(v))).collect(),
        traversable: true,
    }
}

fn document_fields(doc: &ServiceDefinition) -> Vec<Field<'_>> {
    Fields::new(NodeKind::Document)
        .text("swagger", doc.swagger.as_deref())
        .optional("info", doc.info.as_ref().map(Node::Info))
        .text("host", doc.host.as_deref())
        .text("basePath", doc.base_path.as_deref())
        .node("schemes", Node::Strings(&doc.schemes))
        .node("consumes", Node::Strings(&doc.consumes))
        .node("produces", Node::Strings(&doc.produces))
        .node("paths", Node::Paths(&doc.paths))
        .node("definitions", Node::SchemaMap(&doc.definitions))
        .node("parameters", Node::ParameterMap(&doc.parameters))
        .node("responses", Node::Responses(&doc.responses))
        .node("securityDefinitions", Node::AnyMap(&doc.security_definitions))
        .node("tags", Node::Tags(&doc.tags))
        .extensions(&doc.extensions)
        .finish()
}

fn operation_fields(op: &Operation) -> Vec<Field<'_>> {
    Fields::new(NodeKind::Operation)
        .text("operationId", op.operation_id.as_deref())
        .text("summary", op.summary.as_deref())
        .text("description", op.description.as_deref())
        .node("tags", Node::Strings(&op.tags))
        .node("consumes", Node::Strings(&op.consumes))
        .node("produces", Node::Strings(&op.produces))
        .node("parameters", Node::Parameters(&op.parameters))
        .node("responses", Node::Responses(&op.responses))
        .leaf("deprecated", Node::Boolean(op.deprecated))
        .extensions(&op.extensions)
        .finish()
}

fn parameter_fields(param: &Parameter) -> Vec<Field<'_>> {
    Fields::new(NodeKind::Parameter)
        .text("$ref", param.reference.as_deref())
        .text("name", param.name.as_deref())
        .text("in", param.location.map(|l| l.as_str()))
        .text("description", param.description.as_deref())
        .leaf("required", Node::Boolean(param.required))
        .text("type", param.data_type.map(|t| t.as_str()))
        .text("format", param.format.as_deref())
        .optional("schema", param.schema.as_deref().map(Node::Schema))
        .optional("items", param.items.as_deref().map(Node::Schema))
        .node("enum", Node::AnyList(&param.enum_values))
        .optional_leaf("default", param.default.as_ref().map(Node::Any))
        .extensions(&param.extensions)
        .finish()
}

fn schema_fields(schema: &Schema) -> Vec<Field<'_>> {
    Fields::new(NodeKind::Schema)
        .text("$ref", schema.reference.as_deref())
        .text("type", schema.data_type.map(|t| t.as_str()))
        .text("format", schema.format.as_deref())
        .text("title", schema.title.as_deref())
        .text("description", schema.description.as_deref())
        .node("properties", Node::SchemaMap(&schema.properties))
        .node("required", Node::Strings(&schema.required))
        .optional("items", schema.items.as_deref().map(Node::Schema))
        .node("allOf", Node::Schemas(&schema.all_of))
        .additional_properties(schema.additional_properties.as_ref())
        .optional_leaf("default", schema.default.as_ref().map(Node::Any))
        .node("enum", Node::AnyList(&schema.enum_values))
        .leaf("readOnly", Node::Boolean(schema.read_only))
        .text("discriminator", schema.discriminator.as_deref())
        .extensions(&schema.extensions)
        .finish()
}

/// Accumulates the fields of one record. Absent optional fields are skipped.
struct Fields<'a> {
    owner: NodeKind,
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    fn new(owner: NodeKind) -> Self {
        Self {
            owner,
            fields: Vec::new(),
        }
    }

    fn push(mut self, name: &'static str, node: Node<'a>, traversable: bool, inline: bool) -> Self {
        self.fields.push(Field {
            id: FieldId::new(self.owner, name),
            node,
            traversable,
            inline,
        });
        self
    }

    fn node(self, name: &'static str, node: Node<'a>) -> Self {
        self.push(name, node, true, false)
    }

    fn leaf(self, name: &'static str, node: Node<'a>) -> Self {
        self.push(name, node, false, false)
    }

    fn inline(self, name: &'static str, node: Node<'a>) -> Self {
        self.push(name, node, true, true)
    }

    fn optional(self, name: &'static str, node: Option<Node<'a>>) -> Self {
        match node {
            Some(node) => self.node(name, node),
            None => self,
        }
    }

    fn optional_leaf(self, name: &'static str, node: Option<Node<'a>>) -> Self {
        match node {
            Some(node) => self.leaf(name, node),
            None => self,
        }
    }

    fn additional_properties(self, value: Option<&'a AdditionalProperties>) -> Self {
        match value {
            Some(AdditionalProperties::Schema(schema)) => {
                self.node("additionalProperties", Node::Schema(schema))
            }
            Some(AdditionalProperties::Allowed(allowed)) => {
                self.leaf("additionalProperties", Node::Boolean(*allowed))
            }
            None => self,
        }
    }

        fn text(self, name: &'static str, value: Option<&'a str>) -> Self {
        self.optional_leaf(name, value.map(Node::String))
    }

    fn extensions(self, map: &'a Extensions) -> Self {
        self.inline("extensions", Node::AnyMap(map))
    }

    fn finish(self) -> Vec<Field<'a>> {
        self.fields
    }
}
