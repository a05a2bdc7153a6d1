//! Resource classification of a document's models.
//!
//! Which definitions are resources, and of which kind, is decided by a
//! [`ClassificationPolicy`]. The result is an immutable [`ResourceFacts`]
//! shared by every rule invocation of a run.

use crate::model::{Schema, ServiceDefinition};
use crate::utils::hierarchy::{
    hierarchy_has_property, hierarchy_requires, model_hierarchy, xms_azure_resource_models,
};
use crate::utils::resource_paths::{is_subscription_scoped, ResourcePath};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::debug;

/// Resource classification of one document.
///
/// Every tracked, tenant and child/parent name is also a resource model, and
/// `proxy` and `tracked` partition the resource models. [`ResourceFacts::new`]
/// enforces this by dropping names that are not resource models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFacts {
    resource: IndexSet<String>,
    tracked: IndexSet<String>,
    proxy: IndexSet<String>,
    tenant: IndexSet<String>,
    parent_tracked: IndexSet<String>,
    child_tracked: IndexSet<(String, String)>,
}

impl ResourceFacts {
    /// Builds facts from a policy's raw findings.
    ///
    /// `proxy` is derived as `resource - tracked` and `parent_tracked` as the
    /// tracked models that are not the child in any `(child, parent)` pair.
    #[must_use]
    pub fn new(
        resource: IndexSet<String>,
        tracked: impl IntoIterator<Item = String>,
        tenant: impl IntoIterator<Item = String>,
        child_tracked: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let tracked: IndexSet<String> = tracked
            .into_iter()
            .filter(|m| resource.contains(m))
            .collect();
        let tenant: IndexSet<String> = tenant.into_iter().filter(|m| tracked.contains(m)).collect();
        let child_tracked: IndexSet<(String, String)> = child_tracked
            .into_iter()
            .filter(|(child, parent)| resource.contains(child) && resource.contains(parent))
            .collect();
        let proxy = resource.difference(&tracked).cloned().collect();
        let children: HashSet<&str> = child_tracked.iter().map(|(c, _)| c.as_str()).collect();
        let parent_tracked = tracked
            .iter()
            .filter(|m| !children.contains(m.as_str()))
            .cloned()
            .collect();

        Self {
            resource,
            tracked,
            proxy,
            tenant,
            parent_tracked,
            child_tracked,
        }
    }

    /// Models recognized as resources.
    #[must_use]
    pub fn resource_models(&self) -> &IndexSet<String> {
        &self.resource
    }

    /// Resources with an independent, location-bearing lifecycle.
    #[must_use]
    pub fn tracked_resource_models(&self) -> &IndexSet<String> {
        &self.tracked
    }

    /// Resources that are not tracked.
    #[must_use]
    pub fn proxy_resource_models(&self) -> &IndexSet<String> {
        &self.proxy
    }

    /// Tracked resources addressed above subscription level.
    #[must_use]
    pub fn tenant_resource_models(&self) -> &IndexSet<String> {
        &self.tenant
    }

    /// Tracked resources that are not nested under another tracked resource.
    #[must_use]
    pub fn parent_tracked_resource_models(&self) -> &IndexSet<String> {
        &self.parent_tracked
    }

    /// `(child, parent)` pairs of nested tracked resources.
    #[must_use]
    pub fn child_tracked_resource_models(&self) -> &IndexSet<(String, String)> {
        &self.child_tracked
    }

    /// Returns true if `model` is a tracked resource.
    #[must_use]
    pub fn is_tracked(&self, model: &str) -> bool {
        self.tracked.contains(model)
    }
}

/// Decides how a document's models are classified.
///
/// Policies never fail: missing or malformed data yields empty sets.
pub trait ClassificationPolicy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Classifies the models of `doc`.
    fn classify(&self, doc: &ServiceDefinition) -> ResourceFacts;
}

/// Resource-manager naming and path conventions.
///
/// - **Resource**: returned by a PUT (200/201); returned by a GET (200) and
///   deriving from a model named `Resource`; deriving from a model marked
///   `x-ms-azure-resource`; or a model no other model derives from whose
///   hierarchy declares `id`, `name` and `type`.
/// - **Tracked**: a resource whose hierarchy requires `location`, or declares
///   both `location` and `tags`.
/// - **Tenant**: a tracked resource all of whose GET/PUT paths lie outside
///   any subscription or resource group.
/// - **Child**: a tracked resource whose instance path extends another
///   tracked resource's instance path by exactly one `type/{name}` pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmConventions;

const ENVELOPE_PROPERTIES: [&str; 3] = ["id", "name", "type"];

impl ClassificationPolicy for ArmConventions {
    fn name(&self) -> &'static str {
        "arm-conventions"
    }

    fn classify(&self, doc: &ServiceDefinition) -> ResourceFacts {
        let definitions = &doc.definitions;
        let put_models = response_models(doc, "put", &["200", "201"]);
        let get_models = response_models(doc, "get", &["200"]);
        let marked: HashSet<&str> = xms_azure_resource_models(definitions).into_iter().collect();
        let base_models = base_models(definitions);

        let resource: IndexSet<String> = definitions
            .keys()
            .filter(|name| {
                let name = name.as_str();
                let hierarchy = model_hierarchy(name, definitions);
                let ancestors = hierarchy.get(1..).unwrap_or_default();
                put_models.contains(name)
                    || (get_models.contains(name)
                        && ancestors.iter().any(|a| a.eq_ignore_ascii_case("Resource")))
                    || ancestors.iter().any(|a| marked.contains(a))
                    || (!base_models.contains(name)
                        && !marked.contains(name)
                        && ENVELOPE_PROPERTIES
                            .iter()
                            .all(|p| hierarchy_has_property(name, definitions, p)))
            })
            .cloned()
            .collect();

        let tracked: Vec<String> = resource
            .iter()
            .filter(|name| {
                hierarchy_requires(name, definitions, "location")
                    || (hierarchy_has_property(name, definitions, "location")
                        && hierarchy_has_property(name, definitions, "tags"))
            })
            .cloned()
            .collect();

        let tenant: Vec<String> = tracked
            .iter()
            .filter(|name| {
                let paths = instance_paths(doc, name);
                !paths.is_empty() && paths.iter().all(|p| !is_subscription_scoped(p))
            })
            .cloned()
            .collect();

        let canonical: Vec<(&String, ResourcePath<'_>)> = tracked
            .iter()
            .filter_map(|name| {
                instance_paths(doc, name)
                    .into_iter()
                    .filter_map(ResourcePath::parse)
                    .find(|p| !p.is_collection())
                    .map(|p| (name, p))
            })
            .collect();
        let children: Vec<(String, String)> = canonical
            .iter()
            .flat_map(|(child, child_path)| {
                canonical
                    .iter()
                    .filter(move |(_, parent_path)| child_path.is_child_of(parent_path))
                    .map(move |(parent, _)| ((*child).clone(), (*parent).clone()))
            })
            .collect();

        let facts = ResourceFacts::new(resource, tracked, tenant, children);
        debug!(
            policy = self.name(),
            resources = facts.resource_models().len(),
            tracked = facts.tracked_resource_models().len(),
            tenant = facts.tenant_resource_models().len(),
            children = facts.child_tracked_resource_models().len(),
            "Classified resource models"
        );
        facts
    }
}

/// Models referenced by the given responses of operations using `verb`.
fn response_models<'a>(
    doc: &'a ServiceDefinition,
    verb: &'a str,
    statuses: &[&str],
) -> HashSet<&'a str> {
    doc.operations_by_verb(verb)
        .flat_map(|(_, op)| statuses.iter().filter_map(move |s| op.response_model(s)))
        .filter(|m| doc.definitions.contains_key(*m))
        .collect()
}

/// Models that another model names as an `allOf` parent.
fn base_models(definitions: &IndexMap<String, Schema>) -> HashSet<&str> {
    definitions
        .values()
        .flat_map(|s| s.all_of.iter().filter_map(Schema::reference_name))
        .collect()
}

/// Paths whose GET (200) or PUT (200/201) returns `model`, in document order.
fn instance_paths<'a>(doc: &'a ServiceDefinition, model: &str) -> Vec<&'a str> {
    doc.operations()
        .filter(|(_, verb, op)| {
            let statuses: &[&str] = if verb.eq_ignore_ascii_case("get") {
                &["200"]
            } else if verb.eq_ignore_ascii_case("put") {
                &["200", "201"]
            } else {
                &[]
            };
            statuses.iter().any(|s| op.response_model(s) == Some(model))
        })
        .map(|(path, _, _)| path)
        .fold(Vec::new(), |mut paths, path| {
            if !paths.contains(&path) {
                paths.push(path);
            }
            paths
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = r##"{
        "swagger": "2.0",
        "paths": {
            "/subscriptions/{subscriptionId}/resourceGroups/{rg}/providers/Microsoft.Test/widgets/{widgetName}": {
                "get": { "operationId": "Widgets_Get", "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } },
                "put": { "operationId": "Widgets_Create", "responses": { "200": { "schema": { "$ref": "#/definitions/Widget" } } } }
            },
            "/subscriptions/{subscriptionId}/resourceGroups/{rg}/providers/Microsoft.Test/widgets/{widgetName}/gears/{gearName}": {
                "get": { "operationId": "Gears_Get", "responses": { "200": { "schema": { "$ref": "#/definitions/Gear" } } } }
            },
            "/providers/Microsoft.Test/tenants/{tenantName}": {
                "put": { "operationId": "Tenants_Create", "responses": { "201": { "schema": { "$ref": "#/definitions/TenantThing" } } } }
            },
            "/subscriptions/{subscriptionId}/providers/Microsoft.Test/settings/{name}": {
                "get": { "operationId": "Settings_Get", "responses": { "200": { "schema": { "$ref": "#/definitions/Setting" } } } }
            }
        },
        "definitions": {
            "Resource": {
                "x-ms-azure-resource": true,
                "properties": {
                    "id": { "type": "string" }, "name": { "type": "string" }, "type": { "type": "string" },
                    "location": { "type": "string" }, "tags": { "type": "object" }
                }
            },
            "ProxyBase": {
                "x-ms-azure-resource": true,
                "properties": { "id": { "type": "string" }, "name": { "type": "string" }, "type": { "type": "string" } }
            },
            "Widget": { "allOf": [{ "$ref": "#/definitions/Resource" }] },
            "Gear": { "allOf": [{ "$ref": "#/definitions/Resource" }], "required": ["location"] },
            "TenantThing": { "allOf": [{ "$ref": "#/definitions/Resource" }] },
            "Setting": { "allOf": [{ "$ref": "#/definitions/ProxyBase" }] },
            "Envelope": {
                "properties": { "id": { "type": "string" }, "name": { "type": "string" }, "type": { "type": "string" } }
            },
            "Plain": { "properties": { "value": { "type": "string" } } }
        }
    }"##;

    fn classify() -> ResourceFacts {
        let doc = crate::model::parse_json(SERVICE).unwrap();
        ArmConventions.classify(&doc)
    }

    fn names(set: &IndexSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn recognizes_resource_models() {
        let facts = classify();
        assert_eq!(
            names(facts.resource_models()),
            ["Widget", "Gear", "TenantThing", "Setting", "Envelope"]
        );
    }

    #[test]
    fn splits_tracked_and_proxy() {
        let facts = classify();
        assert_eq!(names(facts.tracked_resource_models()), ["Widget", "Gear", "TenantThing"]);
        assert_eq!(names(facts.proxy_resource_models()), ["Setting", "Envelope"]);
    }

    #[test]
    fn tracked_and_proxy_partition_resources() {
        let facts = classify();
        let tracked = facts.tracked_resource_models();
        let proxy = facts.proxy_resource_models();
        assert!(tracked.is_disjoint(proxy));
        let union: IndexSet<&String> = tracked.iter().chain(proxy).collect();
        assert_eq!(union.len(), facts.resource_models().len());
    }

    #[test]
    fn detects_tenant_and_children() {
        let facts = classify();
        assert_eq!(names(facts.tenant_resource_models()), ["TenantThing"]);
        assert_eq!(
            facts.child_tracked_resource_models().iter().collect::<Vec<_>>(),
            [&("Gear".to_string(), "Widget".to_string())]
        );
        assert_eq!(
            names(facts.parent_tracked_resource_models()),
            ["Widget", "TenantThing"]
        );
    }

    #[test]
    fn empty_document_yields_empty_facts() {
        let facts = ArmConventions.classify(&ServiceDefinition::default());
        assert_eq!(facts, ResourceFacts::default());
    }

    #[test]
    fn constructor_drops_names_outside_resources() {
        let resource: IndexSet<String> = ["A".to_string()].into_iter().collect();
        let facts = ResourceFacts::new(
            resource,
            ["A".to_string(), "Stray".to_string()],
            ["Stray".to_string()],
            [("Stray".to_string(), "A".to_string())],
        );
        assert_eq!(names(facts.tracked_resource_models()), ["A"]);
        assert!(facts.tenant_resource_models().is_empty());
        assert!(facts.child_tracked_resource_models().is_empty());
    }
}
