//! Model hierarchy queries over a definitions table.
//!
//! A model's hierarchy is the model itself followed by every model reachable
//! through `allOf` references, depth first in declaration order. Reference
//! cycles are tolerated.

use crate::model::{DataType, Schema};
use indexmap::{IndexMap, IndexSet};

type Definitions = IndexMap<String, Schema>;

/// Names of `model` and all of its `allOf` ancestors that exist in `definitions`.
#[must_use]
pub fn model_hierarchy<'a>(model: &'a str, definitions: &'a Definitions) -> Vec<&'a str> {
    let mut seen: IndexSet<&'a str> = IndexSet::new();
    let mut queue = vec![model];

    while let Some(name) = queue.pop() {
        let Some((key, schema)) = definitions.get_key_value(name) else {
            continue;
        };
        if !seen.insert(key.as_str()) {
            continue;
        }
        // Reverse so that the first allOf entry is visited first.
        queue.extend(schema.all_of.iter().rev().filter_map(Schema::reference_name));
    }

    seen.into_iter().collect()
}

/// Returns true if `property` is declared anywhere in the hierarchy of `model`.
#[must_use]
pub fn hierarchy_has_property(model: &str, definitions: &Definitions, property: &str) -> bool {
    model_hierarchy(model, definitions).iter().any(|name| {
        definitions
            .get(*name)
            .is_some_and(|s| s.properties.contains_key(property) || inline_all_of_has(s, property))
    })
}

/// Returns true if `property` is required anywhere in the hierarchy of `model`.
#[must_use]
pub fn hierarchy_requires(model: &str, definitions: &Definitions, property: &str) -> bool {
    required_properties(model, definitions).contains(&property)
}

/// Required property names across the hierarchy of `model`, first declaration wins.
#[must_use]
pub fn required_properties<'a>(model: &'a str, definitions: &'a Definitions) -> Vec<&'a str> {
    let mut names: IndexSet<&'a str> = IndexSet::new();
    for name in model_hierarchy(model, definitions) {
        if let Some(schema) = definitions.get(name) {
            names.extend(schema.required.iter().map(String::as_str));
        }
    }
    names.into_iter().collect()
}

/// `(declaring model, property name)` for every property with a default value
/// across the hierarchy of `model`.
#[must_use]
pub fn default_valued_properties<'a>(
    model: &'a str,
    definitions: &'a Definitions,
) -> Vec<(&'a str, &'a str)> {
    let mut found = Vec::new();
    for name in model_hierarchy(model, definitions) {
        let Some(schema) = definitions.get(name) else {
            continue;
        };
        for (prop, prop_schema) in &schema.properties {
            if prop_schema.default.is_some() && !found.iter().any(|(_, p)| *p == prop.as_str()) {
                found.push((name, prop.as_str()));
            }
        }
    }
    found
}

/// Returns true if `reference` names a definition whose type is `data_type`.
#[must_use]
pub fn is_reference_of_type(reference: &str, definitions: &Definitions, data_type: DataType) -> bool {
    crate::model::strip_definition_ref(reference)
        .and_then(|name| definitions.get(name))
        .is_some_and(|s| s.data_type == Some(data_type))
}

/// Names of models marked with `x-ms-azure-resource: true`.
#[must_use]
pub fn xms_azure_resource_models(definitions: &Definitions) -> Vec<&str> {
    definitions
        .iter()
        .filter(|(_, schema)| schema.extension_flag("x-ms-azure-resource"))
        .map(|(name, _)| name.as_str())
        .collect()
}

fn inline_all_of_has(schema: &Schema, property: &str) -> bool {
    schema
        .all_of
        .iter()
        .filter(|s| s.reference.is_none())
        .any(|s| s.properties.contains_key(property))
}
