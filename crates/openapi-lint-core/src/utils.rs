//! Helper functions shared by rule implementations and the classifier.

pub mod hierarchy;
pub mod naming;
pub mod resource_paths;

#[doc(inline)]
pub use hierarchy::{
    default_valued_properties, hierarchy_has_property, hierarchy_requires, is_reference_of_type,
    model_hierarchy, required_properties, xms_azure_resource_models,
};
#[doc(inline)]
pub use naming::{camel_case_suggestion, is_camel_case, is_odata_property};
#[doc(inline)]
pub use resource_paths::{normalize_resource_path, resource_providers, ResourcePath};
