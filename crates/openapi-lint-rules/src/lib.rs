//! # openapi-lint-rules
//!
//! Built-in validation rules for openapi-lint.
//!
//! This crate provides the resource-manager (ARM) and data-plane rule catalog
//! that runs on the openapi-lint engine.
//!
//! ## Available Rules
//!
//! | Code | Name | Flavor | Pass | Description |
//! |------|------|--------|------|-------------|
//! | R2004 | `NonApplicationJsonType` | arm | individual | Media types other than `application/json` |
//! | R2016 | `PatchBodyParametersSchema` | arm | individual | Required or default-valued PATCH body properties |
//! | R2057 | `InvalidSkuModel` | arm | composed | Sku models outside the standard shape |
//! | R2059 | `UniqueResourcePaths` | arm | individual | Several providers, or duplicate resource paths |
//! | R2062 | `XmsResourceInPutResponse` | arm | composed | PUT responses not marked `x-ms-azure-resource` |
//! | R3007 | `PutGetPatchResponseSchema` | arm | composed | PUT/GET/PATCH returning different models |
//! | R3008 | `CollectionObjectPropertiesNaming` | arm | composed | Pageable lists without a `value` array |
//! | R3011 | `DescriptionMustNotBeNodeName` | arm | composed | Descriptions repeating a name |
//! | R3013 | `DeleteMustNotHaveRequestBody` | arm, data-plane | individual | DELETE with a body parameter |
//! | R3014 | `BodyPropertiesNamesCamelCase` | default | composed | Body properties not in camelCase |
//! | R3017 | `GuidUsage` | arm, data-plane | composed | `string`/`uuid` properties |
//! | R3018 | `EnumInsteadOfBoolean` | arm | composed | Boolean properties and parameters |
//! | R3023 | `OperationsApiImplementation` | arm | composed | Missing provider operations API |
//! | R3025 | `TrackedResourceGetOperation` | arm | composed | Tracked resources without GET |
//! | R3026 | `TrackedResourcePatchOperation` | arm | composed | Tracked resources without PATCH |
//! | R3027 | `TrackedResourceListByResourceGroup` | arm | composed | Tracked resources not listable by resource group |
//!
//! ## Usage
//!
//! ```ignore
//! use openapi_lint_core::Validator;
//! use openapi_lint_rules::{GuidUsage, UniqueResourcePaths};
//!
//! let validator = Validator::builder()
//!     .rule(UniqueResourcePaths::new())
//!     .rule(GuidUsage::new())
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body_properties_names_camel_case;
mod collection_object_properties_naming;
mod delete_must_not_have_request_body;
mod description_must_not_be_node_name;
mod enum_instead_of_boolean;
mod guid_usage;
mod invalid_sku_model;
mod non_application_json_type;
mod operations_api_implementation;
mod patch_body_parameters_schema;
mod presets;
mod put_get_patch_response_schema;
mod tracked_resource_get_operation;
mod tracked_resource_list_by_resource_group;
mod tracked_resource_patch_operation;
mod unique_resource_paths;
mod xms_resource_in_put_response;

#[cfg(test)]
mod testing;

pub use body_properties_names_camel_case::BodyPropertiesNamesCamelCase;
pub use collection_object_properties_naming::CollectionObjectPropertiesNaming;
pub use delete_must_not_have_request_body::DeleteMustNotHaveRequestBody;
pub use description_must_not_be_node_name::DescriptionMustNotBeNodeName;
pub use enum_instead_of_boolean::EnumInsteadOfBoolean;
pub use guid_usage::GuidUsage;
pub use invalid_sku_model::InvalidSkuModel;
pub use non_application_json_type::NonApplicationJsonType;
pub use operations_api_implementation::OperationsApiImplementation;
pub use patch_body_parameters_schema::PatchBodyParametersSchema;
pub use presets::{all_rules, arm_rules, data_plane_rules, Preset, UnknownPreset};
pub use put_get_patch_response_schema::PutGetPatchResponseSchema;
pub use tracked_resource_get_operation::TrackedResourceGetOperation;
pub use tracked_resource_list_by_resource_group::TrackedResourceListByResourceGroup;
pub use tracked_resource_patch_operation::TrackedResourcePatchOperation;
pub use unique_resource_paths::UniqueResourcePaths;
pub use xms_resource_in_put_response::XmsResourceInPutResponse;

/// Re-export core types for convenience.
pub use openapi_lint_core::{Rule, Severity, ValidationMessage};
