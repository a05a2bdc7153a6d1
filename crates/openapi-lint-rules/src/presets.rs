//! Rule presets for common document flavors.

use crate::{
    BodyPropertiesNamesCamelCase, CollectionObjectPropertiesNaming, DeleteMustNotHaveRequestBody,
    DescriptionMustNotBeNodeName, EnumInsteadOfBoolean, GuidUsage, InvalidSkuModel,
    NonApplicationJsonType, OperationsApiImplementation, PatchBodyParametersSchema,
    PutGetPatchResponseSchema, TrackedResourceGetOperation, TrackedResourceListByResourceGroup,
    TrackedResourcePatchOperation, UniqueResourcePaths, XmsResourceInPutResponse,
};
use openapi_lint_core::{Flavor, RuleBox};
use std::str::FromStr;
use thiserror::Error;

/// Preset rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Rules applying to resource-manager documents.
    Arm,
    /// Rules applying to data-plane documents.
    DataPlane,
    /// Every built-in rule.
    All,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Arm => arm_rules(),
            Self::DataPlane => data_plane_rules(),
            Self::All => all_rules(),
        }
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown preset '{0}' (expected 'arm', 'data-plane' or 'all')")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arm" => Ok(Self::Arm),
            "data-plane" | "dataplane" => Ok(Self::DataPlane),
            "all" => Ok(Self::All),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

/// Returns every built-in rule, ordered by code.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NonApplicationJsonType::new()),
        Box::new(PatchBodyParametersSchema::new()),
        Box::new(InvalidSkuModel::new()),
        Box::new(UniqueResourcePaths::new()),
        Box::new(XmsResourceInPutResponse::new()),
        Box::new(PutGetPatchResponseSchema::new()),
        Box::new(CollectionObjectPropertiesNaming::new()),
        Box::new(DescriptionMustNotBeNodeName::new()),
        Box::new(DeleteMustNotHaveRequestBody::new()),
        Box::new(BodyPropertiesNamesCamelCase::new()),
        Box::new(GuidUsage::new()),
        Box::new(EnumInsteadOfBoolean::new()),
        Box::new(OperationsApiImplementation::new()),
        Box::new(TrackedResourceGetOperation::new()),
        Box::new(TrackedResourcePatchOperation::new()),
        Box::new(TrackedResourceListByResourceGroup::new()),
    ]
}

/// Returns the rules that apply to resource-manager documents.
///
/// Rules tagged with the default flavor are included.
#[must_use]
pub fn arm_rules() -> Vec<RuleBox> {
    applying_to(Flavor::ARM)
}

/// Returns the rules that apply to data-plane documents.
///
/// Rules tagged with the default flavor are included.
#[must_use]
pub fn data_plane_rules() -> Vec<RuleBox> {
    applying_to(Flavor::DATA_PLANE)
}

fn applying_to(flavor: Flavor) -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .filter(|rule| rule.flavor().applies_to(flavor))
        .collect()
}
