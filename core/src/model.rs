// scoring_publisher/src/model.rs

//! Data shared by the publish pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata key linking an offering (or instance) to its model.
pub const MODEL_ID_KEY: &str = "MODEL_ID";
/// Metadata key linking an offering (or instance) to its artifact.
pub const ARTIFACT_ID_KEY: &str = "ARTIFACT_ID";
/// Metadata key recording the plan an instance was created with.
pub const PLAN_ID_KEY: &str = "PLAN_ID";

/// Identifies the model being published.
///
/// `model_name` is free text: not unique and not necessarily a valid
/// marketplace name. Run it through [`crate::naming::sanitize_name`] first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEngineData {
  model_id: String,
  artifact_id: String,
  model_name: String,
}

impl ScoringEngineData {
  pub fn new(model_id: impl Into<String>, artifact_id: impl Into<String>, model_name: impl Into<String>) -> Self {
    Self {
      model_id: model_id.into(),
      artifact_id: artifact_id.into(),
      model_name: model_name.into(),
    }
  }

  pub fn model_id(&self) -> &str {
    &self.model_id
  }

  pub fn artifact_id(&self) -> &str {
    &self.artifact_id
  }

  pub fn model_name(&self) -> &str {
    &self.model_name
  }
}

/// A marketplace offering resolved for a (model, artifact) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingRecord {
  pub offering_id: String,
  pub plan_id: String,
}

impl OfferingRecord {
  pub fn new(offering_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
    Self {
      offering_id: offering_id.into(),
      plan_id: plan_id.into(),
    }
  }
}

impl fmt::Display for OfferingRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "offering {} (plan {})", self.offering_id, self.plan_id)
  }
}

/// Key/value pair attached to offerings and service instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
  pub key: String,
  pub value: String,
}

impl MetadataEntry {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }
}

/// Instance name produced by [`crate::naming::EngineNameSupplier`]:
/// `<sanitized-model-name>-se<NNN>-<fragment>`.
///
/// Low collision probability, not a uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineName(String);

impl EngineName {
  pub fn new(name: impl Into<String>) -> Self {
    EngineName(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for EngineName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Acknowledged service-instance creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedInstance {
  pub name: EngineName,
  pub offering_id: String,
  pub plan_id: String,
}
