// scoring_publisher/src/marketplace/service_instance.rs

use crate::model::{EngineName, MetadataEntry, OfferingRecord, ScoringEngineData, ARTIFACT_ID_KEY, MODEL_ID_KEY, PLAN_ID_KEY};
use serde::Serialize;

const SERVICE_INSTANCE_TYPE: &str = "SERVICE";

/// Body of the create-service-instance call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceRequest {
  pub name: String,
  #[serde(rename = "type")]
  pub instance_type: String,
  pub offering_id: String,
  pub bindings: Vec<serde_json::Value>,
  pub metadata: Vec<MetadataEntry>,
}

impl ServiceInstanceRequest {
  pub fn new(name: &EngineName, offering: &OfferingRecord, data: &ScoringEngineData) -> Self {
    Self {
      name: name.to_string(),
      instance_type: SERVICE_INSTANCE_TYPE.to_string(),
      offering_id: offering.offering_id.clone(),
      // no bindings
      bindings: Vec::new(),
      metadata: vec![
        MetadataEntry::new(PLAN_ID_KEY, offering.plan_id.as_str()),
        MetadataEntry::new(MODEL_ID_KEY, data.model_id()),
        MetadataEntry::new(ARTIFACT_ID_KEY, data.artifact_id()),
      ],
    }
  }
}
