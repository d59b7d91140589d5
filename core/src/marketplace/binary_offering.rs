// scoring_publisher/src/marketplace/binary_offering.rs

use crate::model::{MetadataEntry, ScoringEngineData, ARTIFACT_ID_KEY, MODEL_ID_KEY};
use crate::naming::sanitize_name;
use serde::Serialize;

const OFFERING_TAGS: &[&str] = &["k8s"];
const JAVA_RUNTIME_TYPE: &str = "JAVA";

pub const BLOB_PART: &str = "blob";
pub const MANIFEST_PART: &str = "manifest";
pub const OFFERING_PART: &str = "offering";
pub const MANIFEST_FILE_NAME: &str = "binary_manifest.json";
pub const OFFERING_FILE_NAME: &str = "binary_offering.json";

/// Catalog entry submitted when a model has no offering yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOffering {
  pub name: String,
  pub description: String,
  pub metadata: Vec<MetadataEntry>,
  pub bindable: bool,
  pub tags: Vec<String>,
  pub plans: Vec<OfferingPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferingPlan {
  pub name: String,
  pub description: String,
  pub cost: String,
}

impl Default for OfferingPlan {
  fn default() -> Self {
    Self {
      name: "free".to_string(),
      description: "Default plan".to_string(),
      cost: "free".to_string(),
    }
  }
}

impl BinaryOffering {
  pub fn for_model(data: &ScoringEngineData) -> Self {
    Self {
      name: sanitize_name(&format!("h2o-{}-{}", data.model_name(), data.model_id())),
      description: format!("Offering of h2o scoring engine based on model {}", data.model_name()),
      metadata: vec![
        MetadataEntry::new(MODEL_ID_KEY, data.model_id()),
        MetadataEntry::new(ARTIFACT_ID_KEY, data.artifact_id()),
      ],
      bindable: false,
      tags: OFFERING_TAGS.iter().map(|t| t.to_string()).collect(),
      plans: vec![OfferingPlan::default()],
    }
  }
}

/// Declares how the marketplace should run the uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryManifest {
  #[serde(rename = "type")]
  pub runtime_type: String,
}

impl BinaryManifest {
  pub fn java() -> Self {
    Self {
      runtime_type: JAVA_RUNTIME_TYPE.to_string(),
    }
  }
}

/// Everything the multipart create-offering call carries.
#[derive(Debug, Clone)]
pub struct BinaryOfferingRequest {
  pub blob: Vec<u8>,
  pub blob_file_name: String,
  pub manifest: BinaryManifest,
  pub offering: BinaryOffering,
}

impl BinaryOfferingRequest {
  pub fn new(data: &ScoringEngineData, blob: Vec<u8>) -> Self {
    Self {
      blob,
      blob_file_name: format!("{}.jar", data.model_name()),
      manifest: BinaryManifest::java(),
      offering: BinaryOffering::for_model(data),
    }
  }
}
