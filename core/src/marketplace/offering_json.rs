// scoring_publisher/src/marketplace/offering_json.rs

//! Parsing of marketplace offering documents.
//!
//! The marketplace has served two shapes over time:
//!
//! * current: `{"id": .., "state": .., "metadata": [..], "plans": [{"id": ..}]}`
//! * legacy:  `{"entity": {"unique_id": .., "state": .., "metadata": [..],
//!             "service_plans": [{"metadata": {"guid": ..}}]}}`
//!
//! Both are mapped onto [`OfferingSummary`]; nothing outside this module looks
//! at raw JSON pointers.

use crate::error::UpstreamError;
use crate::model::{MetadataEntry, OfferingRecord, ARTIFACT_ID_KEY, MODEL_ID_KEY};
use serde_json::Value;
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferingSchema {
  Current,
  Legacy,
}

impl OfferingSchema {
  /// Documents with an `entity` object are legacy, everything else is current.
  pub fn detect(offering: &Value) -> Self {
    if offering.get("entity").is_some_and(Value::is_object) {
      OfferingSchema::Legacy
    } else {
      OfferingSchema::Current
    }
  }

  fn id_pointer(self) -> &'static str {
    match self {
      OfferingSchema::Current => "/id",
      OfferingSchema::Legacy => "/entity/unique_id",
    }
  }

  fn plan_id_pointer(self) -> &'static str {
    match self {
      OfferingSchema::Current => "/plans/0/id",
      OfferingSchema::Legacy => "/entity/service_plans/0/metadata/guid",
    }
  }

  fn state_pointer(self) -> &'static str {
    match self {
      OfferingSchema::Current => "/state",
      OfferingSchema::Legacy => "/entity/state",
    }
  }

  fn metadata_pointer(self) -> &'static str {
    match self {
      OfferingSchema::Current => "/metadata",
      OfferingSchema::Legacy => "/entity/metadata",
    }
  }
}

/// Stable view of one offering document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingSummary {
  pub schema: OfferingSchema,
  pub offering_id: Option<String>,
  pub plan_id: Option<String>,
  pub state: Option<String>,
  /// `None` when the metadata was missing or malformed; such offerings never match a model.
  pub metadata: Option<Vec<MetadataEntry>>,
}

impl OfferingSummary {
  pub fn parse(offering: &Value) -> Self {
    let schema = OfferingSchema::detect(offering);
    let text_at = |pointer: &str| offering.pointer(pointer).and_then(Value::as_str).map(str::to_string);

    Self {
      schema,
      offering_id: text_at(schema.id_pointer()),
      plan_id: text_at(schema.plan_id_pointer()),
      state: text_at(schema.state_pointer()),
      metadata: parse_metadata(offering, schema),
    }
  }

  pub fn metadata_value(&self, key: &str) -> Option<&str> {
    self
      .metadata
      .as_ref()?
      .iter()
      .find(|entry| entry.key == key)
      .map(|entry| entry.value.as_str())
  }

  /// True when `MODEL_ID` and `ARTIFACT_ID` metadata equal the given ids.
  pub fn belongs_to(&self, model_id: &str, artifact_id: &str) -> bool {
    self.metadata_value(MODEL_ID_KEY) == Some(model_id) && self.metadata_value(ARTIFACT_ID_KEY) == Some(artifact_id)
  }

  /// Ids needed to create instances; both must be present.
  pub fn to_record(&self) -> Result<OfferingRecord, UpstreamError> {
    match (&self.offering_id, &self.plan_id) {
      (Some(offering_id), Some(plan_id)) => Ok(OfferingRecord::new(offering_id.as_str(), plan_id.as_str())),
      (None, _) => Err(UpstreamError::Malformed("offering has no id".to_string())),
      (Some(offering_id), None) => Err(UpstreamError::Malformed(format!(
        "offering {} has no service plan id",
        offering_id
      ))),
    }
  }
}

fn parse_metadata(offering: &Value, schema: OfferingSchema) -> Option<Vec<MetadataEntry>> {
  let entries = offering.pointer(schema.metadata_pointer())?.as_array()?;

  let mut parsed = Vec::with_capacity(entries.len());
  for entry in entries {
    let key = entry.get("key").and_then(Value::as_str);
    let value = entry.get("value").and_then(Value::as_str);
    parsed.push(MetadataEntry::new(key?, value?));
  }
  Some(parsed)
}

/// Parses the offering-list document. A top-level value that is not an array is an error.
pub fn parse_offering_list(document: &Value) -> Result<Vec<OfferingSummary>, UpstreamError> {
  let offerings = document
    .as_array()
    .ok_or_else(|| UpstreamError::Malformed(format!("offering list is not an array: {}", document)))?;
  Ok(
    offerings
      .iter()
      .map(|offering| {
        let summary = OfferingSummary::parse(offering);
        if summary.metadata.is_none() {
          event!(
            Level::WARN,
            offering = %offering,
            "Offering metadata is not an array of key/value objects. Skipping this offering."
          );
        }
        summary
      })
      .collect(),
  )
}

/// Offerings whose metadata ties them to the given model and artifact.
pub fn select_model_offerings(
  offerings: Vec<OfferingSummary>,
  model_id: &str,
  artifact_id: &str,
) -> Vec<OfferingSummary> {
  offerings
    .into_iter()
    .filter(|offering| offering.belongs_to(model_id, artifact_id))
    .collect()
}

/// Parses the response of the create-offering call.
pub fn parse_created_offering(document: &Value) -> Result<OfferingRecord, UpstreamError> {
  OfferingSummary::parse(document).to_record()
}

/// Reads the lifecycle state out of a single-offering document.
pub fn parse_offering_state(document: &Value) -> Result<String, UpstreamError> {
  if !document.is_object() {
    return Err(UpstreamError::Malformed(format!("offering is not an object: {}", document)));
  }
  OfferingSummary::parse(document)
    .state
    .ok_or_else(|| UpstreamError::Malformed(format!("offering has no state: {}", document)))
}
