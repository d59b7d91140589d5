// scoring_publisher/src/marketplace/mod.rs

//! Boundary with the platform marketplace: the API traits the publish pipeline
//! calls, the request bodies it sends, and the parsing of what comes back.

pub mod binary_offering;
pub mod offering_json;
pub mod service_instance;

use crate::error::UpstreamError;
use async_trait::async_trait;
use serde_json::Value;

pub use binary_offering::{BinaryManifest, BinaryOffering, BinaryOfferingRequest, OfferingPlan};
pub use offering_json::{
  parse_created_offering, parse_offering_list, parse_offering_state, select_model_offerings, OfferingSchema,
  OfferingSummary,
};
pub use service_instance::ServiceInstanceRequest;

/// Offering catalog of the marketplace.
///
/// Responses are returned as raw JSON; `offering_json` turns them into stable
/// records so upstream schema changes stay out of the pipeline logic.
#[async_trait]
pub trait OfferingsApi: Send + Sync {
  async fn list_offerings(&self) -> Result<Value, UpstreamError>;

  async fn create_offering(&self, request: BinaryOfferingRequest) -> Result<Value, UpstreamError>;

  async fn get_offering(&self, offering_id: &str) -> Result<Value, UpstreamError>;
}

/// Service-instance endpoint of the marketplace.
#[async_trait]
pub trait ServicesApi: Send + Sync {
  async fn create_service_instance(&self, request: &ServiceInstanceRequest) -> Result<(), UpstreamError>;
}
