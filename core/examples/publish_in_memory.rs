// scoring_publisher/examples/publish_in_memory.rs

//! Runs the publish flow against in-memory collaborators: the model has no
//! offering yet, so one is created, polled until ready, and an instance is
//! provisioned.

use async_trait::async_trait;
use parking_lot::Mutex;
use scoring_publisher::marketplace::{BinaryOfferingRequest, ServiceInstanceRequest};
use scoring_publisher::{
  ArtifactStore, EngineNameSupplier, InstanceProvisioner, KeyCounter, OfferingResolver, OfferingsApi, PublishFlow,
  PublishOptions, ReadinessConfig, ScoringEngineData, ServicesApi, UpstreamError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Default)]
struct InMemoryMarketplace {
  offerings: Mutex<Vec<Value>>,
  polls: Mutex<u32>,
}

#[async_trait]
impl OfferingsApi for InMemoryMarketplace {
  async fn list_offerings(&self) -> Result<Value, UpstreamError> {
    Ok(Value::Array(self.offerings.lock().clone()))
  }

  async fn create_offering(&self, request: BinaryOfferingRequest) -> Result<Value, UpstreamError> {
    let offering = json!({
      "id": "offering-1",
      "state": "DEPLOYING",
      "metadata": request.offering.metadata,
      "plans": [{"id": "plan-1"}]
    });
    self.offerings.lock().push(offering.clone());
    Ok(offering)
  }

  async fn get_offering(&self, offering_id: &str) -> Result<Value, UpstreamError> {
    let mut polls = self.polls.lock();
    *polls += 1;
    let state = if *polls >= 3 { "READY" } else { "DEPLOYING" };
    Ok(json!({"id": offering_id, "state": state}))
  }
}

#[async_trait]
impl ServicesApi for InMemoryMarketplace {
  async fn create_service_instance(&self, request: &ServiceInstanceRequest) -> Result<(), UpstreamError> {
    info!(name = %request.name, offering_id = %request.offering_id, "Instance requested.");
    Ok(())
  }
}

struct StaticArtifacts;

#[async_trait]
impl ArtifactStore for StaticArtifacts {
  async fn retrieve_artifact(&self, _model_id: &str, _artifact_id: &str) -> Result<Vec<u8>, UpstreamError> {
    Ok(b"PK\x03\x04 engine".to_vec())
  }
}

#[derive(Default)]
struct InMemoryCounter(Mutex<HashMap<String, u32>>);

#[async_trait]
impl KeyCounter for InMemoryCounter {
  async fn next_count(&self, key: &str) -> Result<u32, UpstreamError> {
    let mut counts = self.0.lock();
    let count = counts.entry(key.to_string()).or_insert(0);
    *count += 1;
    Ok(*count)
  }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let marketplace = Arc::new(InMemoryMarketplace::default());
  let readiness = ReadinessConfig {
    retry_interval: Duration::from_millis(200),
    ..ReadinessConfig::default()
  };
  let flow = PublishFlow::new(
    OfferingResolver::new(marketplace.clone(), Arc::new(StaticArtifacts), readiness),
    EngineNameSupplier::new(Arc::new(InMemoryCounter::default())),
    InstanceProvisioner::new(marketplace.clone()),
  );

  let data = ScoringEngineData::new("4f2a9c7e-0000", "artifact-1", "Churn_GBM");
  for _ in 0..2 {
    let outcome = flow
      .publish(data.clone(), PublishOptions::default(), CancellationToken::new())
      .await?;
    info!(offering = %outcome.offering, instance = ?outcome.instance.map(|i| i.name), "Published.");
  }
  Ok(())
}
