// scoring_publisher/src/publish/resolver.rs

use super::readiness::{wait_until_ready, ReadinessConfig};
use crate::catalog::ArtifactStore;
use crate::error::{PublisherError, PublisherResult};
use crate::marketplace::{
  parse_created_offering, parse_offering_list, select_model_offerings, BinaryOfferingRequest, OfferingSummary,
  OfferingsApi,
};
use crate::model::{OfferingRecord, ScoringEngineData};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

/// Makes sure exactly one marketplace offering exists for a model artifact.
///
/// Lookup and creation are two separate calls. Two first-time publishes of
/// the same (model, artifact) pair running at once can both see zero matches
/// and both create an offering; the next publish then fails with
/// `DuplicateOffering`. Closing that gap needs a uniqueness constraint or an
/// idempotency key on the marketplace side.
#[derive(Clone)]
pub struct OfferingResolver {
  offerings: Arc<dyn OfferingsApi>,
  artifacts: Arc<dyn ArtifactStore>,
  readiness: ReadinessConfig,
}

impl OfferingResolver {
  pub fn new(offerings: Arc<dyn OfferingsApi>, artifacts: Arc<dyn ArtifactStore>, readiness: ReadinessConfig) -> Self {
    Self {
      offerings,
      artifacts,
      readiness,
    }
  }

  /// Returns the offering of `data`, creating it (and waiting until it is ready) when none exists.
  #[instrument(
    name = "OfferingResolver::resolve",
    skip_all,
    fields(model_id = %data.model_id(), artifact_id = %data.artifact_id()),
    err(Display)
  )]
  pub async fn resolve(&self, data: &ScoringEngineData, cancel: &CancellationToken) -> PublisherResult<OfferingRecord> {
    let mut matches = self.find_model_offerings(data).await?;

    match matches.len() {
      0 => {
        event!(Level::INFO, "No offering found for model, creating one.");
        self.create_offering(data, cancel).await
      }
      1 => {
        let found = matches.remove(0);
        let record = found.to_record().map_err(|source| PublisherError::Fetch {
          resource: "model offering ids".to_string(),
          source,
        })?;
        event!(Level::INFO, %record, "Using existing offering.");
        Ok(record)
      }
      count => Err(PublisherError::DuplicateOffering {
        model_id: data.model_id().to_string(),
        artifact_id: data.artifact_id().to_string(),
        count,
      }),
    }
  }

  async fn find_model_offerings(&self, data: &ScoringEngineData) -> PublisherResult<Vec<OfferingSummary>> {
    let offerings = self
      .offerings
      .list_offerings()
      .await
      .and_then(|document| parse_offering_list(&document))
      .map_err(|source| PublisherError::Fetch {
        resource: "offering list".to_string(),
        source,
      })?;
    Ok(select_model_offerings(offerings, data.model_id(), data.artifact_id()))
  }

  async fn create_offering(&self, data: &ScoringEngineData, cancel: &CancellationToken) -> PublisherResult<OfferingRecord> {
    let blob = self
      .artifacts
      .retrieve_artifact(data.model_id(), data.artifact_id())
      .await
      .map_err(|source| PublisherError::Fetch {
        resource: format!("artifact {} of model {}", data.artifact_id(), data.model_id()),
        source,
      })?;

    let request = BinaryOfferingRequest::new(data, blob);
    event!(Level::INFO, offering_name = %request.offering.name, "Submitting binary offering.");
    let record = self
      .offerings
      .create_offering(request)
      .await
      .and_then(|document| parse_created_offering(&document))
      .map_err(|source| PublisherError::OfferingCreation { source })?;

    wait_until_ready(self.offerings.as_ref(), &record.offering_id, &self.readiness, cancel).await?;
    event!(Level::INFO, %record, "Offering created and ready.");
    Ok(record)
  }
}
