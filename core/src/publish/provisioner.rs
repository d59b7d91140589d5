// scoring_publisher/src/publish/provisioner.rs

use crate::error::{PublisherError, PublisherResult};
use crate::marketplace::{ServiceInstanceRequest, ServicesApi};
use crate::model::{EngineName, OfferingRecord, ProvisionedInstance, ScoringEngineData};
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Creates a service instance of a resolved offering. The call is not
/// followed by a readiness check.
#[derive(Clone)]
pub struct InstanceProvisioner {
  services: Arc<dyn ServicesApi>,
}

impl InstanceProvisioner {
  pub fn new(services: Arc<dyn ServicesApi>) -> Self {
    Self { services }
  }

  #[instrument(
    name = "InstanceProvisioner::provision",
    skip_all,
    fields(instance_name = %name, offering_id = %offering.offering_id),
    err(Display)
  )]
  pub async fn provision(
    &self,
    offering: &OfferingRecord,
    data: &ScoringEngineData,
    name: &EngineName,
  ) -> PublisherResult<ProvisionedInstance> {
    let request = ServiceInstanceRequest::new(name, offering, data);
    self
      .services
      .create_service_instance(&request)
      .await
      .map_err(|source| PublisherError::Provisioning {
        instance_name: name.to_string(),
        source,
      })?;

    event!(Level::INFO, "Service instance creation accepted.");
    Ok(ProvisionedInstance {
      name: name.clone(),
      offering_id: offering.offering_id.clone(),
      plan_id: offering.plan_id.clone(),
    })
  }
}
