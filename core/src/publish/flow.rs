// scoring_publisher/src/publish/flow.rs

//! The publish run as a step pipeline:
//! `resolve_offering` → `generate_engine_name` → `provision_instance`.

use super::provisioner::InstanceProvisioner;
use super::resolver::OfferingResolver;
use crate::core::{ContextData, PipelineControl, PipelineResult, SkipCondition};
use crate::error::{PublisherError, PublisherResult};
use crate::model::{EngineName, OfferingRecord, ProvisionedInstance, ScoringEngineData};
use crate::naming::EngineNameSupplier;
use crate::pipeline::Pipeline;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

pub const RESOLVE_OFFERING_STEP: &str = "resolve_offering";
pub const GENERATE_ENGINE_NAME_STEP: &str = "generate_engine_name";
pub const PROVISION_INSTANCE_STEP: &str = "provision_instance";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
  /// `false` publishes the offering only.
  pub provision_instance: bool,
}

impl Default for PublishOptions {
  fn default() -> Self {
    Self {
      provision_instance: true,
    }
  }
}

/// Data shared by the steps of one publish run.
#[derive(Debug)]
pub struct PublishCtxData {
  pub data: ScoringEngineData,
  pub options: PublishOptions,
  pub cancel: CancellationToken,
  pub offering: Option<OfferingRecord>,
  pub engine_name: Option<EngineName>,
  pub instance: Option<ProvisionedInstance>,
}

impl PublishCtxData {
  pub fn new(data: ScoringEngineData, options: PublishOptions, cancel: CancellationToken) -> Self {
    Self {
      data,
      options,
      cancel,
      offering: None,
      engine_name: None,
      instance: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
  pub offering: OfferingRecord,
  pub instance: Option<ProvisionedInstance>,
}

pub struct PublishFlow {
  pipeline: Pipeline<PublishCtxData, PublisherError>,
}

impl PublishFlow {
  pub fn new(resolver: OfferingResolver, names: EngineNameSupplier, provisioner: InstanceProvisioner) -> Self {
    let offering_only: SkipCondition<PublishCtxData> =
      Arc::new(|ctx_data: ContextData<PublishCtxData>| !ctx_data.read().options.provision_instance);

    let mut pipeline = Pipeline::<PublishCtxData, PublisherError>::new(&[
      (RESOLVE_OFFERING_STEP, false, None),
      (GENERATE_ENGINE_NAME_STEP, false, Some(offering_only.clone())),
      (PROVISION_INSTANCE_STEP, false, Some(offering_only)),
    ]);

    pipeline.on_root(RESOLVE_OFFERING_STEP, move |ctx_data: ContextData<PublishCtxData>| {
      let resolver = resolver.clone();
      Box::pin(async move {
        let (data, cancel) = {
          let guard = ctx_data.read();
          (guard.data.clone(), guard.cancel.clone())
        };
        let offering = resolver.resolve(&data, &cancel).await?;
        ctx_data.write().offering = Some(offering);
        Ok::<_, PublisherError>(PipelineControl::Continue)
      })
    });

    pipeline.on_root(GENERATE_ENGINE_NAME_STEP, move |ctx_data: ContextData<PublishCtxData>| {
      let names = names.clone();
      Box::pin(async move {
        let data = ctx_data.read().data.clone();
        let engine_name = names.generate_name(data.model_name(), data.model_id()).await?;
        event!(Level::INFO, %engine_name, "Generated scoring engine name.");
        ctx_data.write().engine_name = Some(engine_name);
        Ok::<_, PublisherError>(PipelineControl::Continue)
      })
    });

    // Nothing gets created once the caller has given up.
    pipeline.before_root(PROVISION_INSTANCE_STEP, |ctx_data: ContextData<PublishCtxData>| {
      let cancelled = ctx_data.read().cancel.is_cancelled();
      Box::pin(async move {
        if cancelled {
          return Err(PublisherError::Cancelled {
            during: "provisioning the service instance".to_string(),
          });
        }
        Ok::<_, PublisherError>(PipelineControl::Continue)
      })
    });

    pipeline.on_root(PROVISION_INSTANCE_STEP, move |ctx_data: ContextData<PublishCtxData>| {
      let provisioner = provisioner.clone();
      Box::pin(async move {
        let (data, offering, engine_name) = {
          let guard = ctx_data.read();
          (guard.data.clone(), guard.offering.clone(), guard.engine_name.clone())
        };
        let (Some(offering), Some(engine_name)) = (offering, engine_name) else {
          return Err(PublisherError::Internal(
            "provisioning reached without a resolved offering and engine name".to_string(),
          ));
        };
        let instance = provisioner.provision(&offering, &data, &engine_name).await?;
        ctx_data.write().instance = Some(instance);
        Ok::<_, PublisherError>(PipelineControl::Continue)
      })
    });

    Self { pipeline }
  }

  /// Step list, for callers that want to add their own steps or handlers.
  pub fn pipeline_mut(&mut self) -> &mut Pipeline<PublishCtxData, PublisherError> {
    &mut self.pipeline
  }

  #[instrument(
    name = "PublishFlow::publish",
    skip_all,
    fields(model_id = %data.model_id(), artifact_id = %data.artifact_id(), provision = options.provision_instance),
    err(Display)
  )]
  pub async fn publish(
    &self,
    data: ScoringEngineData,
    options: PublishOptions,
    cancel: CancellationToken,
  ) -> PublisherResult<PublishOutcome> {
    let ctx_data = ContextData::new(PublishCtxData::new(data, options, cancel));

    match self.pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {}
      PipelineResult::Stopped => {
        event!(Level::WARN, "Publish pipeline was stopped by a handler.");
      }
    }

    let finished = ctx_data
      .try_unwrap()
      .map_err(|_| PublisherError::Internal("publish context still shared after the run".to_string()))?;
    let offering = finished
      .offering
      .ok_or_else(|| PublisherError::Internal("publish finished without an offering".to_string()))?;

    Ok(PublishOutcome {
      offering,
      instance: finished.instance,
    })
  }
}
