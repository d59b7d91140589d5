// scoring_publisher_app/src/commands.rs

use crate::config::{BuildConfig, PublishConfig};
use crate::errors::Result;
use crate::state::AppState;
use clap::Args;
use scoring_publisher::clients::{
  BasicAuthServer, KeyCounterClient, MarketplaceClient, ModelCatalogClient, RuntimeHostClient,
};
use scoring_publisher::{
  EngineBuilder, EngineNameSupplier, InstanceProvisioner, JavacCompiler, OfferingResolver, PublishFlow,
  PublishOptions, PublisherError, ScoringEngineData,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Name of the model on the runtime host
  #[arg(long)]
  pub model_name: String,

  /// Base URL of the model runtime host
  #[arg(long, env = "RUNTIME_HOST_URL")]
  pub host_url: String,

  #[arg(long, env = "RUNTIME_HOST_USER")]
  pub host_user: String,

  #[arg(long, env = "RUNTIME_HOST_PASSWORD", hide_env_values = true)]
  pub host_password: String,

  /// File or directory the engine archive is written to
  #[arg(long, default_value = ".")]
  pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct PublishArgs {
  #[arg(long)]
  pub model_id: String,

  #[arg(long)]
  pub artifact_id: String,

  /// Free-text model name used for the instance name
  #[arg(long)]
  pub model_name: String,

  /// Resolve the offering without creating a service instance
  #[arg(long)]
  pub offering_only: bool,
}

/// Builds the engine archive and copies it to `--output`.
#[instrument(name = "command::build", skip_all, fields(model_name = %args.model_name))]
pub async fn build(state: &AppState, args: BuildArgs, cancel: &CancellationToken) -> Result<()> {
  let config = BuildConfig::from_env()?;

  let mut builder = EngineBuilder::new(Arc::new(JavacCompiler::new(&config.javac_path)), &config.engine_base_jar);
  if let Some(root) = &config.work_root {
    builder = builder.with_work_root(root);
  }
  let host = RuntimeHostClient::new(
    state.http.clone(),
    BasicAuthServer::new(args.host_url, args.host_user, args.host_password),
  );

  // Dropping the build future removes its working directory and kills javac.
  let engine = tokio::select! {
    biased;
    _ = cancel.cancelled() => {
      return Err(PublisherError::Cancelled { during: "building the scoring engine".to_string() }.into());
    }
    built = builder.build(&host, &args.model_name) => built?,
  };

  let written = engine.persist_to(&args.output).await?;
  info!(path = %written.display(), "Scoring engine built.");
  println!(
    "{}",
    json!({ "model_name": engine.model_name(), "engine": written.display().to_string() })
  );
  Ok(())
}

/// Makes sure an offering exists for the artifact and, unless
/// `--offering-only` is set, provisions an instance of it.
#[instrument(
  name = "command::publish",
  skip_all,
  fields(model_id = %args.model_id, artifact_id = %args.artifact_id)
)]
pub async fn publish(state: &AppState, args: PublishArgs, cancel: CancellationToken) -> Result<()> {
  let config = PublishConfig::from_env()?;
  let flow = publish_flow(state, &config);

  let data = ScoringEngineData::new(args.model_id, args.artifact_id, args.model_name);
  let options = PublishOptions {
    provision_instance: !args.offering_only,
  };
  let outcome = flow.publish(data, options, cancel).await?;

  info!(offering = %outcome.offering, "Publish finished.");
  println!(
    "{}",
    serde_json::to_string_pretty(&json!({ "offering": outcome.offering, "instance": outcome.instance }))
      .map_err(|e| PublisherError::Internal(format!("unable to render outcome: {}", e)))?
  );
  Ok(())
}

fn publish_flow(state: &AppState, config: &PublishConfig) -> PublishFlow {
  let mut marketplace = MarketplaceClient::new(state.http.clone(), &config.marketplace_url);
  if let Some(token) = &config.marketplace_token {
    marketplace = marketplace.with_bearer_token(token.expose());
  }
  let marketplace = Arc::new(marketplace);
  let catalog = Arc::new(ModelCatalogClient::new(
    state.http.clone(),
    &config.model_catalog_url,
    config.model_catalog_token.expose(),
  ));
  let counter = Arc::new(KeyCounterClient::new(state.http.clone(), config.key_counter.clone()));

  PublishFlow::new(
    OfferingResolver::new(marketplace.clone(), catalog, config.readiness.clone()),
    EngineNameSupplier::new(counter),
    InstanceProvisioner::new(marketplace),
  )
}
