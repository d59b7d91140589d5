// scoring_publisher/src/clients/runtime_host.rs

use super::{endpoint_url, ensure_success, BasicAuthServer};
use crate::build::fetch::ModelRuntimeHost;
use crate::error::UpstreamError;
use async_trait::async_trait;
use tracing::instrument;

pub const RUNTIME_LIBRARY_PATH: &[&str] = &["3", "h2o-genmodel.jar"];
const MODEL_SOURCE_PATH: &[&str] = &["3", "Models.java"];

/// Model runtime server holding trained models. Credentials are per request,
/// so a client is usually built for a single build run.
#[derive(Clone)]
pub struct RuntimeHostClient {
  client: reqwest::Client,
  server: BasicAuthServer,
}

impl RuntimeHostClient {
  pub fn new(client: reqwest::Client, server: BasicAuthServer) -> Self {
    Self { client, server }
  }

  async fn download(&self, segments: &[&str]) -> Result<Vec<u8>, UpstreamError> {
    let url = endpoint_url(&self.server.url, segments)?;
    let resp = self
      .client
      .get(url)
      .basic_auth(&self.server.username, Some(&self.server.password))
      .send()
      .await?;
    Ok(ensure_success(resp).await?.bytes().await?.to_vec())
  }
}

#[async_trait]
impl ModelRuntimeHost for RuntimeHostClient {
  #[instrument(name = "RuntimeHostClient::download_model_source", skip(self), err(Display))]
  async fn download_model_source(&self, model_name: &str) -> Result<Vec<u8>, UpstreamError> {
    self.download(&[MODEL_SOURCE_PATH, &[model_name][..]].concat()).await
  }

  #[instrument(name = "RuntimeHostClient::download_runtime_library", skip(self), err(Display))]
  async fn download_runtime_library(&self) -> Result<Vec<u8>, UpstreamError> {
    self.download(RUNTIME_LIBRARY_PATH).await
  }
}
