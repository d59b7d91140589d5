// scoring_publisher/src/clients/catalog.rs

use super::{endpoint_url, ensure_success};
use crate::catalog::ArtifactStore;
use crate::error::UpstreamError;
use async_trait::async_trait;
use tracing::instrument;

/// `/api/v1/models/{model_id}/artifacts/{artifact_id}/file`
fn artifact_file_path<'a>(model_id: &'a str, artifact_id: &'a str) -> [&'a str; 7] {
  ["api", "v1", "models", model_id, "artifacts", artifact_id, "file"]
}

/// Model catalog holding packaged artifacts, authorised with a bearer token.
#[derive(Clone)]
pub struct ModelCatalogClient {
  client: reqwest::Client,
  base_url: String,
  bearer_token: String,
}

impl ModelCatalogClient {
  pub fn new(client: reqwest::Client, base_url: &str, bearer_token: impl Into<String>) -> Self {
    Self {
      client,
      base_url: base_url.to_string(),
      bearer_token: bearer_token.into(),
    }
  }
}

#[async_trait]
impl ArtifactStore for ModelCatalogClient {
  #[instrument(name = "ModelCatalogClient::retrieve_artifact", skip(self), err(Display))]
  async fn retrieve_artifact(&self, model_id: &str, artifact_id: &str) -> Result<Vec<u8>, UpstreamError> {
    let url = endpoint_url(&self.base_url, &artifact_file_path(model_id, artifact_id))?;
    let resp = self.client.get(url).bearer_auth(&self.bearer_token).send().await?;
    let resp = match ensure_success(resp).await {
      Ok(resp) => resp,
      Err(UpstreamError::Status { status: 404, body }) => {
        return Err(UpstreamError::NotFound(format!(
          "artifact {} of model {} ({})",
          artifact_id, model_id, body
        )))
      }
      Err(e) => return Err(e),
    };
    Ok(resp.bytes().await?.to_vec())
  }
}
