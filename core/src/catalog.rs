// scoring_publisher/src/catalog.rs

use crate::error::UpstreamError;
use async_trait::async_trait;

/// Store holding packaged scoring-engine artifacts (the model catalog).
#[async_trait]
pub trait ArtifactStore: Send + Sync {
  /// Artifact bytes; `UpstreamError::NotFound` when the pair is unknown.
  async fn retrieve_artifact(&self, model_id: &str, artifact_id: &str) -> Result<Vec<u8>, UpstreamError>;
}
