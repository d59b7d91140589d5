// scoring_publisher/src/build/fetch.rs

use super::workdir::WorkingDirectory;
use crate::error::{PublisherError, PublisherResult, UpstreamError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

pub const RUNTIME_LIBRARY_FILE: &str = "h2o-genmodel.jar";

/// Model runtime server the trained model is downloaded from.
#[async_trait]
pub trait ModelRuntimeHost: Send + Sync {
  /// Generated scoring source of the named model.
  async fn download_model_source(&self, model_name: &str) -> Result<Vec<u8>, UpstreamError>;

  /// Library the generated source compiles against.
  async fn download_runtime_library(&self) -> Result<Vec<u8>, UpstreamError>;
}

/// Output of the fetch stage: the model source and runtime library on disk.
#[derive(Debug)]
pub struct FetchedResources {
  source_file: PathBuf,
  runtime_library: PathBuf,
}

impl FetchedResources {
  pub fn source_file(&self) -> &Path {
    &self.source_file
  }

  pub fn runtime_library(&self) -> &Path {
    &self.runtime_library
  }
}

pub fn model_source_file_name(model_name: &str) -> String {
  format!("{}.java", model_name)
}

/// Downloads both resources into the working directory. No retries: the
/// first failing download ends the build.
#[instrument(name = "build::fetch", skip_all, fields(model_name = %workdir.model_name()), err(Display))]
pub async fn fetch(host: &dyn ModelRuntimeHost, workdir: &WorkingDirectory) -> PublisherResult<FetchedResources> {
  let model_name = workdir.model_name();
  let resources_dir = workdir.resources_dir();

  let source = host
    .download_model_source(model_name)
    .await
    .map_err(|source| PublisherError::Fetch {
      resource: format!("model source of '{}'", model_name),
      source,
    })?;
  let source_file = resources_dir.join(model_source_file_name(model_name));
  save(&source_file, &source).await?;

  let library = host.download_runtime_library().await.map_err(|source| PublisherError::Fetch {
    resource: RUNTIME_LIBRARY_FILE.to_string(),
    source,
  })?;
  let runtime_library = resources_dir.join(RUNTIME_LIBRARY_FILE);
  save(&runtime_library, &library).await?;

  event!(Level::INFO, source_len = source.len(), library_len = library.len(), "Model resources downloaded.");
  Ok(FetchedResources {
    source_file,
    runtime_library,
  })
}

async fn save(path: &Path, bytes: &[u8]) -> PublisherResult<()> {
  tokio::fs::write(path, bytes).await.map_err(|e| {
    PublisherError::build("fetch", anyhow::Error::new(e).context(format!("writing {}", path.display())))
  })
}
