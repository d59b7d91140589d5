// scoring_publisher/src/build/mod.rs

//! Building a scoring engine from a trained model.
//!
//! Four stages, each consuming the previous stage's output type:
//! fetch ([`FetchedResources`]) → compile ([`CompiledModel`]) →
//! package ([`PackagedModel`]) → assemble ([`EngineArchive`]).
//! Stage outputs have no public constructors, so stages cannot be reordered.

pub mod archive;
pub mod assemble;
pub mod compile;
pub mod fetch;
pub mod package;
pub mod workdir;

pub use assemble::{EngineArchive, MergeSummary};
pub use compile::{CompiledModel, JavacCompiler, ModelCompiler};
pub use fetch::{FetchedResources, ModelRuntimeHost};
pub use package::PackagedModel;
pub use workdir::WorkingDirectory;

use crate::error::{PublisherError, PublisherResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Runs the build stages against a fresh working directory per call.
#[derive(Clone)]
pub struct EngineBuilder {
  compiler: Arc<dyn ModelCompiler>,
  base_engine: PathBuf,
  work_root: Option<PathBuf>,
}

impl EngineBuilder {
  pub fn new(compiler: Arc<dyn ModelCompiler>, base_engine: impl Into<PathBuf>) -> Self {
    Self {
      compiler,
      base_engine: base_engine.into(),
      work_root: None,
    }
  }

  /// Directory under which working directories are created (default: system temp dir).
  pub fn with_work_root(mut self, work_root: impl Into<PathBuf>) -> Self {
    self.work_root = Some(work_root.into());
    self
  }

  #[instrument(name = "EngineBuilder::build", skip(self, host), err(Display))]
  pub async fn build(&self, host: &dyn ModelRuntimeHost, model_name: &str) -> PublisherResult<BuiltEngine> {
    validate_model_name(model_name)?;

    let workdir = WorkingDirectory::create(model_name, self.work_root.as_deref())?;
    let fetched = fetch::fetch(host, &workdir).await?;
    let compiled = compile::compile(self.compiler.as_ref(), fetched, &workdir).await?;
    let packaged = package::package(compiled, &workdir).await?;
    let engine = assemble::assemble(packaged, &self.base_engine, &workdir).await?;

    Ok(BuiltEngine { engine, workdir })
  }
}

/// The model name ends up in a URL path and a file name.
fn validate_model_name(model_name: &str) -> PublisherResult<()> {
  if model_name.trim().is_empty() {
    return Err(PublisherError::InvalidArgument("model name must not be empty".to_string()));
  }
  if model_name.contains(['/', '\\']) || model_name == "." || model_name == ".." {
    return Err(PublisherError::InvalidArgument(format!(
      "model name '{}' is not a valid file name",
      model_name
    )));
  }
  Ok(())
}

/// A finished engine archive. It lives inside the build's working directory,
/// which is deleted when this value is dropped; call [`BuiltEngine::persist_to`]
/// to keep it.
#[derive(Debug)]
pub struct BuiltEngine {
  engine: EngineArchive,
  workdir: WorkingDirectory,
}

impl BuiltEngine {
  pub fn archive_path(&self) -> &Path {
    self.engine.path()
  }

  pub fn model_name(&self) -> &str {
    self.workdir.model_name()
  }

  pub async fn read_bytes(&self) -> PublisherResult<Vec<u8>> {
    tokio::fs::read(self.archive_path())
      .await
      .map_err(|e| PublisherError::build("read engine archive", e))
  }

  /// Copies the archive to `dest`. When `dest` is a directory the archive
  /// keeps its file name. Returns the written path.
  pub async fn persist_to(&self, dest: &Path) -> PublisherResult<PathBuf> {
    let target = if tokio::fs::metadata(dest).await.is_ok_and(|m| m.is_dir()) {
      let file_name = self
        .archive_path()
        .file_name()
        .ok_or_else(|| PublisherError::Internal("engine archive has no file name".to_string()))?;
      dest.join(file_name)
    } else {
      dest.to_path_buf()
    };

    tokio::fs::copy(self.archive_path(), &target)
      .await
      .map_err(|e| PublisherError::build("persist engine archive", e))?;
    event!(Level::INFO, path = %target.display(), "Engine archive persisted.");
    Ok(target)
  }
}
