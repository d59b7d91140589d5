// scoring_publisher/src/build/workdir.rs

use crate::error::{PublisherError, PublisherResult};
use crate::naming::sanitize_name;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{event, Level};

pub const RESOURCES_DIR: &str = "resources";
pub const CLASSES_DIR: &str = "classes";
pub const MODEL_JAR_DIR: &str = "model-jar";
pub const ENGINE_DIR: &str = "engine";

/// Scratch area of one build run. The whole tree is removed when this value
/// is dropped, whether the build succeeded or not.
#[derive(Debug)]
pub struct WorkingDirectory {
  dir: TempDir,
  model_name: String,
}

impl WorkingDirectory {
  /// Creates a fresh directory under `root` (or the system temp dir) named
  /// after the sanitized model name, with the per-stage sub-directories.
  pub fn create(model_name: &str, root: Option<&Path>) -> PublisherResult<Self> {
    let stem = sanitize_name(model_name);
    let prefix = if stem.is_empty() { "model-".to_string() } else { format!("{}-", stem) };

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);
    let dir = match root {
      Some(root) => {
        std::fs::create_dir_all(root).map_err(|e| PublisherError::build("prepare working directory", e))?;
        builder.tempdir_in(root)
      }
      None => builder.tempdir(),
    }
    .map_err(|e| PublisherError::build("prepare working directory", e))?;

    for sub_dir in [RESOURCES_DIR, CLASSES_DIR, MODEL_JAR_DIR, ENGINE_DIR] {
      std::fs::create_dir(dir.path().join(sub_dir)).map_err(|e| PublisherError::build("prepare working directory", e))?;
    }

    event!(Level::DEBUG, path = %dir.path().display(), "Working directory created.");
    Ok(Self {
      dir,
      model_name: model_name.to_string(),
    })
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn model_name(&self) -> &str {
    &self.model_name
  }

  pub fn resources_dir(&self) -> PathBuf {
    self.path().join(RESOURCES_DIR)
  }

  pub fn classes_dir(&self) -> PathBuf {
    self.path().join(CLASSES_DIR)
  }

  pub fn model_jar_dir(&self) -> PathBuf {
    self.path().join(MODEL_JAR_DIR)
  }

  pub fn engine_dir(&self) -> PathBuf {
    self.path().join(ENGINE_DIR)
  }
}
