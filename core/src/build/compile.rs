// scoring_publisher/src/build/compile.rs

use super::fetch::FetchedResources;
use super::workdir::WorkingDirectory;
use crate::error::{PublisherError, PublisherResult};
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

pub const DEFAULT_JAVAC: &str = "javac";

/// Compiles the downloaded model source into class files.
#[async_trait]
pub trait ModelCompiler: Send + Sync {
  async fn compile(&self, source_file: &Path, classpath: &Path, output_dir: &Path) -> anyhow::Result<()>;
}

/// Runs the JDK compiler as a child process.
#[derive(Debug, Clone)]
pub struct JavacCompiler {
  program: PathBuf,
}

impl JavacCompiler {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self { program: program.into() }
  }
}

impl Default for JavacCompiler {
  fn default() -> Self {
    Self::new(DEFAULT_JAVAC)
  }
}

#[async_trait]
impl ModelCompiler for JavacCompiler {
  async fn compile(&self, source_file: &Path, classpath: &Path, output_dir: &Path) -> anyhow::Result<()> {
    let output = tokio::process::Command::new(&self.program)
      .arg("-cp")
      .arg(classpath)
      .arg("-d")
      .arg(output_dir)
      .arg(source_file)
      .kill_on_drop(true)
      .output()
      .await
      .with_context(|| format!("failed to start {}", self.program.display()))?;

    if !output.status.success() {
      bail!(
        "{} exited with {}: {}",
        self.program.display(),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      );
    }
    Ok(())
  }
}

/// Output of the compile stage: the directory holding the class files.
#[derive(Debug)]
pub struct CompiledModel {
  classes_dir: PathBuf,
}

impl CompiledModel {
  pub fn classes_dir(&self) -> &Path {
    &self.classes_dir
  }
}

#[instrument(name = "build::compile", skip_all, fields(model_name = %workdir.model_name()), err(Display))]
pub async fn compile(
  compiler: &dyn ModelCompiler,
  fetched: FetchedResources,
  workdir: &WorkingDirectory,
) -> PublisherResult<CompiledModel> {
  let classes_dir = workdir.classes_dir();
  compiler
    .compile(fetched.source_file(), fetched.runtime_library(), &classes_dir)
    .await
    .map_err(|e| PublisherError::build("compile", e))?;

  event!(Level::INFO, "Model source compiled.");
  Ok(CompiledModel { classes_dir })
}
