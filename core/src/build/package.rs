// scoring_publisher/src/build/package.rs

use super::archive::write_archive;
use super::compile::CompiledModel;
use super::workdir::WorkingDirectory;
use crate::error::{PublisherError, PublisherResult};
use anyhow::{bail, Context};
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

pub const MODEL_JAR_FILE: &str = "model.jar";

/// Output of the package stage: `model.jar` holding every compiled class.
#[derive(Debug)]
pub struct PackagedModel {
  archive: PathBuf,
}

impl PackagedModel {
  pub fn archive(&self) -> &Path {
    &self.archive
  }
}

/// Adds every `.class` file under `classes_dir` to a new archive at `target`,
/// in file-name order, and returns the number of entries. Any walk or write
/// error aborts and leaves no archive behind.
pub fn package_classes(classes_dir: &Path, target: &Path) -> anyhow::Result<usize> {
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  write_archive(target, |writer| {
    let mut count = 0;
    for entry in WalkDir::new(classes_dir).sort_by_file_name() {
      let entry = entry.with_context(|| format!("walking {}", classes_dir.display()))?;
      if !entry.file_type().is_file() || entry.path().extension() != Some(OsStr::new("class")) {
        continue;
      }

      let relative = entry.path().strip_prefix(classes_dir)?;
      let entry_name = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

      writer.start_file(entry_name.clone(), options)?;
      let mut input = File::open(entry.path()).with_context(|| format!("reading {}", entry.path().display()))?;
      io::copy(&mut input, writer).with_context(|| format!("writing entry {}", entry_name))?;
      count += 1;
    }

    if count == 0 {
      bail!("no compiled classes found in {}", classes_dir.display());
    }
    Ok(count)
  })
}

#[instrument(name = "build::package", skip_all, fields(model_name = %workdir.model_name()), err(Display))]
pub async fn package(compiled: CompiledModel, workdir: &WorkingDirectory) -> PublisherResult<PackagedModel> {
  let classes_dir = compiled.classes_dir().to_path_buf();
  let archive = workdir.model_jar_dir().join(MODEL_JAR_FILE);
  let target = archive.clone();

  let count = tokio::task::spawn_blocking(move || package_classes(&classes_dir, &target))
    .await
    .map_err(|e| PublisherError::build("package", e))?
    .map_err(|e| PublisherError::build("package", e))?;

  event!(Level::INFO, entries = count, "Compiled model packaged.");
  Ok(PackagedModel { archive })
}
