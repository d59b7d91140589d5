// scoring_publisher/src/build/assemble.rs

use super::archive::write_archive;
use super::package::PackagedModel;
use super::workdir::WorkingDirectory;
use crate::error::{PublisherError, PublisherResult};
use crate::naming::sanitize_name;
use anyhow::Context;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};
use zip::ZipArchive;

/// Output of the assemble stage: the runnable engine archive.
#[derive(Debug)]
pub struct EngineArchive {
  path: PathBuf,
}

impl EngineArchive {
  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
  pub template_entries: usize,
  pub model_entries: usize,
  pub skipped_duplicates: usize,
}

pub fn engine_file_name(model_name: &str) -> String {
  format!("scoring-engine-{}.jar", sanitize_name(model_name))
}

fn open_archive(path: &Path) -> anyhow::Result<ZipArchive<File>> {
  let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
  ZipArchive::new(file).with_context(|| format!("reading archive {}", path.display()))
}

/// Copies every template entry, then every model entry the template does not
/// already contain. Entries are copied raw, without recompressing.
pub fn merge_archives(template: &Path, model_archive: &Path, target: &Path) -> anyhow::Result<MergeSummary> {
  let mut template = open_archive(template)?;
  let mut model = open_archive(model_archive)?;

  write_archive(target, |writer| {
    let mut names = HashSet::with_capacity(template.len() + model.len());
    let mut summary = MergeSummary {
      template_entries: 0,
      model_entries: 0,
      skipped_duplicates: 0,
    };

    for idx in 0..template.len() {
      let entry = template.by_index_raw(idx)?;
      names.insert(entry.name().to_string());
      writer.raw_copy_file(entry)?;
      summary.template_entries += 1;
    }

    for idx in 0..model.len() {
      let entry = model.by_index_raw(idx)?;
      let name = entry.name().to_string();
      if !names.insert(name.clone()) {
        event!(Level::WARN, entry = %name, "Model entry already present in engine template, skipping.");
        summary.skipped_duplicates += 1;
        continue;
      }
      writer.raw_copy_file(entry)?;
      summary.model_entries += 1;
    }

    Ok(summary)
  })
}

#[instrument(
  name = "build::assemble",
  skip_all,
  fields(model_name = %workdir.model_name(), template = %base_engine.display()),
  err(Display)
)]
pub async fn assemble(
  packaged: PackagedModel,
  base_engine: &Path,
  workdir: &WorkingDirectory,
) -> PublisherResult<EngineArchive> {
  let path = workdir.engine_dir().join(engine_file_name(workdir.model_name()));
  let (template, model_archive, target) = (base_engine.to_path_buf(), packaged.archive().to_path_buf(), path.clone());

  let summary = tokio::task::spawn_blocking(move || merge_archives(&template, &model_archive, &target))
    .await
    .map_err(|e| PublisherError::build("assemble", e))?
    .map_err(|e| PublisherError::build("assemble", e))?;

  event!(
    Level::INFO,
    template_entries = summary.template_entries,
    model_entries = summary.model_entries,
    skipped = summary.skipped_duplicates,
    "Scoring engine assembled."
  );
  Ok(EngineArchive { path })
}
